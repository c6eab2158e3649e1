// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! The tokenizer.
//!
//! A Gerber file mixes two syntaxes: extended commands between `%` pairs,
//! which may span lines, and simple `*`-terminated commands in between.  The
//! first pass picks out the `%` regions, the second scans the gaps between
//! them line by line, and both token streams are merged by source offset.
//!
//! Tokenizing never fails: anything unrecognized becomes an `Unknown` token.

use std::str::FromStr;
use itertools::Itertools;
use strum_macros::EnumString;
use tracing::trace;

use crate::token::{Token, TokenKind};
use crate::util::{digits_end, LineIndex};

/// Two-letter codes of extended commands.
#[derive(Clone, Copy, EnumString)]
enum ExtendedCode {
    FS, MO, AD, AM,
    LP, LR, LS, LM,
    SR, AB,
    TF, TA, TO, TD,
}

fn extended_kind(body: &str) -> TokenKind {
    let code = match body.get(..2).map(ExtendedCode::from_str) {
        Some(Ok(code)) => code,
        _ => return TokenKind::Unknown,
    };
    match code {
        ExtendedCode::FS => TokenKind::FormatSpec,
        ExtendedCode::MO => TokenKind::Unit,
        ExtendedCode::AD if body[2..].starts_with('D') => TokenKind::ApertureDefine,
        ExtendedCode::AD => TokenKind::Unknown,
        ExtendedCode::AM => TokenKind::ApertureMacro,
        ExtendedCode::LP => TokenKind::LoadPolarity,
        ExtendedCode::LR => TokenKind::LoadRotation,
        ExtendedCode::LS => TokenKind::LoadScaling,
        ExtendedCode::LM => TokenKind::LoadMirroring,
        ExtendedCode::SR => TokenKind::StepRepeat,
        ExtendedCode::AB => TokenKind::BlockAperture,
        ExtendedCode::TF => TokenKind::FileAttribute,
        ExtendedCode::TA => TokenKind::ApertureAttribute,
        ExtendedCode::TO => TokenKind::ObjectAttribute,
        ExtendedCode::TD => TokenKind::DeleteAttribute,
    }
}

/// Byte ranges `(open, close)` of the `%` delimiters of all extended
/// commands.  An empty `%%` pair does not count; an unterminated `%` ends the
/// search.
fn bracket_regions(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let find = |from: usize| bytes[from..].iter().position(|&b| b == b'%').map(|i| i + from);
    let mut regions = vec![];
    let mut pos = 0;
    while let Some(open) = find(pos) {
        match find(open + 1) {
            None => break,
            Some(close) if close == open + 1 => pos = close,
            Some(close) => {
                regions.push((open, close));
                pos = close + 1;
            }
        }
    }
    regions
}

/// Token for the body of a `%...%` region starting at `offset`.
fn extended_token(body: &str, offset: usize) -> Token {
    let body = body.split_whitespace().join(" ");
    let body = body.strip_suffix('*').unwrap_or(&body);
    Token::new(extended_kind(body), body, offset)
}

fn is_command_start(b: u8) -> bool {
    matches!(b, b'X' | b'Y' | b'I' | b'J' | b'G' | b'D' | b'M')
}

/// Scanner for the simple commands of a single line.
struct LineScanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    end: usize,
    out: &'a mut Vec<Token>,
}

impl<'a> LineScanner<'a> {
    fn scan(&mut self) {
        while self.pos < self.end {
            let b = self.bytes[self.pos];
            if b == b'*' || b.is_ascii_whitespace() {
                self.pos += 1;
                continue;
            }
            let done = match b {
                b'X' | b'Y' | b'I' | b'J' => self.coordinate(),
                b'D' => self.dcode(),
                b'G' => self.gcode(),
                b'M' => self.mcode(),
                _ => false,
            };
            if !done {
                self.unknown();
            }
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.out.push(Token::new(kind, &self.text[start..end], start));
    }

    fn skip_star(&mut self) {
        if self.pos < self.end && self.bytes[self.pos] == b'*' {
            self.pos += 1;
        }
    }

    /// Letter at `pos` followed by digits: returns the end of the digits.
    fn code_end(&self) -> Option<usize> {
        let end = digits_end(self.bytes, self.pos + 1, self.end);
        if end > self.pos + 1 { Some(end) } else { None }
    }

    fn coordinate(&mut self) -> bool {
        let start = self.pos;
        let mut i = start;
        while i < self.end && matches!(self.bytes[i], b'X' | b'Y' | b'I' | b'J') {
            let mut j = i + 1;
            if j < self.end && matches!(self.bytes[j], b'+' | b'-') {
                j += 1;
            }
            let k = digits_end(self.bytes, j, self.end);
            if k == j {
                break;
            }
            i = k;
        }
        if i == start {
            return false;
        }
        self.push(TokenKind::Coordinate, start, i);
        self.pos = i;
        // a fused operation code, as in X100Y200D01*
        if i < self.end && self.bytes[i] == b'D' {
            self.dcode();
        } else {
            self.skip_star();
        }
        true
    }

    fn dcode(&mut self) -> bool {
        let end = match self.code_end() {
            Some(end) => end,
            None => return false,
        };
        let kind = match self.text[self.pos + 1..end].parse::<u32>() {
            Ok(1) => TokenKind::Interpolate,
            Ok(2) => TokenKind::Move,
            Ok(3) => TokenKind::Flash,
            Ok(_) => TokenKind::ApertureSelect,
            Err(_) => TokenKind::Unknown,
        };
        self.push(kind, self.pos, end);
        self.pos = end;
        self.skip_star();
        true
    }

    fn gcode(&mut self) -> bool {
        let end = match self.code_end() {
            Some(end) => end,
            None => return false,
        };
        let kind = match self.text[self.pos + 1..end].parse::<u32>() {
            Ok(1) => TokenKind::Linear,
            Ok(2) => TokenKind::ClockwiseArc,
            Ok(3) => TokenKind::CounterClockwiseArc,
            Ok(4) => return self.comment(end),
            Ok(36) => TokenKind::RegionStart,
            Ok(37) => TokenKind::RegionEnd,
            Ok(74) => TokenKind::SingleQuadrant,
            Ok(75) => TokenKind::MultiQuadrant,
            _ => TokenKind::Unknown,
        };
        self.push(kind, self.pos, end);
        self.pos = end;
        self.skip_star();
        true
    }

    /// `G04` comment body up to `*`.  Bodies starting with `#@!` carry
    /// attributes written by producers that avoid extended commands.
    fn comment(&mut self, body_start: usize) -> bool {
        let body_end = self.bytes[body_start..self.end].iter()
            .position(|&b| b == b'*')
            .map_or(self.end, |i| body_start + i);
        let body = self.text[body_start..body_end].trim();
        let token = match body.strip_prefix("#@!") {
            Some(attr) => {
                let attr = attr.trim();
                let kind = match attr.get(..2) {
                    Some("TF") => TokenKind::FileAttribute,
                    Some("TA") => TokenKind::ApertureAttribute,
                    Some("TO") => TokenKind::ObjectAttribute,
                    Some("TD") => TokenKind::DeleteAttribute,
                    _ => TokenKind::Comment,
                };
                Token::new(kind, attr, self.pos)
            }
            None => Token::new(TokenKind::Comment, body, self.pos),
        };
        self.out.push(token);
        self.pos = body_end;
        self.skip_star();
        true
    }

    fn mcode(&mut self) -> bool {
        let end = match self.code_end() {
            Some(end) => end,
            None => return false,
        };
        let kind = match self.text[self.pos + 1..end].parse::<u32>() {
            Ok(0) | Ok(2) => TokenKind::EndOfFile,
            _ => TokenKind::Unknown,
        };
        self.push(kind, self.pos, end);
        self.pos = end;
        self.skip_star();
        true
    }

    /// Everything up to the next possible command start becomes one
    /// `Unknown` token.
    fn unknown(&mut self) {
        let start = self.pos;
        let mut i = start + 1;
        while i < self.end {
            let b = self.bytes[i];
            if is_command_start(b) || b == b'*' || b.is_ascii_whitespace() {
                break;
            }
            i += 1;
        }
        // never split a multi-byte character
        while !self.text.is_char_boundary(i) {
            i += 1;
        }
        self.push(TokenKind::Unknown, start, i);
        self.pos = i;
    }
}

/// Scan the simple commands in `text[from..to]` line by line.
fn scan_simple(text: &str, from: usize, to: usize, out: &mut Vec<Token>) {
    let mut line_start = from;
    for line in text[from..to].split('\n') {
        let end = line_start + line.len();
        LineScanner { text, bytes: text.as_bytes(), pos: line_start, end, out: &mut *out }.scan();
        line_start = end + 1;
    }
}

/// Split a Gerber source into tokens, in source order.
pub fn tokenize(text: &str) -> Vec<Token> {
    let lines = LineIndex::new(text);
    let mut extended = vec![];
    let mut simple = vec![];
    let mut gap_start = 0;
    for (open, close) in bracket_regions(text) {
        scan_simple(text, gap_start, open, &mut simple);
        extended.push(extended_token(&text[open + 1..close], open));
        gap_start = close + 1;
    }
    scan_simple(text, gap_start, text.len(), &mut simple);

    extended.into_iter()
        .merge_by(simple, |a, b| a.offset <= b.offset)
        .map(|mut token| {
            token.line = lines.line(token.offset);
            trace!("token {}", token);
            token
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_extended_and_simple() {
        let tokens = tokenize("%FSLAX26Y26*%\n%MOMM*%\nG01*\nX100Y-200D01*\n%LPC*%D10*\nM02*\n");
        let summary = tokens.iter().map(|t| (t.kind, t.text.as_str(), t.line)).collect::<Vec<_>>();
        assert_eq!(summary, vec![
            (TokenKind::FormatSpec, "FSLAX26Y26", 1),
            (TokenKind::Unit, "MOMM", 2),
            (TokenKind::Linear, "G01", 3),
            (TokenKind::Coordinate, "X100Y-200", 4),
            (TokenKind::Interpolate, "D01", 4),
            (TokenKind::LoadPolarity, "LPC", 5),
            (TokenKind::ApertureSelect, "D10", 5),
            (TokenKind::EndOfFile, "M02", 6),
        ]);
    }

    #[test]
    fn test_multiline_macro() {
        let tokens = tokenize("G04 start*\n%AMDONUT*\n1,1,$1,0,0*\n1,0,$2,0,0*%\n%ADD10DONUT,1X0.5*%\n");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, "start");
        assert_eq!(tokens[1].kind, TokenKind::ApertureMacro);
        assert_eq!(tokens[1].text, "AMDONUT* 1,1,$1,0,0* 1,0,$2,0,0");
        assert_eq!(tokens[2].kind, TokenKind::ApertureDefine);
        assert_eq!(tokens[2].line, 5);
    }

    #[test]
    fn test_attribute_comments() {
        let tokens = tokenize("G04 #@! TF.FileFunction,Copper,L1,Top*\nG04 #@! TA.AperFunction,SMDPad*\nG04 #@!XX*\n");
        assert_eq!(tokens[0].kind, TokenKind::FileAttribute);
        assert_eq!(tokens[0].text, "TF.FileFunction,Copper,L1,Top");
        assert_eq!(tokens[1].kind, TokenKind::ApertureAttribute);
        assert_eq!(tokens[2].kind, TokenKind::Comment);
    }

    #[test]
    fn test_codes() {
        assert_eq!(kinds("G36*G37*G74*G75*G02*G03*G54D11*M00*M01*D03*"), vec![
            TokenKind::RegionStart, TokenKind::RegionEnd, TokenKind::SingleQuadrant,
            TokenKind::MultiQuadrant, TokenKind::ClockwiseArc, TokenKind::CounterClockwiseArc,
            TokenKind::Unknown, TokenKind::ApertureSelect, TokenKind::EndOfFile,
            TokenKind::Unknown, TokenKind::Flash,
        ]);
        assert_eq!(kinds("N10X5I-3J+4D02*"), vec![
            TokenKind::Unknown, TokenKind::Coordinate, TokenKind::Move,
        ]);
        assert_eq!(kinds("%ADX*%%XY12*%"), vec![TokenKind::Unknown, TokenKind::Unknown]);
    }

    #[test]
    fn test_total() {
        for snippet in &["", "%", "%%", "%FSLAX26Y26*", "X*Y-*D*G*M*", "\u{1f600}X1\u{e9}*",
                         "\0\x01\x7f%%%", "G04 unterminated", "%\n%\n"] {
            let tokens = tokenize(snippet);
            assert!(tokens.windows(2).all(|w| w[0].offset <= w[1].offset), "{:?}", snippet);
        }
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_source_order() {
        let text = "X1Y1D02*%LPD*%X2Y2D01*\n%LPC*%\nX3Y3D01*";
        let tokens = tokenize(text);
        let kinds = tokens.iter().map(|t| t.kind).collect::<Vec<_>>();
        assert_eq!(kinds, vec![
            TokenKind::Coordinate, TokenKind::Move, TokenKind::LoadPolarity,
            TokenKind::Coordinate, TokenKind::Interpolate, TokenKind::LoadPolarity,
            TokenKind::Coordinate, TokenKind::Interpolate,
        ]);
        for token in &tokens {
            assert!(text[token.offset..].starts_with(&token.text) || token.kind.is_extended());
        }
    }
}
