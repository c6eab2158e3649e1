// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::fmt;
use strum_macros::Display;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum TokenKind {
    // extended commands: %..%
    FormatSpec,         // FS
    Unit,               // MO
    ApertureDefine,     // AD
    ApertureMacro,      // AM
    LoadPolarity,       // LP
    LoadRotation,       // LR
    LoadScaling,        // LS
    LoadMirroring,      // LM
    StepRepeat,         // SR
    BlockAperture,      // AB
    FileAttribute,      // TF
    ApertureAttribute,  // TA
    ObjectAttribute,    // TO
    DeleteAttribute,    // TD

    // simple commands
    Coordinate,         // X..Y..I..J..
    Interpolate,        // D01
    Move,               // D02
    Flash,              // D03
    ApertureSelect,     // Dnn
    Linear,             // G01
    ClockwiseArc,       // G02
    CounterClockwiseArc, // G03
    RegionStart,        // G36
    RegionEnd,          // G37
    SingleQuadrant,     // G74
    MultiQuadrant,      // G75
    Comment,            // G04
    EndOfFile,          // M00, M02

    Unknown,
}

impl TokenKind {
    pub fn is_extended(self) -> bool {
        (self as u8) <= (TokenKind::DeleteAttribute as u8)
    }
}

/// A lexical unit of a Gerber file.
///
/// `text` is the command without its delimiters: the body of an extended
/// command (`FSLAX26Y26`), the coordinate run (`X100Y-200`), the code
/// (`D10`, `G36`) or the comment body.  `offset` is the byte offset in the
/// source and `line` is 1-based.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Token { kind, text: text.into(), line: 0, offset }
    }

    /// Number following the leading letter of codes like `D10` or `G36`.
    pub fn code(&self) -> Option<u32> {
        self.text.get(1..)?.parse().ok()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:>5}: {:<19} {}", self.line, self.kind.to_string(), self.text)
    }
}
