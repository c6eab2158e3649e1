// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! The graphics-state interpreter.
//!
//! Tokens are replayed one by one against a `GraphicsState`.  Operation codes
//! (D01/D02/D03) turn the pending coordinates into graphics objects, all other
//! commands only change modal state or the aperture catalogue.  Nothing here
//! fails: every problem is recorded as a document warning and the command is
//! skipped or repaired.

use std::iter::once;
use fixedbitset::FixedBitSet as BitSet;
use itertools::Itertools;
use tracing::{debug, trace, warn};

use crate::aperture::{Aperture, ApertureShape, MacroTemplate};
use crate::document::{Attribute, Document, Notation, Polarity, Unit};
use crate::lex::tokenize;
use crate::object::{Arc, Contour, ContourSegment, Draw, Flash, GraphicsObject, Region};
use crate::parse::{parse_aperture_define, parse_format_spec};
use crate::token::{Token, TokenKind};

mod state;
mod warning;

pub use self::state::*;
pub use self::warning::*;

/// D-codes above this are reported every time they are selected.
const MAX_TRACKED_DCODE: usize = 1 << 16;

pub struct Interpreter {
    doc: Document,
    state: GraphicsState,
    /// Line of the token being processed, for warnings.
    line: usize,
    /// Undefined D-codes already reported.
    reported: BitSet,
    format_reported: bool,
    not_expanded: Vec<&'static str>,
    /// `TA` attributes in effect for newly defined apertures.
    aperture_attrs: Vec<Attribute>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            doc: Document::new(),
            state: GraphicsState::default(),
            line: 0,
            reported: BitSet::with_capacity(0),
            format_reported: false,
            not_expanded: vec![],
            aperture_attrs: vec![],
        }
    }

    pub fn state(&self) -> &GraphicsState {
        &self.state
    }

    /// The document built so far.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Apply one token.  Returns the graphics object it produced, if any.
    pub fn feed(&mut self, token: &Token) -> Option<&GraphicsObject> {
        let count = self.doc.objects.len();
        self.line = token.line;
        match token.kind {
            TokenKind::FormatSpec => match parse_format_spec(&token.text) {
                Some(format) => {
                    debug!("coordinate format {}", format);
                    self.doc.format = Some(format);
                }
                None => self.warn(WarningKind::InvalidParameter(token.text.clone())),
            },
            TokenKind::Unit => match token.text.get(2..) {
                Some("MM") => self.doc.unit = Unit::Millimeters,
                Some("IN") => self.doc.unit = Unit::Inches,
                _ => self.warn(WarningKind::InvalidParameter(token.text.clone())),
            },
            TokenKind::ApertureDefine => self.define_aperture(token),
            TokenKind::ApertureMacro => self.define_template(token),
            TokenKind::LoadPolarity => match token.text.get(2..) {
                Some("D") => self.state.polarity = Polarity::Dark,
                Some("C") => self.state.polarity = Polarity::Clear,
                _ => self.warn(WarningKind::InvalidParameter(token.text.clone())),
            },
            TokenKind::LoadRotation => if let Some(value) = self.number_param(token) {
                self.state.transform.rotation = value;
            },
            TokenKind::LoadScaling => if let Some(value) = self.number_param(token) {
                self.state.transform.scale = value;
            },
            TokenKind::LoadMirroring => {
                let mode = token.text.get(2..).unwrap_or("");
                if !matches!(mode, "N" | "X" | "Y" | "XY") {
                    self.warn(WarningKind::InvalidParameter(token.text.clone()));
                }
                self.state.transform.mirror_x = mode.contains('X');
                self.state.transform.mirror_y = mode.contains('Y');
            }
            TokenKind::StepRepeat => if repeats(&token.text) {
                self.not_expanded("step and repeat");
            },
            TokenKind::BlockAperture => self.not_expanded("block aperture"),
            TokenKind::FileAttribute => match Attribute::parse(token.text.get(2..).unwrap_or("")) {
                Some(attr) => {
                    debug!("file attribute {}", attr);
                    self.doc.attributes.insert(attr.name.clone(), attr);
                }
                None => self.warn(WarningKind::InvalidParameter(token.text.clone())),
            },
            TokenKind::ApertureAttribute => match Attribute::parse(token.text.get(2..).unwrap_or("")) {
                Some(attr) => {
                    self.aperture_attrs.retain(|a| a.name != attr.name);
                    self.aperture_attrs.push(attr);
                }
                None => self.warn(WarningKind::InvalidParameter(token.text.clone())),
            },
            TokenKind::DeleteAttribute => {
                let name = token.text.get(2..).unwrap_or("").trim();
                if name.is_empty() {
                    self.aperture_attrs.clear();
                } else {
                    self.aperture_attrs.retain(|a| a.name != name);
                }
            }
            TokenKind::ObjectAttribute => trace!("object attribute {} ignored", token.text),

            TokenKind::Coordinate => {
                let words = self.coordinate_words(token);
                self.state.pending = self.state.pending.merge(words);
            }
            TokenKind::Interpolate => self.interpolate(),
            TokenKind::Move => self.move_to(),
            TokenKind::Flash => self.flash(),
            TokenKind::ApertureSelect => match token.code() {
                Some(dcode) => self.select_aperture(dcode),
                None => self.warn(WarningKind::UnknownCommand(token.text.clone())),
            },
            TokenKind::Linear => self.state.interpolation = Interpolation::Linear,
            TokenKind::ClockwiseArc => self.state.interpolation = Interpolation::Clockwise,
            TokenKind::CounterClockwiseArc =>
                self.state.interpolation = Interpolation::CounterClockwise,
            TokenKind::RegionStart => self.start_region(),
            TokenKind::RegionEnd => self.end_region(),
            TokenKind::SingleQuadrant => self.state.quadrant = QuadrantMode::Single,
            TokenKind::MultiQuadrant => self.state.quadrant = QuadrantMode::Multi,
            TokenKind::Comment => trace!("comment: {}", token.text),
            TokenKind::EndOfFile => debug!("end of file at line {}", token.line),
            TokenKind::Unknown => self.legacy_code(token),
        }
        if self.doc.objects.len() > count {
            self.doc.objects.last()
        } else {
            None
        }
    }

    /// Close what is still open and hand out the document.
    pub fn finish(mut self) -> Document {
        if self.state.in_region() {
            self.warn(WarningKind::UnclosedRegion);
            self.end_region();
        }
        debug!("{} objects, {} apertures, {} warnings", self.doc.objects.len(),
               self.doc.apertures.len(), self.doc.warnings.len());
        self.doc
    }

    fn warn(&mut self, kind: WarningKind) {
        let warning = Warning { line: self.line, kind };
        warn!("{}", warning);
        self.doc.warnings.push(warning);
    }

    fn not_expanded(&mut self, what: &'static str) {
        if !self.not_expanded.contains(&what) {
            self.not_expanded.push(what);
            self.warn(WarningKind::NotExpanded(what));
        }
    }

    fn number_param(&mut self, token: &Token) -> Option<f64> {
        let value = token.text.get(2..).and_then(|v| v.trim().parse().ok());
        if value.is_none() {
            self.warn(WarningKind::InvalidParameter(token.text.clone()));
        }
        value
    }

    /// Deprecated codes that older files still carry.
    fn legacy_code(&mut self, token: &Token) {
        match token.text.as_str() {
            "G70" => self.doc.unit = Unit::Inches,
            "G71" => self.doc.unit = Unit::Millimeters,
            "G90" | "G91" => {
                let notation = if token.text == "G90" { Notation::Absolute } else { Notation::Incremental };
                if let Some(format) = &mut self.doc.format {
                    format.notation = notation;
                }
            }
            // tool prepare and optional stop
            "G54" | "G55" | "M01" => (),
            _ => self.warn(WarningKind::UnknownCommand(token.text.clone())),
        }
    }

    fn define_template(&mut self, token: &Token) {
        match MacroTemplate::from_command(&token.text) {
            Ok(template) => {
                debug!("macro {} with {} statements", template.name, template.statements.len());
                self.doc.templates.insert(template.name.clone(), template);
            }
            Err(source) => {
                let text = token.text.strip_prefix("AM").unwrap_or(&token.text);
                let name = text.split('*').next().unwrap_or("").trim().into();
                self.warn(WarningKind::MalformedExpression { name, source });
            }
        }
    }

    fn define_aperture(&mut self, token: &Token) {
        let invalid = |reason: &str| WarningKind::InvalidAperture {
            text: token.text.clone(), reason: reason.into(),
        };
        let def = match parse_aperture_define(&token.text) {
            Some(def) => def,
            None => return self.warn(invalid("unrecognized syntax")),
        };
        let shape = match ApertureShape::from_define(&def) {
            Ok(shape) => shape,
            Err(reason) => return self.warn(invalid(reason)),
        };
        if let ApertureShape::Macro { template, params } = &shape {
            let undefined = match self.doc.templates.get(template) {
                Some(tpl) => tpl.undefined_variables(params),
                None => return self.warn(WarningKind::UndefinedTemplate {
                    dcode: def.dcode, name: template.clone(),
                }),
            };
            for var in undefined {
                self.warn(WarningKind::UndefinedMacroVariable { name: template.clone(), var });
            }
        }
        let mut aperture = Aperture::new(def.dcode, shape);
        aperture.attributes = self.aperture_attrs.clone();
        debug!("aperture {}", aperture);
        self.doc.apertures.insert(def.dcode, aperture);
    }

    fn select_aperture(&mut self, dcode: u32) {
        if self.doc.apertures.contains_key(&dcode) {
            self.state.aperture = Some(dcode);
            return;
        }
        self.state.aperture = None;
        let index = dcode as usize;
        if index < MAX_TRACKED_DCODE {
            if self.reported.contains(index) {
                return;
            }
            self.reported.grow(index + 1);
            self.reported.insert(index);
        }
        self.warn(WarningKind::UndefinedAperture(dcode));
    }

    /// Decode the X/Y/I/J words of a coordinate token.
    fn coordinate_words(&mut self, token: &Token) -> Pending {
        let format = match self.doc.format {
            Some(format) => format,
            None => {
                if !self.format_reported {
                    self.format_reported = true;
                    self.warn(WarningKind::MissingFormatSpec);
                }
                return Pending::default();
            }
        };
        let text = token.text.as_str();
        let starts = text.bytes().positions(|b| b.is_ascii_alphabetic());
        let mut pending = Pending::default();
        for (start, end) in starts.chain(once(text.len())).tuple_windows() {
            let value = match format.decode(&text[start + 1..end]) {
                Some(value) => value,
                None => {
                    self.warn(WarningKind::InvalidParameter(text.into()));
                    continue;
                }
            };
            match text.as_bytes()[start] {
                b'X' => pending.x = Some(value),
                b'Y' => pending.y = Some(value),
                b'I' => pending.i = Some(value),
                b'J' => pending.j = Some(value),
                _ => (),
            }
        }
        pending
    }

    fn notation(&self) -> Notation {
        self.doc.format.map_or(Notation::Absolute, |f| f.notation)
    }

    /// Consume the pending words: returns the start point, target and arc
    /// center, and moves the current point to the target.
    fn advance(&mut self) -> (kurbo::Point, kurbo::Point, kurbo::Point) {
        let pending = std::mem::take(&mut self.state.pending);
        let start = self.state.point;
        let target = pending.target(start, self.notation());
        self.state.point = target;
        (start, target, start + pending.offset())
    }

    /// D01
    fn interpolate(&mut self) {
        let (start, end, center) = self.advance();
        let clockwise = self.state.interpolation.clockwise();
        if self.state.in_region() {
            let contour = self.state.contour.get_or_insert_with(|| Contour::new(start));
            contour.segments.push(match clockwise {
                None => ContourSegment::Line { end },
                Some(clockwise) => ContourSegment::Arc { end, center, clockwise },
            });
        } else if let Some(aperture) = self.state.aperture {
            let polarity = self.state.polarity;
            let object = match clockwise {
                None => GraphicsObject::Draw(Draw { start, end, aperture, polarity }),
                Some(clockwise) => GraphicsObject::Arc(Arc {
                    start, end, center, clockwise, aperture, polarity,
                }),
            };
            trace!("{}", object);
            self.doc.push_object(object);
        }
    }

    /// D02
    fn move_to(&mut self) {
        let (_, target, _) = self.advance();
        if self.state.in_region() && self.state.contour.is_some() {
            self.state.flush_contour();
            self.state.contour = Some(Contour::new(target));
        }
    }

    /// D03
    fn flash(&mut self) {
        let (_, position, _) = self.advance();
        if self.state.in_region() {
            return;
        }
        if let Some(aperture) = self.state.aperture {
            let object = GraphicsObject::Flash(Flash {
                position, aperture, transform: self.state.transform, polarity: self.state.polarity,
            });
            trace!("{}", object);
            self.doc.push_object(object);
        }
    }

    /// G36
    fn start_region(&mut self) {
        if self.state.in_region() {
            // G36 inside a region: finish the old one first
            self.end_region();
        }
        self.state.region = Some(Region { contours: vec![], polarity: self.state.polarity });
        self.state.contour = None;
    }

    /// G37
    fn end_region(&mut self) {
        if let Some(region) = self.state.close_region() {
            trace!("region with {} contours", region.contours.len());
            self.doc.push_object(GraphicsObject::Region(region));
        }
    }
}

/// Whether an `SR` command actually repeats anything.
fn repeats(text: &str) -> bool {
    let count = |axis: char| {
        text.find(axis)
            .map(|i| &text[i + 1..])
            .and_then(|rest| rest.split(|c: char| !c.is_ascii_digit()).next())
            .and_then(|digits| digits.parse::<u32>().ok())
            .unwrap_or(1)
    };
    count('X') > 1 || count('Y') > 1
}

/// Parse a complete Gerber source.
pub fn parse(text: &str) -> Document {
    let mut interp = Interpreter::new();
    for token in tokenize(text) {
        interp.feed(&token);
    }
    interp.finish()
}

#[cfg(test)]
mod tests {
    use kurbo::Point;
    use super::*;

    const HEADER: &str = "%FSLAX26Y26*%\n%MOMM*%\n%ADD10C,0.5*%\n";

    fn run(body: &str) -> Document {
        parse(&format!("{}{}M02*\n", HEADER, body))
    }

    fn token(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, 0)
    }

    #[test]
    fn test_coordinate_only_updates_pending() {
        let mut interp = Interpreter::new();
        interp.feed(&token(TokenKind::FormatSpec, "FSLAX24Y24"));
        assert!(interp.feed(&token(TokenKind::Coordinate, "X10000Y-5000")).is_none());
        assert_eq!(interp.state().point, Point::ORIGIN);
        assert_eq!(interp.state().pending.x, Some(1.));
        assert_eq!(interp.state().pending.y, Some(-0.5));
    }

    #[test]
    fn test_flash() {
        let mut interp = Interpreter::new();
        for (kind, text) in [(TokenKind::FormatSpec, "FSLAX24Y24"),
                             (TokenKind::ApertureDefine, "ADD10C,0.5"),
                             (TokenKind::ApertureSelect, "D10"),
                             (TokenKind::Coordinate, "X10000Y20000")] {
            interp.feed(&token(kind, text));
        }
        match interp.feed(&token(TokenKind::Flash, "D03")) {
            Some(GraphicsObject::Flash(flash)) => {
                assert_eq!(flash.position, Point::new(1., 2.));
                assert_eq!(flash.aperture, 10);
            }
            other => panic!("expected a flash, got {:?}", other),
        }
        assert_eq!(interp.state().point, Point::new(1., 2.));
        assert_eq!(interp.state().pending, Pending::default());
    }

    #[test]
    fn test_draw_and_arc() {
        let doc = run("D10*\nX0Y0D02*\nX1000000Y0D01*\nG03X0Y1000000I-1000000J0D01*\n");
        assert_eq!(doc.objects().len(), 2);
        match &doc.objects()[0] {
            GraphicsObject::Draw(draw) => {
                assert_eq!(draw.start, Point::ORIGIN);
                assert_eq!(draw.end, Point::new(1., 0.));
            }
            other => panic!("expected a draw, got {:?}", other),
        }
        match &doc.objects()[1] {
            GraphicsObject::Arc(arc) => {
                assert_eq!(arc.center, Point::ORIGIN);
                assert_eq!(arc.end, Point::new(0., 1.));
                assert!(!arc.clockwise);
            }
            other => panic!("expected an arc, got {:?}", other),
        }
    }

    #[test]
    fn test_region() {
        let doc = run("G36*\nX0Y0D02*\nX1000000Y0D01*\nX1000000Y1000000D01*\nX0Y0D01*\n\
                       X2000000Y0D02*\nX3000000Y0D01*\nX3000000Y1000000D01*\nX2000000Y0D01*\n\
                       X5000000Y5000000D02*\nG37*\n");
        assert_eq!(doc.objects().len(), 1);
        match &doc.objects()[0] {
            GraphicsObject::Region(region) => {
                assert_eq!(region.contours.len(), 2);
                assert_eq!(region.contours[0].start, Point::ORIGIN);
                assert_eq!(region.contours[1].start, Point::new(2., 0.));
                assert_eq!(region.contours[1].segments.len(), 3);
            }
            other => panic!("expected a region, got {:?}", other),
        }
        assert!(doc.warnings().is_empty());
    }

    #[test]
    fn test_empty_region_dropped() {
        let doc = run("G36*\nX1000000Y0D02*\nG37*\n");
        assert!(doc.objects().is_empty());
    }

    #[test]
    fn test_flash_in_region_ignored() {
        let doc = run("D10*\nG36*\nX0Y0D03*\nG37*\n");
        assert!(doc.objects().is_empty());
    }

    #[test]
    fn test_unclosed_region() {
        let doc = parse(&format!("{}G36*\nX0Y0D02*\nX1000000Y0D01*\nX0Y1000000D01*\n", HEADER));
        assert_eq!(doc.objects().len(), 1);
        assert!(doc.warnings().iter().any(|w| w.kind == WarningKind::UnclosedRegion));
    }

    #[test]
    fn test_region_polarity() {
        let doc = run("%LPC*%\nG36*\nX0Y0D02*\nX1000000Y0D01*\nX0Y1000000D01*\nG37*\n");
        assert_eq!(doc.objects()[0].polarity(), Polarity::Clear);
    }

    #[test]
    fn test_undefined_aperture_reported_once() {
        let doc = run("D11*\nX0Y0D03*\nD11*\nX1000000Y0D03*\n");
        assert!(doc.objects().is_empty());
        let undefined: Vec<_> = doc.warnings().iter()
            .filter(|w| w.kind == WarningKind::UndefinedAperture(11))
            .collect();
        assert_eq!(undefined.len(), 1);
        assert_eq!(undefined[0].line, 4);
    }

    #[test]
    fn test_missing_format() {
        let doc = parse("%ADD10C,0.5*%\nD10*\nX100Y100D03*\nX200Y200D03*\n");
        assert_eq!(doc.objects().len(), 2);
        assert!(doc.objects().iter().all(|obj| match obj {
            GraphicsObject::Flash(flash) => flash.position == Point::ORIGIN,
            _ => false,
        }));
        let missing = doc.warnings().iter()
            .filter(|w| w.kind == WarningKind::MissingFormatSpec)
            .count();
        assert_eq!(missing, 1);
    }

    #[test]
    fn test_incremental() {
        let doc = parse("%FSLIX24Y24*%\n%ADD10C,0.5*%\nD10*\nX10000Y10000D02*\nX10000D01*\n");
        match &doc.objects()[0] {
            GraphicsObject::Draw(draw) => {
                assert_eq!(draw.start, Point::new(1., 1.));
                assert_eq!(draw.end, Point::new(2., 1.));
            }
            other => panic!("expected a draw, got {:?}", other),
        }
    }

    #[test]
    fn test_load_transform() {
        let doc = run("%LPC*%\n%LR45.0*%\n%LS2*%\n%LMXY*%\nD10*\nX0Y0D03*\n");
        match &doc.objects()[0] {
            GraphicsObject::Flash(flash) => {
                assert_eq!(flash.polarity, Polarity::Clear);
                assert_eq!(flash.transform.rotation, 45.);
                assert_eq!(flash.transform.scale, 2.);
                assert!(flash.transform.mirror_x && flash.transform.mirror_y);
            }
            other => panic!("expected a flash, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_rotation() {
        let doc = run("%LRabc*%\n");
        assert!(matches!(doc.warnings()[0].kind, WarningKind::InvalidParameter(_)));
    }

    #[test]
    fn test_macro_aperture() {
        let doc = run("%AMDONUT*1,1,$1,0,0*1,0,$2,0,0*%\n%ADD20DONUT,1.0X0.5*%\n%ADD21MISSING*%\n");
        assert!(doc.aperture(20).is_some());
        assert!(doc.template("DONUT").is_some());
        assert!(doc.aperture(21).is_none());
        assert!(doc.warnings().iter().any(|w| w.kind == WarningKind::UndefinedTemplate {
            dcode: 21, name: "MISSING".into(),
        }));
    }

    #[test]
    fn test_macro_undefined_variable() {
        let doc = run("%AMDONUT*1,1,$1,0,0*1,0,$2,0,0*%\n%ADD20DONUT,1.0*%\n");
        assert!(doc.aperture(20).is_some());
        assert!(doc.warnings().iter().any(|w| w.kind == WarningKind::UndefinedMacroVariable {
            name: "DONUT".into(), var: 2,
        }));
    }

    #[test]
    fn test_malformed_macro() {
        let doc = run("%AMBAD*1,1,(1+,0,0*%\n");
        assert!(doc.template("BAD").is_none());
        assert!(matches!(&doc.warnings()[0].kind,
                         WarningKind::MalformedExpression { name, .. } if name == "BAD"));
    }

    #[test]
    fn test_attributes() {
        let doc = parse("%TF.FileFunction,Copper,L1,Top*%\nG04 #@! TF.GenerationSoftware,KiCad,Pcbnew*\n\
                         %FSLAX26Y26*%\n%TA.AperFunction,SMDPad*%\n%ADD10C,0.5*%\n%TD*%\n%ADD11C,0.5*%\n");
        assert_eq!(doc.file_function(), Some("Copper"));
        assert_eq!(doc.generation_software().as_deref(), Some("KiCad Pcbnew"));
        let pad = doc.aperture(10).map(|a| a.attributes.clone()).unwrap_or_default();
        assert_eq!(pad.len(), 1);
        assert_eq!(pad[0].name, ".AperFunction");
        assert!(doc.aperture(11).map_or(false, |a| a.attributes.is_empty()));
    }

    #[test]
    fn test_short_attribute_tokens() {
        let mut interp = Interpreter::new();
        for kind in [TokenKind::FileAttribute, TokenKind::ApertureAttribute, TokenKind::DeleteAttribute] {
            assert!(interp.feed(&token(kind, "T")).is_none());
        }
        let kinds = interp.document().warnings().iter().map(|w| w.kind.clone()).collect::<Vec<_>>();
        assert_eq!(kinds, vec![WarningKind::InvalidParameter("T".into()); 2]);

        interp.feed(&token(TokenKind::ApertureMacro, "\u{2603}*$x=1"));
        assert!(matches!(&interp.document().warnings()[2].kind,
                         WarningKind::MalformedExpression { name, .. } if name == "\u{2603}"));
    }

    #[test]
    fn test_step_repeat() {
        let doc = run("%SRX1Y1I0J0*%\n%SR*%\n");
        assert!(doc.warnings().is_empty());
        let doc = run("%SRX3Y2I5.0J5.0*%\n%SR*%\n%SRX2Y1I1J1*%\n%SR*%\n");
        assert_eq!(doc.warnings().len(), 1);
        assert_eq!(doc.warnings()[0].kind, WarningKind::NotExpanded("step and repeat"));
    }

    #[test]
    fn test_unknown_command() {
        let doc = run("G54D10*\nG70*\nG99*\n");
        assert_eq!(doc.unit(), Unit::Inches);
        assert_eq!(doc.warnings().len(), 1);
        assert_eq!(doc.warnings()[0].kind, WarningKind::UnknownCommand("G99".into()));
    }

    #[test]
    fn test_quadrant_mode() {
        let mut interp = Interpreter::new();
        interp.feed(&token(TokenKind::MultiQuadrant, "G75"));
        assert_eq!(interp.state().quadrant, QuadrantMode::Multi);
    }
}
