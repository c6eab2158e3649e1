// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! The parsed document and its file-level settings.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use strum_macros::Display;

use crate::aperture::{Aperture, MacroTemplate, Templates};
use crate::geom::BoundingBox;
use crate::interp::Warning;
use crate::object::GraphicsObject;

/// Which zeros a coordinate format leaves out.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
pub enum ZeroOmission {
    Leading,
    Trailing,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
pub enum Notation {
    Absolute,
    Incremental,
}

/// The fixed-width coordinate format set by `%FS...*%`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CoordinateFormat {
    pub integer: u32,
    pub decimal: u32,
    pub zeros: ZeroOmission,
    pub notation: Notation,
}

impl CoordinateFormat {
    pub fn new(integer: u32, decimal: u32, zeros: ZeroOmission, notation: Notation) -> Self {
        CoordinateFormat { integer, decimal, zeros, notation }
    }

    fn width(&self) -> usize {
        (self.integer + self.decimal) as usize
    }

    /// Decode a signed digit string, e.g. `-1500` in 2.4 format is -0.15.
    ///
    /// The string is padded with zeros on the side opposite to the omitted
    /// ones before the decimal point is placed.
    pub fn decode(&self, text: &str) -> Option<f64> {
        let (negative, digits) = match text.as_bytes().first()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let missing = self.width().saturating_sub(digits.len());
        let padded = match self.zeros {
            ZeroOmission::Leading => format!("{}{}", "0".repeat(missing), digits),
            ZeroOmission::Trailing => format!("{}{}", digits, "0".repeat(missing)),
        };
        let value = padded.parse::<f64>().ok()? / 10f64.powi(self.decimal as i32);
        Some(if negative { -value } else { value })
    }

    /// Encode a value as this format would write it, omitting zeros.
    pub fn encode(&self, value: f64) -> String {
        let scaled = (value.abs() * 10f64.powi(self.decimal as i32)).round() as u64;
        let padded = format!("{:0width$}", scaled, width = self.width());
        let digits = match self.zeros {
            ZeroOmission::Leading => padded.trim_start_matches('0'),
            ZeroOmission::Trailing => padded.trim_end_matches('0'),
        };
        let digits = if digits.is_empty() { "0" } else { digits };
        if value < 0. && scaled != 0 { format!("-{}", digits) } else { digits.into() }
    }
}

impl fmt::Display for CoordinateFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{} ({} zeros omitted, {})", self.integer, self.decimal,
               self.zeros, self.notation)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
pub enum Unit {
    #[strum(serialize = "mm")]
    Millimeters,
    #[strum(serialize = "in")]
    Inches,
}

impl Unit {
    /// Convert a length in this unit to millimeters.
    pub fn to_mm(self, value: f64) -> f64 {
        match self {
            Unit::Millimeters => value,
            Unit::Inches => value * 25.4,
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Unit::Millimeters
    }
}

/// Dark adds material, clear removes it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
pub enum Polarity {
    Dark,
    Clear,
}

impl Polarity {
    pub fn invert(self) -> Self {
        match self {
            Polarity::Dark => Polarity::Clear,
            Polarity::Clear => Polarity::Dark,
        }
    }
}

impl Default for Polarity {
    fn default() -> Self {
        Polarity::Dark
    }
}

/// A `TF`/`TA` attribute: a name (with its leading dot for standard ones)
/// and its comma-separated values.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<String>,
}

impl Attribute {
    /// Parse the part after the `TF`/`TA` code, e.g. `.FileFunction,Copper,L1,Top`.
    pub fn parse(body: &str) -> Option<Self> {
        let mut parts = body.split(',').map(str::trim);
        let name = parts.next().filter(|name| !name.is_empty())?;
        Some(Attribute { name: name.into(), values: parts.map(Into::into).collect() })
    }

    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for value in &self.values {
            write!(f, ",{}", value)?;
        }
        Ok(())
    }
}

/// A parsed Gerber file.
///
/// Built by `interp::parse`, immutable afterwards.  Graphics objects refer to
/// apertures by D-code and apertures to macro templates by name; all of them
/// are owned here.
#[derive(Debug, Default)]
pub struct Document {
    pub(crate) unit: Unit,
    pub(crate) format: Option<CoordinateFormat>,
    pub(crate) apertures: BTreeMap<u32, Aperture>,
    pub(crate) templates: Templates,
    pub(crate) objects: Vec<GraphicsObject>,
    pub(crate) attributes: BTreeMap<String, Attribute>,
    pub(crate) warnings: Vec<Warning>,
    bbox: OnceLock<BoundingBox>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn format(&self) -> Option<&CoordinateFormat> {
        self.format.as_ref()
    }

    pub fn aperture(&self, dcode: u32) -> Option<&Aperture> {
        self.apertures.get(&dcode)
    }

    pub fn apertures(&self) -> impl Iterator<Item=&Aperture> {
        self.apertures.values()
    }

    pub fn template(&self, name: &str) -> Option<&MacroTemplate> {
        self.templates.get(name)
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Graphics objects in rendering order.
    pub fn objects(&self) -> &[GraphicsObject] {
        &self.objects
    }

    pub fn file_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn file_attributes(&self) -> impl Iterator<Item=&Attribute> {
        self.attributes.values()
    }

    fn standard_attribute(&self, name: &str) -> Option<&Attribute> {
        self.file_attribute(&format!(".{}", name)).or_else(|| self.file_attribute(name))
    }

    /// First value of `.FileFunction`, e.g. `Copper`.
    pub fn file_function(&self) -> Option<&str> {
        self.standard_attribute("FileFunction").and_then(Attribute::first_value)
    }

    /// Vendor and application from `.GenerationSoftware`.
    pub fn generation_software(&self) -> Option<String> {
        match &self.standard_attribute("GenerationSoftware")?.values[..] {
            [vendor, application, ..] => Some(format!("{} {}", vendor, application)),
            _ => None,
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Union of all objects' bounding boxes; invalid for an empty document.
    pub fn bounding_box(&self) -> BoundingBox {
        *self.bbox.get_or_init(|| {
            self.objects.iter().fold(BoundingBox::EMPTY, |bbox, obj| {
                bbox.union(&obj.bounding_box(self))
            })
        })
    }

    pub fn width(&self) -> f64 {
        self.bounding_box().width()
    }

    pub fn height(&self) -> f64 {
        self.bounding_box().height()
    }

    pub(crate) fn push_object(&mut self, obj: GraphicsObject) {
        self.bbox.take();
        self.objects.push(obj);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let fmt = CoordinateFormat::new(2, 6, ZeroOmission::Leading, Notation::Absolute);
        assert_eq!(fmt.decode("1000000"), Some(1.0));
        assert_eq!(fmt.decode("-1500"), Some(-0.0015));
        assert_eq!(fmt.decode("+0"), Some(0.));
        assert_eq!(fmt.decode(""), None);
        assert_eq!(fmt.decode("-"), None);
        assert_eq!(fmt.decode("12a"), None);

        let fmt = CoordinateFormat::new(2, 4, ZeroOmission::Trailing, Notation::Absolute);
        assert_eq!(fmt.decode("15"), Some(15.));
        assert_eq!(fmt.decode("-0015"), Some(-0.15));
    }

    #[test]
    fn test_round_trip() {
        for &(int, dec) in &[(2, 4), (2, 6), (3, 5), (4, 3)] {
            for &zeros in &[ZeroOmission::Leading, ZeroOmission::Trailing] {
                let fmt = CoordinateFormat::new(int, dec, zeros, Notation::Absolute);
                let step = 10f64.powi(-(dec as i32));
                for &value in &[0., 1., -1., 0.5, 12.25, -3.0625, 7. * step, 10f64.powi(int as i32) - step] {
                    let decoded = fmt.decode(&fmt.encode(value)).unwrap();
                    assert!((decoded - value).abs() < step, "{} {} -> {}", fmt, value, decoded);
                }
            }
        }
    }

    #[test]
    fn test_attribute() {
        let attr = Attribute::parse(".FileFunction,Copper,L1,Top").unwrap();
        assert_eq!(attr.name, ".FileFunction");
        assert_eq!(attr.values, vec!["Copper", "L1", "Top"]);
        assert_eq!(attr.to_string(), ".FileFunction,Copper,L1,Top");
        assert!(Attribute::parse("").is_none());
    }

    #[test]
    fn test_unit() {
        assert_eq!(Unit::Inches.to_mm(2.), 50.8);
        assert_eq!(Unit::default().to_string(), "mm");
    }
}
