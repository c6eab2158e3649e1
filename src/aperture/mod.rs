// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! Apertures: the pens and stamps of a Gerber file.
//!
//! All shapes are centered on the origin; draws and flashes place them.

mod macros;

use std::f64::consts::TAU;
use std::fmt;
use kurbo::{Point, Vec2};

use crate::ast::ApertureDefine;
use crate::document::{Attribute, Polarity};
use crate::geom::{BoundingBox, PathBuilder};
use crate::render::{RenderOptions, Shape};

pub use self::macros::*;

/// The shape of an aperture.
///
/// Holes are given by their diameter and punched through the center.
#[derive(Clone, Debug, PartialEq)]
pub enum ApertureShape {
    Circle { diameter: f64, hole: Option<f64> },
    Rectangle { width: f64, height: f64, hole: Option<f64> },
    Obround { width: f64, height: f64, hole: Option<f64> },
    /// Rotation in degrees puts the first vertex off the positive x axis.
    Polygon { diameter: f64, vertices: u32, rotation: f64, hole: Option<f64> },
    /// Instance of a macro template, resolved through the document.
    Macro { template: String, params: Vec<f64> },
}

fn hole(params: &[f64], index: usize) -> Option<f64> {
    params.get(index).copied().filter(|&d| d > 0.)
}

impl ApertureShape {
    /// Build the shape from an `AD` payload.  Names other than the four
    /// standard templates are taken to be macros.
    pub fn from_define(def: &ApertureDefine) -> Result<Self, &'static str> {
        let p = &def.params[..];
        Ok(match def.template.as_str() {
            "C" => match p {
                [diameter, ..] => ApertureShape::Circle { diameter: *diameter, hole: hole(p, 1) },
                _ => return Err("circle needs a diameter"),
            },
            "R" => match p {
                [width, height, ..] => ApertureShape::Rectangle {
                    width: *width, height: *height, hole: hole(p, 2),
                },
                _ => return Err("rectangle needs width and height"),
            },
            "O" => match p {
                [width, height, ..] => ApertureShape::Obround {
                    width: *width, height: *height, hole: hole(p, 2),
                },
                _ => return Err("obround needs width and height"),
            },
            "P" => match p {
                [diameter, vertices, ..] if (3. ..=MAX_POLYGON_VERTICES as f64).contains(vertices) =>
                    ApertureShape::Polygon {
                        diameter: *diameter,
                        vertices: vertices.round() as u32,
                        rotation: p.get(2).copied().unwrap_or(0.),
                        hole: hole(p, 3),
                    },
                _ => return Err("polygon needs a diameter and 3 to 12 vertices"),
            },
            name => ApertureShape::Macro { template: name.into(), params: p.to_vec() },
        })
    }

    fn hole(&self) -> Option<f64> {
        match *self {
            ApertureShape::Circle { hole, .. } |
            ApertureShape::Rectangle { hole, .. } |
            ApertureShape::Obround { hole, .. } |
            ApertureShape::Polygon { hole, .. } => hole,
            ApertureShape::Macro { .. } => None,
        }
    }

    fn polygon_vertices(diameter: f64, vertices: u32, rotation: f64) -> impl Iterator<Item=Point> {
        let start = rotation.to_radians();
        let n = vertices.clamp(3, MAX_POLYGON_VERTICES as u32);
        (0..n).map(move |i| {
            Point::ORIGIN + Vec2::from_angle(start - TAU * i as f64 / n as f64) * (diameter / 2.)
        })
    }
}

/// An aperture of the document catalogue.
#[derive(Clone, Debug, PartialEq)]
pub struct Aperture {
    pub dcode: u32,
    pub shape: ApertureShape,
    /// `TA` attributes in effect when the aperture was defined.
    pub attributes: Vec<Attribute>,
}

impl Aperture {
    pub fn new(dcode: u32, shape: ApertureShape) -> Self {
        Aperture { dcode, shape, attributes: vec![] }
    }

    /// Diameter, if this is a circle.
    pub fn circle_diameter(&self) -> Option<f64> {
        match self.shape {
            ApertureShape::Circle { diameter, .. } => Some(diameter),
            _ => None,
        }
    }

    pub fn bounding_box(&self, templates: &Templates) -> BoundingBox {
        let origin = Point::ORIGIN;
        match &self.shape {
            ApertureShape::Circle { diameter, .. } =>
                BoundingBox::around(origin, diameter / 2., diameter / 2.),
            ApertureShape::Rectangle { width, height, .. } |
            ApertureShape::Obround { width, height, .. } =>
                BoundingBox::around(origin, width / 2., height / 2.),
            ApertureShape::Polygon { diameter, vertices, rotation, .. } =>
                BoundingBox::from_points(ApertureShape::polygon_vertices(*diameter, *vertices, *rotation)),
            ApertureShape::Macro { template, params } => templates.get(template)
                .map_or(BoundingBox::EMPTY, |tpl| tpl.bounding_box(params)),
        }
    }

    /// Width of a line drawn with this aperture.  Only exact for circles; for
    /// other shapes the larger extent is used.
    pub fn stroke_width(&self, templates: &Templates) -> f64 {
        match self.circle_diameter() {
            Some(diameter) => diameter,
            None => {
                let bbox = self.bounding_box(templates);
                bbox.width().max(bbox.height())
            }
        }
    }

    /// Painted outline of the aperture with the given polarity.
    ///
    /// The outer boundary is clockwise and a hole counter-clockwise, filled
    /// with the even-odd rule.
    pub fn outline(&self, templates: &Templates, opts: &RenderOptions, polarity: Polarity) -> Vec<Shape> {
        let origin = Point::ORIGIN;
        let mut b = PathBuilder::new(opts.fidelity());
        match &self.shape {
            ApertureShape::Circle { diameter, .. } => {
                b.circle(origin, diameter / 2., true);
            }
            ApertureShape::Rectangle { width, height, .. } => {
                let (hw, hh) = (width / 2., height / 2.);
                b.polygon([Point::new(-hw, -hh), Point::new(-hw, hh),
                           Point::new(hw, hh), Point::new(hw, -hh)]);
            }
            ApertureShape::Obround { width, height, .. } => {
                let (hw, hh) = (width / 2., height / 2.);
                if width >= height {
                    let f = hw - hh;
                    b.move_to(Point::new(-f, hh))
                        .line_to(Point::new(f, hh))
                        .arc_to(Point::new(f, 0.), Point::new(f, -hh), true)
                        .line_to(Point::new(-f, -hh))
                        .arc_to(Point::new(-f, 0.), Point::new(-f, hh), true)
                        .close();
                } else {
                    let f = hh - hw;
                    b.move_to(Point::new(hw, f))
                        .line_to(Point::new(hw, -f))
                        .arc_to(Point::new(0., -f), Point::new(-hw, -f), true)
                        .line_to(Point::new(-hw, f))
                        .arc_to(Point::new(0., f), Point::new(hw, f), true)
                        .close();
                }
            }
            ApertureShape::Polygon { diameter, vertices, rotation, .. } => {
                b.polygon(ApertureShape::polygon_vertices(*diameter, *vertices, *rotation));
            }
            ApertureShape::Macro { template, params } => {
                return templates.get(template)
                    .map(|tpl| tpl.outline(params, opts, polarity))
                    .unwrap_or_default();
            }
        }
        let hole = self.shape.hole();
        if let Some(diameter) = hole {
            b.circle(origin, diameter / 2., false);
        }
        vec![Shape::Fill { path: b.finish(), polarity, even_odd: hole.is_some() }]
    }
}

impl fmt::Display for ApertureShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApertureShape::Circle { diameter, .. } => write!(f, "C,{}", diameter)?,
            ApertureShape::Rectangle { width, height, .. } => write!(f, "R,{}X{}", width, height)?,
            ApertureShape::Obround { width, height, .. } => write!(f, "O,{}X{}", width, height)?,
            ApertureShape::Polygon { diameter, vertices, rotation, .. } =>
                write!(f, "P,{}X{}X{}", diameter, vertices, rotation)?,
            ApertureShape::Macro { template, params } => {
                write!(f, "{}", template)?;
                for (i, p) in params.iter().enumerate() {
                    write!(f, "{}{}", if i == 0 { "," } else { "X" }, p)?;
                }
            }
        }
        if let Some(hole) = self.hole() {
            write!(f, " (hole {})", hole)?;
        }
        Ok(())
    }
}

impl fmt::Display for Aperture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "D{} {}", self.dcode, self.shape)
    }
}
