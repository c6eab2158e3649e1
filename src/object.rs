// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! Graphics objects emitted by the interpreter.

use std::fmt;
use kurbo::{Affine, Point, Vec2};

use crate::document::{Document, Polarity};
use crate::geom::{arc_bounds, rotation, BoundingBox, PathBuilder};
use crate::render::{RenderOptions, Shape};

/// Aperture transformation set by `LR`, `LS` and `LM`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LoadTransform {
    /// Degrees, counter-clockwise.
    pub rotation: f64,
    pub scale: f64,
    pub mirror_x: bool,
    pub mirror_y: bool,
}

impl Default for LoadTransform {
    fn default() -> Self {
        LoadTransform { rotation: 0., scale: 1., mirror_x: false, mirror_y: false }
    }
}

impl LoadTransform {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// The transform applied to aperture geometry: scale, then rotate, then
    /// mirror.
    pub fn affine(&self) -> Affine {
        let mirror = Affine::scale_non_uniform(if self.mirror_x { -1. } else { 1. },
                                               if self.mirror_y { -1. } else { 1. });
        mirror * rotation(self.rotation) * Affine::scale(self.scale)
    }
}

/// A straight line drawn with an aperture.
#[derive(Clone, Debug, PartialEq)]
pub struct Draw {
    pub start: Point,
    pub end: Point,
    pub aperture: u32,
    pub polarity: Polarity,
}

/// A circular arc drawn with an aperture.
#[derive(Clone, Debug, PartialEq)]
pub struct Arc {
    pub start: Point,
    pub end: Point,
    pub center: Point,
    pub clockwise: bool,
    pub aperture: u32,
    pub polarity: Polarity,
}

/// An aperture stamped at a point.
#[derive(Clone, Debug, PartialEq)]
pub struct Flash {
    pub position: Point,
    pub aperture: u32,
    pub transform: LoadTransform,
    pub polarity: Polarity,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContourSegment {
    Line { end: Point },
    Arc { end: Point, center: Point, clockwise: bool },
}

impl ContourSegment {
    pub fn end(&self) -> Point {
        match *self {
            ContourSegment::Line { end } | ContourSegment::Arc { end, .. } => end,
        }
    }

    fn translate(&self, offset: Vec2) -> Self {
        match *self {
            ContourSegment::Line { end } => ContourSegment::Line { end: end + offset },
            ContourSegment::Arc { end, center, clockwise } => ContourSegment::Arc {
                end: end + offset, center: center + offset, clockwise,
            },
        }
    }
}

/// One closed boundary of a region.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    pub start: Point,
    pub segments: Vec<ContourSegment>,
}

impl Contour {
    pub fn new(start: Point) -> Self {
        Contour { start, segments: vec![] }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::from_points([self.start]);
        let mut prev = self.start;
        for seg in &self.segments {
            match *seg {
                ContourSegment::Line { end } => bbox.include(end),
                ContourSegment::Arc { end, center, clockwise } =>
                    bbox = bbox.union(&arc_bounds(prev, end, center, clockwise)),
            }
            prev = seg.end();
        }
        bbox
    }

    fn build(&self, b: &mut PathBuilder) {
        b.move_to(self.start);
        for seg in &self.segments {
            match *seg {
                ContourSegment::Line { end } => b.line_to(end),
                ContourSegment::Arc { end, center, clockwise } => b.arc_to(center, end, clockwise),
            };
        }
        b.close();
    }

    fn translate(&self, offset: Vec2) -> Self {
        Contour {
            start: self.start + offset,
            segments: self.segments.iter().map(|seg| seg.translate(offset)).collect(),
        }
    }
}

/// A filled area bounded by contours.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub contours: Vec<Contour>,
    pub polarity: Polarity,
}

/// Anything that paints: the document is an ordered list of these.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphicsObject {
    Draw(Draw),
    Arc(Arc),
    Flash(Flash),
    Region(Region),
}

impl GraphicsObject {
    pub fn polarity(&self) -> Polarity {
        match self {
            GraphicsObject::Draw(draw) => draw.polarity,
            GraphicsObject::Arc(arc) => arc.polarity,
            GraphicsObject::Flash(flash) => flash.polarity,
            GraphicsObject::Region(region) => region.polarity,
        }
    }

    /// D-code of the aperture used, regions have none.
    pub fn aperture(&self) -> Option<u32> {
        match self {
            GraphicsObject::Draw(draw) => Some(draw.aperture),
            GraphicsObject::Arc(arc) => Some(arc.aperture),
            GraphicsObject::Flash(flash) => Some(flash.aperture),
            GraphicsObject::Region(_) => None,
        }
    }

    /// A copy moved by `offset`.
    pub fn translate(&self, offset: Vec2) -> Self {
        match self {
            GraphicsObject::Draw(draw) => GraphicsObject::Draw(Draw {
                start: draw.start + offset, end: draw.end + offset, ..draw.clone()
            }),
            GraphicsObject::Arc(arc) => GraphicsObject::Arc(Arc {
                start: arc.start + offset, end: arc.end + offset, center: arc.center + offset,
                ..arc.clone()
            }),
            GraphicsObject::Flash(flash) => GraphicsObject::Flash(Flash {
                position: flash.position + offset, ..flash.clone()
            }),
            GraphicsObject::Region(region) => GraphicsObject::Region(Region {
                contours: region.contours.iter().map(|c| c.translate(offset)).collect(),
                polarity: region.polarity,
            }),
        }
    }

    fn aperture_box(&self, doc: &Document) -> BoundingBox {
        self.aperture()
            .and_then(|dcode| doc.aperture(dcode))
            .map_or(BoundingBox::EMPTY, |ap| ap.bounding_box(doc.templates()))
    }

    pub fn bounding_box(&self, doc: &Document) -> BoundingBox {
        match self {
            GraphicsObject::Draw(draw) =>
                BoundingBox::from_points([draw.start, draw.end]).sweep(&self.aperture_box(doc)),
            GraphicsObject::Arc(arc) =>
                arc_bounds(arc.start, arc.end, arc.center, arc.clockwise).sweep(&self.aperture_box(doc)),
            GraphicsObject::Flash(flash) => {
                let bbox = self.aperture_box(doc).transform(flash.transform.affine());
                if bbox.is_valid() {
                    bbox.translate(flash.position.to_vec2())
                } else {
                    BoundingBox::from_points([flash.position])
                }
            }
            GraphicsObject::Region(region) => region.contours.iter()
                .fold(BoundingBox::EMPTY, |bbox, c| bbox.union(&c.bounding_box())),
        }
    }

    /// Painted outline in document coordinates.
    ///
    /// Draws and arcs are strokes in exact mode and filled outlines with
    /// round caps when polygonizing.  Flashes are instances of the aperture
    /// definition.
    pub fn outline(&self, doc: &Document, opts: &RenderOptions) -> Vec<Shape> {
        let polarity = self.polarity();
        let width = self.aperture()
            .and_then(|dcode| doc.aperture(dcode))
            .map_or(0., |ap| ap.stroke_width(doc.templates()));
        let mut b = PathBuilder::new(opts.fidelity());
        match self {
            GraphicsObject::Draw(draw) => if opts.polygonize {
                b.stroke_line(draw.start, draw.end, width / 2.);
            } else {
                b.move_to(draw.start).line_to(draw.end);
                return vec![Shape::Stroke { path: b.finish(), polarity, width }];
            },
            GraphicsObject::Arc(arc) => if opts.polygonize {
                b.stroke_arc(arc.start, arc.end, arc.center, arc.clockwise, width / 2.);
            } else {
                b.move_to(arc.start).arc_to(arc.center, arc.end, arc.clockwise);
                return vec![Shape::Stroke { path: b.finish(), polarity, width }];
            },
            GraphicsObject::Flash(flash) => {
                let transform = Affine::translate(flash.position.to_vec2()) * flash.transform.affine();
                return vec![Shape::Instance { dcode: flash.aperture, polarity, transform }];
            }
            GraphicsObject::Region(region) => {
                for contour in &region.contours {
                    contour.build(&mut b);
                }
                return vec![Shape::Fill { path: b.finish(), polarity, even_odd: true }];
            }
        }
        vec![Shape::Fill { path: b.finish(), polarity, even_odd: false }]
    }
}

impl fmt::Display for GraphicsObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GraphicsObject::Draw(d) => write!(f, "Draw D{} ({}, {}) -> ({}, {})",
                                              d.aperture, d.start.x, d.start.y, d.end.x, d.end.y)?,
            GraphicsObject::Arc(a) => write!(f, "Arc D{} ({}, {}) -> ({}, {}) around ({}, {}) {}",
                                             a.aperture, a.start.x, a.start.y, a.end.x, a.end.y,
                                             a.center.x, a.center.y, if a.clockwise { "CW" } else { "CCW" })?,
            GraphicsObject::Flash(fl) => {
                write!(f, "Flash D{} at ({}, {})", fl.aperture, fl.position.x, fl.position.y)?;
                if !fl.transform.is_identity() {
                    write!(f, " {:?}", fl.transform)?;
                }
            }
            GraphicsObject::Region(r) => write!(f, "Region with {} contour(s)", r.contours.len())?,
        }
        if self.polarity() == Polarity::Clear {
            write!(f, " [clear]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aperture::{Aperture, ApertureShape};
    use crate::geom::Segment;

    fn doc_with_circle(diameter: f64) -> Document {
        let mut doc = Document::new();
        doc.apertures.insert(10, Aperture::new(10, ApertureShape::Circle { diameter, hole: None }));
        doc
    }

    #[test]
    fn test_draw_bbox() {
        let doc = doc_with_circle(0.5);
        let draw = GraphicsObject::Draw(Draw {
            start: Point::new(0., 0.), end: Point::new(1., 1.), aperture: 10, polarity: Polarity::Dark,
        });
        assert_eq!(draw.bounding_box(&doc), BoundingBox::new(-0.25, -0.25, 1.25, 1.25));
        let moved = draw.translate(Vec2::new(1., 0.));
        assert_eq!(moved.bounding_box(&doc), BoundingBox::new(0.75, -0.25, 2.25, 1.25));
    }

    #[test]
    fn test_flash_transform() {
        let mut doc = Document::new();
        doc.apertures.insert(11, Aperture::new(11, ApertureShape::Rectangle {
            width: 2., height: 1., hole: None,
        }));
        let flash = GraphicsObject::Flash(Flash {
            position: Point::new(5., 5.),
            aperture: 11,
            transform: LoadTransform { rotation: 90., scale: 2., ..Default::default() },
            polarity: Polarity::Dark,
        });
        let bbox = flash.bounding_box(&doc);
        assert!((bbox.width() - 2.).abs() < 1e-9 && (bbox.height() - 4.).abs() < 1e-9);
        assert!((bbox.center().x - 5.).abs() < 1e-9);
    }

    #[test]
    fn test_region_outline() {
        let doc = Document::new();
        let mut outer = Contour::new(Point::new(0., 0.));
        outer.segments.extend([Point::new(4., 0.), Point::new(4., 4.), Point::new(0., 4.)]
                              .iter().map(|&end| ContourSegment::Line { end }));
        let mut inner = Contour::new(Point::new(3., 2.));
        inner.segments.push(ContourSegment::Arc {
            end: Point::new(3., 2.), center: Point::new(2., 2.), clockwise: false,
        });
        let region = GraphicsObject::Region(Region { contours: vec![outer, inner], polarity: Polarity::Dark });
        assert_eq!(region.bounding_box(&doc), BoundingBox::new(0., 0., 4., 4.));
        match &region.outline(&doc, &RenderOptions::default())[..] {
            [Shape::Fill { path, even_odd: true, .. }] => {
                assert_eq!(path.subpaths.len(), 2);
                assert!(path.subpaths.iter().all(|sp| sp.closed));
                // the full-circle contour is split in two half turns
                assert_eq!(path.subpaths[1].segments.len(), 2);
                assert!(matches!(path.subpaths[1].segments[0], Segment::Arc { .. }));
            }
            _ => panic!("expected a single even-odd fill"),
        }
    }

    #[test]
    fn test_arc_stroke() {
        let doc = doc_with_circle(0.2);
        let arc = GraphicsObject::Arc(Arc {
            start: Point::new(1., 0.), end: Point::new(0., 1.), center: Point::ORIGIN,
            clockwise: false, aperture: 10, polarity: Polarity::Clear,
        });
        let bbox = arc.bounding_box(&doc);
        assert!((bbox.max_x - 1.1).abs() < 1e-9 && (bbox.min_x + 0.1).abs() < 1e-9);
        match &arc.outline(&doc, &RenderOptions::default())[..] {
            [Shape::Stroke { width, polarity, .. }] => {
                assert_eq!(*width, 0.2);
                assert_eq!(*polarity, Polarity::Clear);
            }
            _ => panic!("expected a stroke"),
        }
        let shapes = arc.outline(&doc, &RenderOptions::default().polygonized(32));
        assert!(matches!(&shapes[..], [Shape::Fill { even_odd: false, .. }]));
    }
}
