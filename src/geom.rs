// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! Geometry primitives: bounding boxes, arc math and outline paths.
//!
//! Outlines are built either *exact*, with true circular arc segments, or
//! *polygonized*, with arcs broken into straight segments for consumers that
//! cannot draw arcs.  Both go through `PathBuilder` so that the full-circle
//! and sweep rules live in one place.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use kurbo::{Affine, Point, Vec2};

/// Start and end points closer than this make an arc a full circle.
pub const FULL_CIRCLE_EPSILON: f64 = 1e-4;

const EPSILON: f64 = 1e-12;

/// An axis-aligned box.  `EMPTY` is inverted so that including any point
/// yields a valid box.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub const EMPTY: Self = BoundingBox {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox { min_x, min_y, max_x, max_y }
    }

    /// A box of half-extents `rx`, `ry` around `center`.
    pub fn around(center: Point, rx: f64, ry: f64) -> Self {
        BoundingBox::new(center.x - rx, center.y - ry, center.x + rx, center.y + ry)
    }

    pub fn from_points(points: impl IntoIterator<Item=Point>) -> Self {
        let mut bbox = Self::EMPTY;
        for p in points {
            bbox.include(p);
        }
        bbox
    }

    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        if self.is_valid() { self.max_x - self.min_x } else { 0. }
    }

    pub fn height(&self) -> f64 {
        if self.is_valid() { self.max_y - self.min_y } else { 0. }
    }

    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2., (self.min_y + self.max_y) / 2.)
    }

    pub fn corners(&self) -> [Point; 4] {
        [Point::new(self.min_x, self.min_y), Point::new(self.max_x, self.min_y),
         Point::new(self.max_x, self.max_y), Point::new(self.min_x, self.max_y)]
    }

    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, other: &BoundingBox) -> Self {
        BoundingBox::new(self.min_x.min(other.min_x), self.min_y.min(other.min_y),
                         self.max_x.max(other.max_x), self.max_y.max(other.max_y))
    }

    pub fn expand(&self, margin: f64) -> Self {
        if !self.is_valid() {
            return *self;
        }
        BoundingBox::new(self.min_x - margin, self.min_y - margin,
                         self.max_x + margin, self.max_y + margin)
    }

    /// The box swept by `shape` (relative to its own origin) when its origin
    /// moves over this box.  An invalid `shape` leaves the box unchanged.
    pub fn sweep(&self, shape: &BoundingBox) -> Self {
        if !self.is_valid() || !shape.is_valid() {
            return *self;
        }
        BoundingBox::new(self.min_x + shape.min_x, self.min_y + shape.min_y,
                         self.max_x + shape.max_x, self.max_y + shape.max_y)
    }

    pub fn translate(&self, offset: Vec2) -> Self {
        BoundingBox::new(self.min_x + offset.x, self.min_y + offset.y,
                         self.max_x + offset.x, self.max_y + offset.y)
    }

    /// Box of the transformed corners.
    pub fn transform(&self, affine: Affine) -> Self {
        if !self.is_valid() {
            return *self;
        }
        Self::from_points(self.corners().iter().map(|&p| affine * p))
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Rotation by `degrees` counter-clockwise around the origin.
pub fn rotation(degrees: f64) -> Affine {
    Affine::rotate(degrees.to_radians())
}

pub fn is_full_circle(start: Point, end: Point) -> bool {
    start.distance(end) < FULL_CIRCLE_EPSILON
}

/// Angle swept going from `start` to `end` around `center` in the declared
/// direction, normalized into (0, 2π].
pub fn arc_sweep(start: Point, end: Point, center: Point, clockwise: bool) -> f64 {
    let a0 = (start - center).atan2();
    let a1 = (end - center).atan2();
    let sweep = if clockwise { a0 - a1 } else { a1 - a0 };
    if sweep <= 0. { sweep + TAU } else { sweep }
}

pub fn large_arc(sweep: f64) -> bool {
    sweep > PI
}

/// SVG sweep bit for an arc of the given direction.  With a flipped y axis
/// the visual winding is reversed.
pub fn sweep_flag(clockwise: bool, flip_y: bool) -> bool {
    clockwise != flip_y
}

/// Exact extents of an arc, including any axis extremes it passes.
pub fn arc_bounds(start: Point, end: Point, center: Point, clockwise: bool) -> BoundingBox {
    let radius = start.distance(center);
    let sweep = if is_full_circle(start, end) { TAU } else { arc_sweep(start, end, center, clockwise) };
    let a0 = (start - center).atan2();
    let mut bbox = BoundingBox::from_points([start, end]);
    for k in 0..4 {
        let theta = k as f64 * FRAC_PI_2;
        let offset = if clockwise { a0 - theta } else { theta - a0 };
        if offset.rem_euclid(TAU) <= sweep {
            bbox.include(center + Vec2::from_angle(theta) * radius);
        }
    }
    bbox
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Segment {
    Line(Point),
    Arc {
        end: Point,
        center: Point,
        radius: f64,
        clockwise: bool,
        large_arc: bool,
    },
}

impl Segment {
    pub fn end(&self) -> Point {
        match *self {
            Segment::Line(end) | Segment::Arc { end, .. } => end,
        }
    }

    fn transform(&self, affine: Affine) -> Self {
        match *self {
            Segment::Line(end) => Segment::Line(affine * end),
            Segment::Arc { end, center, radius, clockwise, large_arc } => {
                let det = affine.determinant();
                Segment::Arc {
                    end: affine * end,
                    center: affine * center,
                    radius: radius * det.abs().sqrt(),
                    clockwise: clockwise != (det < 0.),
                    large_arc,
                }
            }
        }
    }
}

/// A connected piece of a path.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Subpath {
    pub start: Point,
    pub segments: Vec<Segment>,
    pub closed: bool,
}

impl Subpath {
    pub fn end(&self) -> Point {
        self.segments.last().map_or(self.start, Segment::end)
    }

    pub fn has_arcs(&self) -> bool {
        self.segments.iter().any(|seg| matches!(seg, Segment::Arc { .. }))
    }

    /// Start point followed by all segment end points.
    pub fn vertices(&self) -> impl Iterator<Item=Point> + '_ {
        std::iter::once(self.start).chain(self.segments.iter().map(Segment::end))
    }

    /// Shoelace area of the vertex polygon: positive when counter-clockwise.
    /// Arc bulges are not counted.
    pub fn signed_area(&self) -> f64 {
        let vertices: Vec<_> = self.vertices().collect();
        let n = vertices.len();
        (0..n).map(|i| {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        }).sum::<f64>() / 2.
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::from_points([self.start]);
        let mut prev = self.start;
        for seg in &self.segments {
            match *seg {
                Segment::Line(end) => bbox.include(end),
                Segment::Arc { end, center, clockwise, .. } =>
                    bbox = bbox.union(&arc_bounds(prev, end, center, clockwise)),
            }
            prev = seg.end();
        }
        bbox
    }

    pub fn transform(&self, affine: Affine) -> Self {
        Subpath {
            start: affine * self.start,
            segments: self.segments.iter().map(|seg| seg.transform(affine)).collect(),
            closed: self.closed,
        }
    }
}

/// An outline made of subpaths.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Path {
    pub subpaths: Vec<Subpath>,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn has_arcs(&self) -> bool {
        self.subpaths.iter().any(Subpath::has_arcs)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.subpaths.iter().fold(BoundingBox::EMPTY, |bbox, sp| bbox.union(&sp.bounding_box()))
    }

    pub fn transform(&self, affine: Affine) -> Self {
        Path { subpaths: self.subpaths.iter().map(|sp| sp.transform(affine)).collect() }
    }

    /// Append all subpaths of `other`.
    pub fn extend(&mut self, other: Path) {
        self.subpaths.extend(other.subpaths);
    }
}

/// How arcs end up in an outline.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Fidelity {
    Exact,
    /// Straight segments; a full circle gets `circle_segments` of them.
    Polygonized { circle_segments: u32 },
}

/// Incremental construction of a `Path`.
pub struct PathBuilder {
    fidelity: Fidelity,
    subpaths: Vec<Subpath>,
    current: Option<Subpath>,
}

impl PathBuilder {
    pub fn new(fidelity: Fidelity) -> Self {
        PathBuilder { fidelity, subpaths: vec![], current: None }
    }

    fn flush(&mut self) {
        if let Some(sp) = self.current.take() {
            self.subpaths.push(sp);
        }
    }

    fn current_point(&self) -> Option<Point> {
        self.current.as_ref().map(Subpath::end)
    }

    fn push(&mut self, seg: Segment) {
        if let Some(sp) = &mut self.current {
            sp.segments.push(seg);
        }
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.flush();
        self.current = Some(Subpath { start: p, segments: vec![], closed: false });
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        if self.current.is_none() {
            return self.move_to(p);
        }
        self.push(Segment::Line(p));
        self
    }

    /// Arc from the current point to `end` around `center`.  Coinciding
    /// start and end points describe a full circle, which is emitted as two
    /// half turns through the opposite point.
    pub fn arc_to(&mut self, center: Point, end: Point, clockwise: bool) -> &mut Self {
        let start = match self.current_point() {
            Some(p) => p,
            None => return self.move_to(end),
        };
        if start.distance(center) < EPSILON {
            return self.line_to(end);
        }
        if is_full_circle(start, end) {
            let opposite = center + (center - start);
            self.push_arc(center, start, opposite, clockwise, PI);
            self.push_arc(center, opposite, start, clockwise, PI);
        } else {
            let sweep = arc_sweep(start, end, center, clockwise);
            self.push_arc(center, start, end, clockwise, sweep);
        }
        self
    }

    fn push_arc(&mut self, center: Point, start: Point, end: Point, clockwise: bool, sweep: f64) {
        let radius = start.distance(center);
        match self.fidelity {
            Fidelity::Exact => self.push(Segment::Arc {
                end, center, radius, clockwise, large_arc: large_arc(sweep),
            }),
            Fidelity::Polygonized { circle_segments } => {
                let n = ((circle_segments.max(3) as f64) * sweep / TAU).ceil().max(1.) as usize;
                let a0 = (start - center).atan2();
                let step = if clockwise { -sweep } else { sweep } / n as f64;
                for k in 1..n {
                    self.push(Segment::Line(center + Vec2::from_angle(a0 + step * k as f64) * radius));
                }
                self.push(Segment::Line(end));
            }
        }
    }

    pub fn close(&mut self) -> &mut Self {
        if let Some(sp) = &mut self.current {
            sp.closed = true;
        }
        self.flush();
        self
    }

    /// A closed full circle starting at its rightmost point.
    pub fn circle(&mut self, center: Point, radius: f64, clockwise: bool) -> &mut Self {
        let start = center + Vec2::new(radius, 0.);
        self.move_to(start).arc_to(center, start, clockwise).close()
    }

    /// A closed polygon through `points`.
    pub fn polygon(&mut self, points: impl IntoIterator<Item=Point>) -> &mut Self {
        let mut points = points.into_iter();
        if let Some(first) = points.next() {
            self.move_to(first);
            for p in points {
                self.line_to(p);
            }
            self.close();
        }
        self
    }

    /// Outline of a straight stroke of half width `hw` with round caps,
    /// traversed clockwise.
    pub fn stroke_line(&mut self, from: Point, to: Point, hw: f64) -> &mut Self {
        let d = to - from;
        let len = d.hypot();
        if len < EPSILON {
            return self.circle(from, hw, true);
        }
        let n = Vec2::new(-d.y, d.x) * (hw / len);
        self.move_to(from + n)
            .line_to(to + n)
            .arc_to(to, to - n, true)
            .line_to(from - n)
            .arc_to(from, from + n, true)
            .close()
    }

    /// Outline of a circular-arc stroke of half width `hw` with round caps.
    pub fn stroke_arc(&mut self, start: Point, end: Point, center: Point,
                      clockwise: bool, hw: f64) -> &mut Self {
        let radius = start.distance(center);
        if radius < EPSILON {
            return self.stroke_line(start, end, hw);
        }
        let us = (start - center) / radius;
        let ue = (end - center) / end.distance(center).max(EPSILON);
        let outer = radius + hw;
        let inner = (radius - hw).max(0.);
        self.move_to(center + us * outer)
            .arc_to(center, center + ue * outer, clockwise)
            .arc_to(end, center + ue * inner, clockwise);
        if inner > EPSILON {
            self.arc_to(center, center + us * inner, !clockwise);
        } else {
            self.line_to(center);
        }
        self.arc_to(start, center + us * outer, clockwise).close()
    }

    pub fn finish(mut self) -> Path {
        self.flush();
        Path { subpaths: self.subpaths }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_sweep() {
        let c = Point::ORIGIN;
        let (e, n, w) = (Point::new(1., 0.), Point::new(0., 1.), Point::new(-1., 0.));
        assert!(close(arc_sweep(e, n, c, false), FRAC_PI_2));
        assert!(close(arc_sweep(e, n, c, true), 3. * FRAC_PI_2));
        assert!(close(arc_sweep(e, w, c, false), PI));
        assert!(close(arc_sweep(e, e, c, true), TAU));
        assert!(!large_arc(arc_sweep(e, n, c, false)));
        assert!(large_arc(arc_sweep(e, n, c, true)));

        // arbitrary center and radius
        let c = Point::new(3., -2.);
        for &(deg0, deg1, cw) in &[(10., 100., false), (10., 100., true), (350., 20., false), (-45., 200., true)] {
            let r = 2.5;
            let s = c + Vec2::from_angle(f64::to_radians(deg0)) * r;
            let t = c + Vec2::from_angle(f64::to_radians(deg1)) * r;
            let expected = if cw { deg0 - deg1 } else { deg1 - deg0 };
            let expected = f64::to_radians(expected).rem_euclid(TAU);
            assert!((arc_sweep(s, t, c, cw) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sweep_flag() {
        assert!(!sweep_flag(true, true));
        assert!(sweep_flag(false, true));
        assert!(sweep_flag(true, false));
    }

    #[test]
    fn test_arc_bounds() {
        let c = Point::ORIGIN;
        let bbox = arc_bounds(Point::new(1., 0.), Point::new(-1., 0.), c, false);
        assert_eq!(bbox, BoundingBox::new(-1., 0., 1., 1.));
        let bbox = arc_bounds(Point::new(1., 0.), Point::new(-1., 0.), c, true);
        assert!(close(bbox.min_y, -1.) && close(bbox.max_y, 0.));
        assert!(close(bbox.min_x, -1.) && close(bbox.max_x, 1.));
        let bbox = arc_bounds(Point::new(0., 2.), Point::new(0., 2.), c, true);
        assert!(close(bbox.min_x, -2.) && close(bbox.max_y, 2.) && close(bbox.min_y, -2.));
    }

    #[test]
    fn test_full_circle() {
        let mut b = PathBuilder::new(Fidelity::Exact);
        b.move_to(Point::new(2., 0.)).arc_to(Point::new(1., 0.), Point::new(2., 0.00001), false);
        let path = b.finish();
        let segs = &path.subpaths[0].segments;
        assert_eq!(segs.len(), 2);
        match segs[0] {
            Segment::Arc { end, radius, .. } => {
                assert_eq!(end, Point::new(0., 0.));
                assert!(close(radius, 1.));
            }
            _ => panic!("expected arc"),
        }
        assert_eq!(segs[1].end(), Point::new(2., 0.));
    }

    #[test]
    fn test_polygonized_circle() {
        let mut b = PathBuilder::new(Fidelity::Polygonized { circle_segments: 16 });
        b.circle(Point::ORIGIN, 1., true);
        let path = b.finish();
        assert!(!path.has_arcs());
        assert_eq!(path.subpaths[0].segments.len(), 16);
        assert!(path.subpaths[0].signed_area() < 0.);
        let bbox = path.bounding_box();
        assert!(close(bbox.max_x, 1.) && close(bbox.min_x, -1.));
    }

    #[test]
    fn test_stroke_line() {
        let mut b = PathBuilder::new(Fidelity::Polygonized { circle_segments: 32 });
        b.stroke_line(Point::new(0., 0.), Point::new(2., 0.), 0.5);
        let path = b.finish();
        let bbox = path.bounding_box();
        assert!(close(bbox.min_x, -0.5) && close(bbox.max_x, 2.5));
        assert!(close(bbox.min_y, -0.5) && close(bbox.max_y, 0.5));
        assert!(path.subpaths[0].signed_area() < 0.);
    }

    #[test]
    fn test_transform_mirror() {
        let mut b = PathBuilder::new(Fidelity::Exact);
        b.move_to(Point::new(1., 0.)).arc_to(Point::ORIGIN, Point::new(0., 1.), false);
        let path = b.finish().transform(Affine::FLIP_X * Affine::scale(2.));
        match path.subpaths[0].segments[0] {
            Segment::Arc { end, radius, clockwise, .. } => {
                assert_eq!(end, Point::new(0., 2.));
                assert!(close(radius, 2.));
                assert!(clockwise);
            }
            _ => panic!("expected arc"),
        }
    }

    #[test]
    fn test_bbox() {
        assert!(!BoundingBox::EMPTY.is_valid());
        assert_eq!(BoundingBox::EMPTY.width(), 0.);
        let bbox = BoundingBox::from_points([Point::new(1., 2.), Point::new(-1., 0.)]);
        assert_eq!(bbox, BoundingBox::new(-1., 0., 1., 2.));
        assert_eq!(bbox.sweep(&BoundingBox::around(Point::ORIGIN, 0.5, 0.25)),
                   BoundingBox::new(-1.5, -0.25, 1.5, 2.25));
        assert_eq!(bbox.sweep(&BoundingBox::EMPTY), bbox);
        assert_eq!(BoundingBox::EMPTY.union(&bbox), bbox);
    }
}
