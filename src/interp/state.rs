// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use kurbo::{Point, Vec2};
use strum_macros::Display;

use crate::document::{Notation, Polarity};
use crate::object::{Contour, LoadTransform, Region};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
pub enum Interpolation {
    Linear,             // G01
    Clockwise,          // G02
    CounterClockwise,   // G03
}

impl Interpolation {
    /// Arc direction, or `None` for straight segments.
    pub fn clockwise(self) -> Option<bool> {
        match self {
            Interpolation::Linear => None,
            Interpolation::Clockwise => Some(true),
            Interpolation::CounterClockwise => Some(false),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
pub enum QuadrantMode {
    Single,     // G74
    Multi,      // G75
}

/// Coordinate words seen since the last operation.
///
/// Never mutated in place: each coordinate token produces a new value that
/// replaces the old one, and every D01/D02/D03 resets it.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Pending {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub i: Option<f64>,
    pub j: Option<f64>,
}

impl Pending {
    /// Words from `newer` override the ones already pending.
    pub fn merge(self, newer: Pending) -> Pending {
        Pending {
            x: newer.x.or(self.x),
            y: newer.y.or(self.y),
            i: newer.i.or(self.i),
            j: newer.j.or(self.j),
        }
    }

    /// The point an operation moves to.  Missing axes keep their value.
    pub fn target(&self, current: Point, notation: Notation) -> Point {
        match notation {
            Notation::Absolute => Point::new(self.x.unwrap_or(current.x),
                                             self.y.unwrap_or(current.y)),
            Notation::Incremental => current + Vec2::new(self.x.unwrap_or(0.),
                                                         self.y.unwrap_or(0.)),
        }
    }

    /// Arc center offset from the start point.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.i.unwrap_or(0.), self.j.unwrap_or(0.))
    }
}

/// Modal state carried from one command to the next.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphicsState {
    pub point: Point,
    pub pending: Pending,
    pub aperture: Option<u32>,
    pub polarity: Polarity,
    pub interpolation: Interpolation,
    pub quadrant: QuadrantMode,
    pub region: Option<Region>,
    pub contour: Option<Contour>,
    pub transform: LoadTransform,
}

impl Default for GraphicsState {
    fn default() -> Self {
        GraphicsState {
            point: Point::ORIGIN,
            pending: Pending::default(),
            aperture: None,
            polarity: Polarity::Dark,
            interpolation: Interpolation::Linear,
            quadrant: QuadrantMode::Single,
            region: None,
            contour: None,
            transform: LoadTransform::default(),
        }
    }
}

impl GraphicsState {
    pub fn in_region(&self) -> bool {
        self.region.is_some()
    }

    /// Move the open contour, if it has any segments, into the open region.
    pub fn flush_contour(&mut self) {
        if let Some(contour) = self.contour.take() {
            match &mut self.region {
                Some(region) if !contour.is_empty() => region.contours.push(contour),
                _ => (),
            }
        }
    }

    /// Close the open region, returning it when it has something to fill.
    pub fn close_region(&mut self) -> Option<Region> {
        self.flush_contour();
        self.region.take().filter(|region| !region.contours.is_empty())
    }
}
