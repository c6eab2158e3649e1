// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! Render options and the painted shapes produced by outline generators.

use kurbo::Affine;

use crate::document::Polarity;
use crate::geom::{BoundingBox, Fidelity, Path};

#[cfg(feature = "svg")]
pub mod svg;

/// Options shared by all outline generators.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    /// Replace arcs by straight segments.
    pub polygonize: bool,
    /// Segments per full circle when polygonizing.
    pub circle_segments: u32,
    pub dark_color: String,
    pub clear_color: String,
    /// Whether the output coordinate system has y pointing down, so that
    /// the geometry must be flipped to look right.
    pub flip_y: bool,
    /// Prefix for the ids of aperture definitions.
    pub id_prefix: String,
    /// Decimal places of emitted numbers.
    pub precision: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            polygonize: false,
            circle_segments: 32,
            dark_color: "#000000".into(),
            clear_color: "#ffffff".into(),
            flip_y: true,
            id_prefix: "ap".into(),
            precision: 6,
        }
    }
}

impl RenderOptions {
    pub fn polygonized(mut self, circle_segments: u32) -> Self {
        self.polygonize = true;
        self.circle_segments = circle_segments;
        self
    }

    pub fn colors(mut self, dark: impl Into<String>, clear: impl Into<String>) -> Self {
        self.dark_color = dark.into();
        self.clear_color = clear.into();
        self
    }

    pub fn flip_y(mut self, flip_y: bool) -> Self {
        self.flip_y = flip_y;
        self
    }

    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn fidelity(&self) -> Fidelity {
        if self.polygonize {
            Fidelity::Polygonized { circle_segments: self.circle_segments }
        } else {
            Fidelity::Exact
        }
    }

    pub fn color(&self, polarity: Polarity) -> &str {
        match polarity {
            Polarity::Dark => &self.dark_color,
            Polarity::Clear => &self.clear_color,
        }
    }

    /// Id of the definition of aperture `dcode` painted with `polarity`.
    pub fn aperture_id(&self, dcode: u32, polarity: Polarity) -> String {
        match polarity {
            Polarity::Dark => format!("{}{}", self.id_prefix, dcode),
            Polarity::Clear => format!("{}{}-clear", self.id_prefix, dcode),
        }
    }
}

/// A piece of output geometry together with how to paint it.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// A filled area; `even_odd` selects the even-odd fill rule, needed for
    /// holes and multi-contour regions.
    Fill { path: Path, polarity: Polarity, even_odd: bool },
    /// A stroked centerline with round caps and joins.
    Stroke { path: Path, polarity: Polarity, width: f64 },
    /// A placed copy of an aperture definition.
    Instance { dcode: u32, polarity: Polarity, transform: Affine },
}

impl Shape {
    pub fn polarity(&self) -> Polarity {
        match *self {
            Shape::Fill { polarity, .. } |
            Shape::Stroke { polarity, .. } |
            Shape::Instance { polarity, .. } => polarity,
        }
    }

    /// Bounds of the painted geometry.  Instances have no geometry of their
    /// own and yield an empty box.
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Shape::Fill { path, .. } => path.bounding_box(),
            Shape::Stroke { path, width, .. } => path.bounding_box().expand(width / 2.),
            Shape::Instance { .. } => BoundingBox::EMPTY,
        }
    }

    pub fn transform(&self, affine: Affine) -> Shape {
        match self {
            Shape::Fill { path, polarity, even_odd } => Shape::Fill {
                path: path.transform(affine), polarity: *polarity, even_odd: *even_odd,
            },
            Shape::Stroke { path, polarity, width } => Shape::Stroke {
                path: path.transform(affine), polarity: *polarity,
                width: width * affine.determinant().abs().sqrt(),
            },
            Shape::Instance { dcode, polarity, transform } => Shape::Instance {
                dcode: *dcode, polarity: *polarity, transform: affine * *transform,
            },
        }
    }
}
