// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! SVG output.
//!
//! Apertures become `<defs>` groups which flashes reference with `<use>`;
//! draws, arcs and regions are emitted as paths in document order.  Gerber
//! has y pointing up: with `flip_y` the content sits in a group that mirrors
//! it, otherwise every y coordinate is negated as it is written.

use std::collections::BTreeSet;
use std::fmt::Write;
use kurbo::{Affine, Point};
use ::svg::node::element::{Definitions, Group, Path as SvgPath, Rectangle, Use};
use tracing::debug;

use crate::document::{Document, Polarity};
use crate::geom::{sweep_flag, BoundingBox, Path, Segment};
use crate::object::GraphicsObject;
use super::{RenderOptions, Shape};

/// Format a number with at most `precision` decimals, without trailing zeros.
pub fn fmt_num(value: f64, precision: usize) -> String {
    let s = format!("{:.*}", precision, value);
    let s = if s.contains('.') { s.trim_end_matches('0').trim_end_matches('.') } else { &s };
    if s == "-0" { "0".into() } else { s.into() }
}

pub struct SvgRenderer {
    opts: RenderOptions,
    margin: f64,
    background: Option<String>,
}

impl SvgRenderer {
    pub fn new(opts: RenderOptions) -> Self {
        SvgRenderer { opts, margin: 0., background: None }
    }

    /// Space around the document box, in document units.
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.opts
    }

    fn num(&self, value: f64) -> String {
        fmt_num(value, self.opts.precision)
    }

    /// Output position of a document point.
    fn point(&self, p: Point) -> Point {
        if self.opts.flip_y { p } else { Point::new(p.x, -p.y) }
    }

    fn write_point(&self, d: &mut String, p: Point) {
        let p = self.point(p);
        let _ = write!(d, "{} {}", self.num(p.x), self.num(p.y));
    }

    /// The `d` attribute of a path.
    pub fn path_data(&self, path: &Path) -> String {
        let mut d = String::new();
        for sp in &path.subpaths {
            d.push('M');
            self.write_point(&mut d, sp.start);
            for seg in &sp.segments {
                match *seg {
                    Segment::Line(end) => {
                        d.push('L');
                        self.write_point(&mut d, end);
                    }
                    Segment::Arc { end, radius, clockwise, large_arc, .. } => {
                        let r = self.num(radius);
                        let _ = write!(d, "A{} {} 0 {} {} ", r, r, large_arc as u8,
                                       sweep_flag(clockwise, self.opts.flip_y) as u8);
                        self.write_point(&mut d, end);
                    }
                }
            }
            if sp.closed {
                d.push('Z');
            }
        }
        d
    }

    fn transform_attr(&self, transform: Affine) -> Option<String> {
        let transform = if self.opts.flip_y {
            transform
        } else {
            Affine::FLIP_Y * transform * Affine::FLIP_Y
        };
        let c = transform.as_coeffs();
        if c[..4] == [1., 0., 0., 1.] {
            return None;
        }
        Some(format!("matrix({})", c.iter().map(|&v| self.num(v)).collect::<Vec<_>>().join(" ")))
    }

    fn add_shape(&self, group: Group, shape: &Shape) -> Group {
        match shape {
            Shape::Fill { path, polarity, even_odd } => {
                let mut el = SvgPath::new()
                    .set("d", self.path_data(path))
                    .set("fill", self.opts.color(*polarity));
                if *even_odd {
                    el = el.set("fill-rule", "evenodd");
                }
                group.add(el)
            }
            Shape::Stroke { path, polarity, width } => group.add(
                SvgPath::new()
                    .set("d", self.path_data(path))
                    .set("fill", "none")
                    .set("stroke", self.opts.color(*polarity))
                    .set("stroke-width", self.num(*width))
                    .set("stroke-linecap", "round")
                    .set("stroke-linejoin", "round"),
            ),
            Shape::Instance { dcode, polarity, transform } => {
                let mut el = Use::new()
                    .set("href", format!("#{}", self.opts.aperture_id(*dcode, *polarity)));
                match self.transform_attr(*transform) {
                    Some(matrix) => el = el.set("transform", matrix),
                    None => {
                        let p = self.point(Point::ORIGIN + transform.translation());
                        el = el.set("x", self.num(p.x)).set("y", self.num(p.y));
                    }
                }
                group.add(el)
            }
        }
    }

    fn definitions(&self, doc: &Document) -> Definitions {
        let clear: BTreeSet<u32> = doc.objects().iter()
            .filter_map(|obj| match obj {
                GraphicsObject::Flash(flash) if flash.polarity == Polarity::Clear => Some(flash.aperture),
                _ => None,
            })
            .collect();
        let mut defs = Definitions::new();
        for aperture in doc.apertures() {
            let mut polarities = vec![Polarity::Dark];
            if clear.contains(&aperture.dcode) {
                polarities.push(Polarity::Clear);
            }
            for polarity in polarities {
                let group = Group::new().set("id", self.opts.aperture_id(aperture.dcode, polarity));
                let shapes = aperture.outline(doc.templates(), &self.opts, polarity);
                defs = defs.add(shapes.iter().fold(group, |g, shape| self.add_shape(g, shape)));
            }
        }
        defs
    }

    /// View box `(x, y, width, height)` in output coordinates.
    fn view_box(&self, bbox: &BoundingBox) -> (f64, f64, f64, f64) {
        if !bbox.is_valid() {
            return (0., 0., 1., 1.);
        }
        let bbox = bbox.expand(self.margin);
        let y = if self.opts.flip_y { bbox.min_y } else { -bbox.max_y };
        (bbox.min_x, y, bbox.width(), bbox.height())
    }

    pub fn render(&self, doc: &Document) -> ::svg::Document {
        let (x, y, w, h) = self.view_box(&doc.bounding_box());
        let unit = doc.unit();
        let mut out = ::svg::Document::new()
            .set("viewBox", format!("{} {} {} {}", self.num(x), self.num(y), self.num(w), self.num(h)))
            .set("width", format!("{}{}", self.num(w), unit))
            .set("height", format!("{}{}", self.num(h), unit))
            .add(self.definitions(doc));
        if let Some(color) = &self.background {
            out = out.add(Rectangle::new()
                .set("x", self.num(x)).set("y", self.num(y))
                .set("width", self.num(w)).set("height", self.num(h))
                .set("fill", color.as_str()));
        }
        let mut content = Group::new();
        if self.opts.flip_y {
            content = content.set("transform",
                                  format!("translate(0 {}) scale(1 -1)", self.num(2. * y + h)));
        }
        for obj in doc.objects() {
            for shape in obj.outline(doc, &self.opts) {
                content = self.add_shape(content, &shape);
            }
        }
        debug!("rendered {} objects into {} x {} {}", doc.objects().len(), w, h, unit);
        out.add(content)
    }

    pub fn render_to_string(&self, doc: &Document) -> String {
        self.render(doc).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::parse;

    const HEADER: &str = "%FSLAX26Y26*%\n%MOMM*%\n%ADD10C,0.5*%\n%ADD11R,1X0.5*%\n";

    fn render(body: &str, opts: RenderOptions) -> String {
        let doc = parse(&format!("{}{}M02*\n", HEADER, body));
        SvgRenderer::new(opts).render_to_string(&doc)
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.5, 6), "1.5");
        assert_eq!(fmt_num(2.0, 6), "2");
        assert_eq!(fmt_num(-0.0000001, 6), "0");
        assert_eq!(fmt_num(0.1234567, 3), "0.123");
        assert_eq!(fmt_num(-12.0, 0), "-12");
    }

    #[test]
    fn test_empty_document() {
        let svg = SvgRenderer::new(RenderOptions::default()).render_to_string(&Document::new());
        assert!(svg.contains("viewBox=\"0 0 1 1\""));
    }

    #[test]
    fn test_flash() {
        let svg = render("D10*\nX1000000Y2000000D03*\n", RenderOptions::default());
        assert!(svg.contains("id=\"ap10\""));
        assert!(svg.contains("id=\"ap11\""));
        assert!(!svg.contains("ap10-clear"));
        assert!(svg.contains("href=\"#ap10\""));
        assert!(svg.contains("x=\"1\""));
        assert!(svg.contains("y=\"2\""));
        assert!(svg.contains("viewBox=\"0.75 1.75 0.5 0.5\""));
        assert!(svg.contains("width=\"0.5mm\""));
        assert!(svg.contains("translate(0 4) scale(1 -1)"));
    }

    #[test]
    fn test_clear_flash() {
        let svg = render("D11*\n%LPC*%\nX0Y0D03*\n", RenderOptions::default().colors("black", "white"));
        assert!(svg.contains("id=\"ap11-clear\""));
        assert!(svg.contains("href=\"#ap11-clear\""));
        assert!(svg.contains("fill=\"white\""));
    }

    #[test]
    fn test_rotated_flash() {
        let svg = render("D11*\n%LR90*%\nX0Y0D03*\n", RenderOptions::default());
        assert!(svg.contains("transform=\"matrix(0 1 -1 0 0 0)\""));
    }

    #[test]
    fn test_draw_and_arc() {
        let svg = render("D10*\nX0Y0D02*\nX1000000Y0D01*\nG03X0Y1000000I-1000000J0D01*\n",
                         RenderOptions::default());
        assert!(svg.contains("d=\"M0 0L1 0\""));
        assert!(svg.contains("d=\"M1 0A1 1 0 0 1 0 1\""));
        assert!(svg.contains("stroke-linecap=\"round\""));
        assert!(svg.contains("stroke-width=\"0.5\""));
    }

    #[test]
    fn test_no_flip() {
        let svg = render("D10*\nX0Y0D02*\nX1000000Y0D01*\nG03X0Y1000000I-1000000J0D01*\n",
                         RenderOptions::default().flip_y(false));
        assert!(svg.contains("d=\"M1 0A1 1 0 0 0 0 -1\""));
        assert!(!svg.contains("scale(1 -1)"));
    }

    #[test]
    fn test_region() {
        let svg = render("G36*\nX0Y0D02*\nX1000000Y0D01*\nX0Y1000000D01*\nX0Y0D01*\nG37*\n",
                         RenderOptions::default());
        assert!(svg.contains("d=\"M0 0L1 0L0 1L0 0Z\""));
        assert!(svg.contains("fill-rule=\"evenodd\""));
    }

    #[test]
    fn test_polygonized() {
        let doc = parse(&format!("{}D10*\nX0Y0D02*\nX1000000Y0D01*\n", HEADER));
        let renderer = SvgRenderer::new(RenderOptions::default().polygonized(16));
        let shapes = doc.objects()[0].outline(&doc, renderer.options());
        assert_eq!(shapes.len(), 1);
        match &shapes[0] {
            Shape::Fill { path, .. } => assert!(!renderer.path_data(path).contains('A')),
            other => panic!("expected a fill, got {:?}", other),
        }
        assert!(!renderer.render_to_string(&doc).contains("stroke-linecap"));
    }

    #[test]
    fn test_background() {
        let doc = parse(&format!("{}D10*\nX0Y0D03*\n", HEADER));
        let svg = SvgRenderer::new(RenderOptions::default()).margin(1.).background("#003300")
            .render_to_string(&doc);
        assert!(svg.contains("fill=\"#003300\""));
        assert!(svg.contains("viewBox=\"-1.25 -1.25 2.5 2.5\""));
    }
}
