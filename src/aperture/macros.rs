// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::{FRAC_PI_2, SQRT_2, TAU};
use std::fmt;
use kurbo::{Point, Vec2};
use tracing::trace;

use crate::ast::Expr;
use crate::document::Polarity;
use crate::eval::{ExprError, Variables};
use crate::geom::{rotation, BoundingBox, Fidelity, Path, PathBuilder};
use crate::parse::parse_expr;
use crate::render::{RenderOptions, Shape};

/// Upper vertex count of regular polygons.
pub const MAX_POLYGON_VERTICES: usize = 12;

/// Upper ring count of moiré primitives.
pub const MAX_MOIRE_RINGS: usize = 100;

/// Macro templates by name.
pub type Templates = BTreeMap<String, MacroTemplate>;

/// A point given by two expressions.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ExprPoint(pub Expr, pub Expr);

impl ExprPoint {
    fn eval(&self, vars: &Variables) -> Point {
        Point::new(self.0.eval(vars), self.1.eval(vars))
    }
}

/// One shape of an aperture macro.  All fields are unevaluated expressions;
/// the geometry depends on the variable table it is evaluated against.
///
/// Rotation angles are in degrees, counter-clockwise around the macro
/// origin.
#[derive(Clone, Debug, PartialEq)]
pub enum MacroPrimitive {
    /// Code 1.
    Circle { exposure: Expr, diameter: Expr, center: ExprPoint, rotation: Expr },
    /// Code 20 (and the legacy code 2).
    VectorLine { exposure: Expr, width: Expr, start: ExprPoint, end: ExprPoint, rotation: Expr },
    /// Code 21.
    CenterLine { exposure: Expr, width: Expr, height: Expr, center: ExprPoint, rotation: Expr },
    /// Code 4.  `params` holds the `vertices + 1` coordinate pairs, followed
    /// by the rotation; the split depends on the evaluated vertex count.
    Outline { exposure: Expr, vertices: Expr, params: Vec<Expr> },
    /// Code 5.
    Polygon { exposure: Expr, vertices: Expr, center: ExprPoint, diameter: Expr, rotation: Expr },
    /// Code 6, always dark.
    Moire {
        center: ExprPoint,
        outer_diameter: Expr,
        ring_thickness: Expr,
        gap: Expr,
        max_rings: Expr,
        cross_thickness: Expr,
        cross_length: Expr,
        rotation: Expr,
    },
    /// Code 7, always dark.
    Thermal { center: ExprPoint, outer_diameter: Expr, inner_diameter: Expr, gap: Expr, rotation: Expr },
}

impl MacroPrimitive {
    /// Build a primitive from its code and parameter list; missing
    /// parameters read as 0.  Returns `None` for unknown codes.
    pub fn new(code: u32, mut params: Vec<Expr>) -> Option<Self> {
        let mut it = params.clone().into_iter();
        let mut arg = move || it.next().unwrap_or_default();
        Some(match code {
            1 => MacroPrimitive::Circle {
                exposure: arg(), diameter: arg(), center: ExprPoint(arg(), arg()), rotation: arg(),
            },
            2 | 20 => MacroPrimitive::VectorLine {
                exposure: arg(), width: arg(), start: ExprPoint(arg(), arg()),
                end: ExprPoint(arg(), arg()), rotation: arg(),
            },
            21 => MacroPrimitive::CenterLine {
                exposure: arg(), width: arg(), height: arg(), center: ExprPoint(arg(), arg()),
                rotation: arg(),
            },
            4 => {
                let rest = if params.len() > 2 { params.split_off(2) } else { vec![] };
                MacroPrimitive::Outline { exposure: arg(), vertices: arg(), params: rest }
            }
            5 => MacroPrimitive::Polygon {
                exposure: arg(), vertices: arg(), center: ExprPoint(arg(), arg()),
                diameter: arg(), rotation: arg(),
            },
            6 => MacroPrimitive::Moire {
                center: ExprPoint(arg(), arg()), outer_diameter: arg(), ring_thickness: arg(),
                gap: arg(), max_rings: arg(), cross_thickness: arg(), cross_length: arg(),
                rotation: arg(),
            },
            7 => MacroPrimitive::Thermal {
                center: ExprPoint(arg(), arg()), outer_diameter: arg(), inner_diameter: arg(),
                gap: arg(), rotation: arg(),
            },
            _ => return None
        })
    }

    /// Every expression of the primitive.
    pub fn exprs(&self) -> Vec<&Expr> {
        match self {
            MacroPrimitive::Circle { exposure, diameter, center, rotation } =>
                vec![exposure, diameter, &center.0, &center.1, rotation],
            MacroPrimitive::VectorLine { exposure, width, start, end, rotation } =>
                vec![exposure, width, &start.0, &start.1, &end.0, &end.1, rotation],
            MacroPrimitive::CenterLine { exposure, width, height, center, rotation } =>
                vec![exposure, width, height, &center.0, &center.1, rotation],
            MacroPrimitive::Outline { exposure, vertices, params } =>
                [exposure, vertices].iter().copied().chain(params).collect(),
            MacroPrimitive::Polygon { exposure, vertices, center, diameter, rotation } =>
                vec![exposure, vertices, &center.0, &center.1, diameter, rotation],
            MacroPrimitive::Moire { center, outer_diameter, ring_thickness, gap, max_rings,
                                    cross_thickness, cross_length, rotation } =>
                vec![&center.0, &center.1, outer_diameter, ring_thickness, gap, max_rings,
                     cross_thickness, cross_length, rotation],
            MacroPrimitive::Thermal { center, outer_diameter, inner_diameter, gap, rotation } =>
                vec![&center.0, &center.1, outer_diameter, inner_diameter, gap, rotation],
        }
    }

    /// Whether the primitive adds material (dark) or removes it (clear).
    pub fn exposure(&self, vars: &Variables) -> Polarity {
        let exposure = match self {
            MacroPrimitive::Circle { exposure, .. } |
            MacroPrimitive::VectorLine { exposure, .. } |
            MacroPrimitive::CenterLine { exposure, .. } |
            MacroPrimitive::Outline { exposure, .. } |
            MacroPrimitive::Polygon { exposure, .. } => exposure.eval(vars),
            MacroPrimitive::Moire { .. } | MacroPrimitive::Thermal { .. } => 1.,
        };
        if exposure >= 1. { Polarity::Dark } else { Polarity::Clear }
    }

    /// Geometry of the primitive, each path with its even-odd flag.
    fn paths(&self, vars: &Variables, fidelity: Fidelity) -> Vec<(Path, bool)> {
        let mut b = PathBuilder::new(fidelity);
        let rot = match self {
            MacroPrimitive::Circle { diameter, center, rotation, .. } => {
                let radius = diameter.eval(vars) / 2.;
                if radius > 0. {
                    b.circle(center.eval(vars), radius, true);
                }
                rotation
            }
            MacroPrimitive::VectorLine { width, start, end, rotation, .. } => {
                let (start, end) = (start.eval(vars), end.eval(vars));
                let d = end - start;
                let len = d.hypot();
                if len > 0. {
                    let n = Vec2::new(-d.y, d.x) * (width.eval(vars) / 2. / len);
                    b.polygon([start + n, end + n, end - n, start - n]);
                }
                rotation
            }
            MacroPrimitive::CenterLine { width, height, center, rotation, .. } => {
                let c = center.eval(vars);
                let (hw, hh) = (width.eval(vars) / 2., height.eval(vars) / 2.);
                b.polygon([c + Vec2::new(-hw, -hh), c + Vec2::new(-hw, hh),
                           c + Vec2::new(hw, hh), c + Vec2::new(hw, -hh)]);
                rotation
            }
            MacroPrimitive::Outline { vertices, params, .. } => {
                // no more vertices than coordinate pairs given
                let n = (vertices.eval(vars).max(0.).round() as usize)
                    .min((params.len() / 2).saturating_sub(1));
                let coords = params.iter().take(2 * (n + 1)).map(|e| e.eval(vars)).collect::<Vec<_>>();
                let mut points = coords.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect::<Vec<_>>();
                // the closing point repeats the first one
                if points.len() > 1 && points.first() == points.last() {
                    points.pop();
                }
                if points.len() >= 2 {
                    b.polygon(points);
                }
                let rot = params.get(2 * (n + 1)).map_or(0., |e| e.eval(vars));
                return vec![(b.finish().transform(rotation(rot)), false)];
            }
            MacroPrimitive::Polygon { vertices, center, diameter, rotation, .. } => {
                let n = (vertices.eval(vars).round() as usize).clamp(3, MAX_POLYGON_VERTICES);
                let (c, radius) = (center.eval(vars), diameter.eval(vars) / 2.);
                b.polygon((0..n).map(|i| c + Vec2::from_angle(-TAU * i as f64 / n as f64) * radius));
                rotation
            }
            MacroPrimitive::Moire { center, outer_diameter, ring_thickness, gap, max_rings,
                                    cross_thickness, cross_length, rotation: angle } => {
                let c = center.eval(vars);
                let (thickness, gap) = (ring_thickness.eval(vars), gap.eval(vars));
                let rot = rotation(angle.eval(vars));
                let mut result = vec![];
                let mut outer = outer_diameter.eval(vars) / 2.;
                let rings = (max_rings.eval(vars).max(0.).round() as usize).min(MAX_MOIRE_RINGS);
                for _ in 0..rings {
                    if outer <= 0. || thickness <= 0. || (!result.is_empty() && thickness + gap <= 0.) {
                        break;
                    }
                    let mut ring = PathBuilder::new(fidelity);
                    ring.circle(c, outer, true);
                    let inner = outer - thickness;
                    if inner > 0. {
                        ring.circle(c, inner, false);
                    }
                    result.push((ring.finish().transform(rot), true));
                    outer -= thickness + gap;
                }
                let (ct, cl) = (cross_thickness.eval(vars) / 2., cross_length.eval(vars) / 2.);
                if ct > 0. && cl > 0. {
                    b.polygon([c + Vec2::new(-cl, -ct), c + Vec2::new(-cl, ct),
                               c + Vec2::new(cl, ct), c + Vec2::new(cl, -ct)]);
                    b.polygon([c + Vec2::new(-ct, -cl), c + Vec2::new(-ct, cl),
                               c + Vec2::new(ct, cl), c + Vec2::new(ct, -cl)]);
                    result.push((b.finish().transform(rot), false));
                }
                return result;
            }
            MacroPrimitive::Thermal { center, outer_diameter, inner_diameter, gap, rotation } => {
                thermal(&mut b, center.eval(vars), outer_diameter.eval(vars) / 2.,
                        inner_diameter.eval(vars) / 2., gap.eval(vars) / 2.);
                rotation
            }
        };
        vec![(b.finish().transform(rotation(rot.eval(vars))), false)]
    }

    pub fn bounding_box(&self, vars: &Variables) -> BoundingBox {
        self.paths(vars, Fidelity::Exact).iter()
            .fold(BoundingBox::EMPTY, |bbox, (path, _)| bbox.union(&path.bounding_box()))
    }

    /// Painted outline.  `polarity` is the polarity of the whole aperture;
    /// clear primitives invert it.
    pub fn outline(&self, vars: &Variables, opts: &RenderOptions, polarity: Polarity) -> Vec<Shape> {
        let polarity = match self.exposure(vars) {
            Polarity::Dark => polarity,
            Polarity::Clear => polarity.invert(),
        };
        self.paths(vars, opts.fidelity()).into_iter()
            .filter(|(path, _)| !path.is_empty())
            .map(|(path, even_odd)| Shape::Fill { path, polarity, even_odd })
            .collect()
    }
}

/// The four pieces of a thermal: an annulus of radii `inner`..`outer` cut by
/// a cross-shaped gap of half width `gap`.
fn thermal(b: &mut PathBuilder, c: Point, outer: f64, inner: f64, gap: f64) {
    if outer <= gap * SQRT_2 {
        return;
    }
    let ao = (gap / outer).asin();
    // below this radius the gap bars swallow the inner arc entirely
    let inner_arc = inner > gap * SQRT_2;
    let ai = if inner_arc { (gap / inner).asin() } else { 0. };
    for q in 0..4 {
        let base = q as f64 * FRAC_PI_2;
        b.move_to(c + Vec2::from_angle(base + ao) * outer)
            .arc_to(c, c + Vec2::from_angle(base + FRAC_PI_2 - ao) * outer, false);
        if inner_arc {
            b.line_to(c + Vec2::from_angle(base + FRAC_PI_2 - ai) * inner)
                .arc_to(c, c + Vec2::from_angle(base + ai) * inner, true);
        } else {
            let corner = rotation(base.to_degrees()) * Point::new(gap, gap);
            b.line_to(c + corner.to_vec2());
        }
        b.close();
    }
}

/// A statement of a macro body.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Assign(u32, Expr),
    Primitive(MacroPrimitive),
}

/// A named aperture macro from an `AM` command.
#[derive(Clone, Debug, PartialEq)]
pub struct MacroTemplate {
    pub name: String,
    pub statements: Vec<Statement>,
}

impl MacroTemplate {
    /// Parse a complete `AM` command body, e.g. `AMDONUT*1,1,$1,0,0*1,0,$2,0,0`.
    pub fn from_command(text: &str) -> Result<Self, ExprError> {
        let text = text.strip_prefix("AM").unwrap_or(text);
        let (name, body) = text.split_once('*').unwrap_or((text, ""));
        Self::parse(name.trim(), body)
    }

    /// Parse the `*`-separated statements of a macro body.
    pub fn parse(name: &str, body: &str) -> Result<Self, ExprError> {
        let mut statements = vec![];
        for stmt in body.split('*').map(str::trim).filter(|s| !s.is_empty()) {
            if let Some(assign) = stmt.strip_prefix('$') {
                let (var, value) = assign.split_once('=').ok_or_else(|| malformed(stmt))?;
                let var = var.trim().parse().map_err(|_| malformed(stmt))?;
                statements.push(Statement::Assign(var, parse_expr(value)?));
                continue;
            }
            let mut fields = stmt.split(',');
            let code = fields.next().unwrap_or("").trim();
            if code == "0" || code.starts_with("0 ") {
                continue;
            }
            let params = fields.map(parse_expr).collect::<Result<Vec<_>, _>>()?;
            match code.parse().ok().and_then(|code| MacroPrimitive::new(code, params)) {
                Some(prim) => statements.push(Statement::Primitive(prim)),
                None => trace!("macro {}: dropping primitive with code {:?}", name, code),
            }
        }
        Ok(MacroTemplate { name: name.into(), statements })
    }

    pub fn primitives(&self) -> impl Iterator<Item=&MacroPrimitive> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Primitive(prim) => Some(prim),
            _ => None,
        })
    }

    /// Final variable table of an instantiation: the assignments run in
    /// order into a table seeded by the parameters.
    pub fn variables(&self, params: &[f64]) -> Variables {
        let mut vars = Variables::from_params(params);
        for stmt in &self.statements {
            if let Statement::Assign(n, expr) = stmt {
                let value = expr.eval(&vars);
                vars.set(*n, value);
            }
        }
        vars
    }

    /// Variables read by an instantiation before anything defines them.
    /// Assignments see the table as it stands at that point, primitives see
    /// the final one.
    pub fn undefined_variables(&self, params: &[f64]) -> Vec<u32> {
        let mut defined: BTreeSet<u32> = (1..=params.len() as u32).collect();
        let mut undefined = BTreeSet::new();
        for stmt in &self.statements {
            if let Statement::Assign(n, expr) = stmt {
                expr.visit_vars(&mut |v| if !defined.contains(&v) { undefined.insert(v); });
                defined.insert(*n);
            }
        }
        for expr in self.primitives().flat_map(MacroPrimitive::exprs) {
            expr.visit_vars(&mut |v| if !defined.contains(&v) { undefined.insert(v); });
        }
        undefined.into_iter().collect()
    }

    pub fn bounding_box(&self, params: &[f64]) -> BoundingBox {
        let vars = self.variables(params);
        self.primitives().fold(BoundingBox::EMPTY, |bbox, prim| bbox.union(&prim.bounding_box(&vars)))
    }

    pub fn outline(&self, params: &[f64], opts: &RenderOptions, polarity: Polarity) -> Vec<Shape> {
        let vars = self.variables(params);
        self.primitives().flat_map(|prim| prim.outline(&vars, opts, polarity)).collect()
    }
}

fn malformed(stmt: &str) -> ExprError {
    ExprError::Malformed { expr: stmt.into(), pos: 0 }
}

impl fmt::Display for MacroTemplate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AM{}", self.name)?;
        for stmt in &self.statements {
            match stmt {
                Statement::Assign(n, expr) => write!(f, "*${}={}", n, expr)?,
                Statement::Primitive(prim) => write!(f, "*{}", prim)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for MacroPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let code = match self {
            MacroPrimitive::Circle { .. } => 1,
            MacroPrimitive::VectorLine { .. } => 20,
            MacroPrimitive::CenterLine { .. } => 21,
            MacroPrimitive::Outline { .. } => 4,
            MacroPrimitive::Polygon { .. } => 5,
            MacroPrimitive::Moire { .. } => 6,
            MacroPrimitive::Thermal { .. } => 7,
        };
        write!(f, "{}", code)?;
        for expr in self.exprs() {
            write!(f, ",{}", expr)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_parse_template() {
        let tpl = MacroTemplate::from_command(
            "AMDONUT* 0 inner hole, scaled* $3=$2x0.5* 1,1,$1,0,0* 1,0,$3,0,0* 99,1,2").unwrap();
        assert_eq!(tpl.name, "DONUT");
        assert_eq!(tpl.statements.len(), 3);
        assert_eq!(tpl.primitives().count(), 2);
        assert_eq!(tpl.to_string(), "AMDONUT*$3=$2x0.5*1,1,$1,0,0,0*1,0,$3,0,0,0");

        let vars = tpl.variables(&[2., 1.]);
        assert_eq!(vars.get(3), 0.5);
        let prims = tpl.primitives().collect::<Vec<_>>();
        assert_eq!(prims[0].exposure(&vars), Polarity::Dark);
        assert_eq!(prims[1].exposure(&vars), Polarity::Clear);

        assert!(MacroTemplate::from_command("AMBAD*1,1,(2,0,0").is_err());
        assert!(MacroTemplate::from_command("AMBAD*$x=1").is_err());
    }

    #[test]
    fn test_undefined_variables() {
        let tpl = MacroTemplate::from_command("AMT*$4=$1+$5*1,1,$4,$2,$6").unwrap();
        assert_eq!(tpl.undefined_variables(&[1.]), vec![2, 5, 6]);
        assert_eq!(tpl.undefined_variables(&[1., 1., 1., 1., 1., 1.]), Vec::<u32>::new());
    }

    #[test]
    fn test_primitives_see_final_table() {
        // the assignment after the circle still sizes it
        let tpl = MacroTemplate::from_command("AMT*1,1,$3,0,0*$3=2").unwrap();
        assert!(close(tpl.bounding_box(&[]).width(), 2.));
        assert!(tpl.undefined_variables(&[]).is_empty());
        // and the last assignment wins
        let tpl = MacroTemplate::from_command("AMT*$3=1*1,1,$3,0,0*$3=2").unwrap();
        assert!(close(tpl.bounding_box(&[]).width(), 2.));
        let shapes = tpl.outline(&[], &RenderOptions::default(), Polarity::Dark);
        match &shapes[..] {
            [Shape::Fill { path, .. }] => assert!(close(path.bounding_box().max_x, 1.)),
            _ => panic!("expected one fill"),
        }
        // assignments themselves run in order
        let tpl = MacroTemplate::from_command("AMT*$4=$3*$3=2*1,1,$4,0,0").unwrap();
        assert_eq!(tpl.undefined_variables(&[]), vec![3]);
        assert!(!tpl.bounding_box(&[]).is_valid());
    }

    #[test]
    fn test_huge_counts() {
        let tpl = MacroTemplate::from_command(
            "AMOUT*4,1,99999999999999999999999,0,0,1,0,1,1,0,0,0").unwrap();
        assert_eq!(tpl.bounding_box(&[]), BoundingBox::new(0., 0., 1., 1.));

        let tpl = MacroTemplate::from_command("AMP*5,1,99999999999999999999,0,0,2,0").unwrap();
        match &tpl.outline(&[], &RenderOptions::default(), Polarity::Dark)[..] {
            [Shape::Fill { path, .. }] =>
                assert_eq!(path.subpaths[0].segments.len(), MAX_POLYGON_VERTICES - 1),
            _ => panic!("expected one fill"),
        }

        // rings that never shrink
        let tpl = MacroTemplate::from_command("AMM*6,0,0,2,0.2,-0.2,99999999999999999999,0,0,0").unwrap();
        assert_eq!(tpl.outline(&[], &RenderOptions::default(), Polarity::Dark).len(), 1);
    }

    #[test]
    fn test_legacy_vector_line() {
        let tpl = MacroTemplate::from_command("AMV*2,1,0.5,0,0,1,0,0").unwrap();
        assert!(matches!(tpl.primitives().next(), Some(MacroPrimitive::VectorLine { .. })));
        let bbox = tpl.bounding_box(&[]);
        assert!(close(bbox.width(), 1.) && close(bbox.height(), 0.5));
    }

    #[test]
    fn test_rotated_center_line() {
        let tpl = MacroTemplate::from_command("AMR*21,1,2,1,0,0,90").unwrap();
        let bbox = tpl.bounding_box(&[]);
        assert!(close(bbox.min_x, -0.5) && close(bbox.max_x, 0.5));
        assert!(close(bbox.min_y, -1.) && close(bbox.max_y, 1.));
    }

    #[test]
    fn test_rotation_about_origin() {
        // a circle at (1, 0) rotated by 90 degrees ends up at (0, 1)
        let tpl = MacroTemplate::from_command("AMC*1,1,0.5,1,0,90").unwrap();
        let bbox = tpl.bounding_box(&[]);
        let c = bbox.center();
        assert!(close(c.x, 0.) && close(c.y, 1.));
        assert!(close(bbox.width(), 0.5));
    }

    #[test]
    fn test_outline_primitive() {
        let tpl = MacroTemplate::from_command("AMO*4,1,3,0,0,1,0,1,1,0,0,0").unwrap();
        let bbox = tpl.bounding_box(&[]);
        assert_eq!(bbox, BoundingBox::new(0., 0., 1., 1.));
        let shapes = tpl.outline(&[], &RenderOptions::default(), Polarity::Dark);
        match &shapes[0] {
            Shape::Fill { path, .. } => assert_eq!(path.subpaths[0].segments.len(), 2),
            _ => panic!("expected fill"),
        }
    }

    #[test]
    fn test_thermal() {
        let tpl = MacroTemplate::from_command("AMTH*7,0,0,1.0,0.6,0.1,0").unwrap();
        let bbox = tpl.bounding_box(&[]);
        // the gap cuts away the axis extremes
        assert!(bbox.max_x < 0.5 && bbox.max_x > 0.49);
        assert!(close(bbox.max_x, -bbox.min_x));
        let opts = RenderOptions::default().polygonized(32);
        let shapes = tpl.outline(&[], &opts, Polarity::Clear);
        match &shapes[..] {
            [Shape::Fill { path, polarity, .. }] => {
                assert_eq!(path.subpaths.len(), 4);
                assert!(!path.has_arcs());
                assert_eq!(*polarity, Polarity::Clear);
            }
            _ => panic!("expected one fill"),
        }
    }

    #[test]
    fn test_moire() {
        let tpl = MacroTemplate::from_command("AMM*6,0,0,2,0.2,0.2,3,0.05,2.5,0").unwrap();
        let shapes = tpl.outline(&[], &RenderOptions::default(), Polarity::Dark);
        // three rings and the crosshair
        assert_eq!(shapes.len(), 4);
        let bbox = tpl.bounding_box(&[]);
        assert!(close(bbox.max_x, 1.25) && close(bbox.max_y, 1.25));
    }
}
