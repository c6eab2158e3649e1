// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! A parser for [Gerber] (RS-274X) files, the format PCB layers are exchanged
//! in, together with the geometry needed to draw them.
//!
//! [Gerber]: https://www.ucamco.com/en/gerber
//!
//! ## Basic usage
//!
//! Use `gerber::parse` to get a `Document`: the aperture catalogue, macro
//! templates, file attributes and the ordered list of graphics objects
//! (draws, arcs, flashes and regions).  Parsing never fails; whatever could
//! not be understood is listed in `Document::warnings`.
//!
//! Geometry is available as exact bounding boxes and as outlines built by
//! `outline` methods on apertures and graphics objects.  With the *svg*
//! feature, `render::svg::SvgRenderer` turns a document into SVG.  The
//! following code (a shorter version of the "gerber-svg" binary) does that:
//!
//! ```rust,no_run
//! use std::{env, fs};
//! use gerber::render::{svg::SvgRenderer, RenderOptions};
//!
//! fn main() -> std::io::Result<()> {
//!     let filename = env::args().nth(1).unwrap_or_default();
//!     let doc = gerber::parse(&fs::read_to_string(&filename)?);
//!     for warning in doc.warnings() {
//!         eprintln!("{}: {}", filename, warning);
//!     }
//!     let svg = SvgRenderer::new(RenderOptions::default()).margin(0.5);
//!     println!("{}", svg.render_to_string(&doc));
//!     Ok(())
//! }
//! ```
//!
//! ## Unsupported features
//!
//! Step-and-repeat (`SR`) and block apertures (`AB`) are recognized but not
//! expanded, and single-quadrant arc mode is treated like multi-quadrant.

pub mod ast;
pub mod parse;
pub mod eval;
pub mod token;
pub mod lex;
pub mod document;
pub mod geom;
pub mod aperture;
pub mod object;
pub mod render;
pub mod interp;

// internal helpers
pub(crate) mod util;

pub use crate::document::Document;
pub use crate::interp::parse;
pub use crate::lex::tokenize;
pub use crate::render::RenderOptions;
