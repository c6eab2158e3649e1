// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::fmt;
use thiserror::Error;

use crate::eval::ExprError;

/// A problem the interpreter worked around.
#[derive(Clone, Debug, PartialEq)]
pub struct Warning {
    pub line: usize,
    pub kind: WarningKind,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum WarningKind {
    #[error("macro {name} rejected: {source}")]
    MalformedExpression { name: String, source: ExprError },
    #[error("unknown command {0:?} ignored")]
    UnknownCommand(String),
    #[error("coordinates before the format specification are ignored")]
    MissingFormatSpec,
    #[error("aperture D{0} is not defined")]
    UndefinedAperture(u32),
    #[error("macro {name} reads undefined variable ${var}, using 0")]
    UndefinedMacroVariable { name: String, var: u32 },
    #[error("aperture D{dcode} refers to unknown macro {name}")]
    UndefinedTemplate { dcode: u32, name: String },
    #[error("invalid aperture definition {text:?}: {reason}")]
    InvalidAperture { text: String, reason: String },
    #[error("invalid parameter in {0:?}")]
    InvalidParameter(String),
    #[error("region not closed before end of file")]
    UnclosedRegion,
    #[error("{0} is recognized but not expanded")]
    NotExpanded(&'static str),
}
