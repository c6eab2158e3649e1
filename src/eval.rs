// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! Evaluation of aperture macro arithmetic.

use std::collections::HashMap;
use thiserror::Error;

use crate::ast::{Expr, Op};
use crate::parse::parse_expr;

/// The only hard failure of the macro language.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("malformed macro expression {expr:?} (at offset {pos})")]
    Malformed { expr: String, pos: usize },
}

/// Variable table of a macro instantiation.
///
/// `$1`, `$2`, … are seeded from the aperture parameters; reading a variable
/// that was never set yields 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    vars: HashMap<u32, f64>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `$1..$n` from instantiation parameters.
    pub fn from_params(params: &[f64]) -> Self {
        let mut vars = Self::new();
        for (i, &value) in params.iter().enumerate() {
            vars.set(i as u32 + 1, value);
        }
        vars
    }

    pub fn get(&self, n: u32) -> f64 {
        self.vars.get(&n).copied().unwrap_or(0.)
    }

    pub fn set(&mut self, n: u32, value: f64) {
        self.vars.insert(n, value);
    }

    pub fn is_defined(&self, n: u32) -> bool {
        self.vars.contains_key(&n)
    }
}

impl Expr {
    /// Evaluate against a variable table.  Division by zero follows IEEE
    /// semantics.
    pub fn eval(&self, vars: &Variables) -> f64 {
        match self {
            Expr::Num(value) => *value,
            Expr::Var(n) => vars.get(*n),
            Expr::Neg(arg) => -arg.eval(vars),
            Expr::BinOp(op, left, right) => {
                let left = left.eval(vars);
                let right = right.eval(vars);
                match op {
                    Op::Add => left + right,
                    Op::Sub => left - right,
                    Op::Mul => left * right,
                    Op::Div => left / right,
                }
            }
        }
    }
}

/// Parse and evaluate `input` in one go.
pub fn evaluate(input: &str, vars: &Variables) -> Result<f64, ExprError> {
    Ok(parse_expr(input)?.eval(vars))
}
