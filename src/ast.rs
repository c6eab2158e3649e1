// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! Syntax trees for the structured payloads of extended commands.

use std::fmt::{self, Display, Formatter};

/// An aperture macro arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Var(u32),
    Neg(Box<Expr>),
    BinOp(Op, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

/// The decoded payload of an `AD` command, before the template is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ApertureDefine {
    pub dcode: u32,
    pub template: String,
    pub params: Vec<f64>,
}

impl Expr {
    /// Calls `f` for every variable the expression reads.
    pub fn visit_vars(&self, f: &mut impl FnMut(u32)) {
        match self {
            Expr::Num(_) => (),
            Expr::Var(n) => f(*n),
            Expr::Neg(arg) => arg.visit_vars(f),
            Expr::BinOp(_, lhs, rhs) => {
                lhs.visit_vars(f);
                rhs.visit_vars(f);
            }
        }
    }
}

impl Default for Expr {
    fn default() -> Self {
        Expr::Num(0.)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Expr::Num(n) => write!(f, "{}", n),
            Expr::Var(n) => write!(f, "${}", n),
            Expr::Neg(arg) => match **arg {
                Expr::BinOp(..) => write!(f, "-({})", arg),
                _ => write!(f, "-{}", arg),
            },
            Expr::BinOp(op, lhs, rhs) => {
                match **lhs {
                    Expr::BinOp(..) => write!(f, "({}){}", lhs, op)?,
                    _ => write!(f, "{}{}", lhs, op)?,
                }
                match **rhs {
                    Expr::BinOp(..) => write!(f, "({})", rhs),
                    _ => write!(f, "{}", rhs),
                }
            }
        }
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "x",
            Op::Div => "/",
        })
    }
}

impl Display for ApertureDefine {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "ADD{}{}", self.dcode, self.template)?;
        for (i, p) in self.params.iter().enumerate() {
            write!(f, "{}{}", if i == 0 { "," } else { "X" }, p)?;
        }
        Ok(())
    }
}
