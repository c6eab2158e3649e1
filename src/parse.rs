// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! Pest-based parsers for macro expressions and the FS/AD command payloads.

use itertools::Itertools;
use pest_derive::Parser;
use pest::{Parser, error::{Error, InputLocation}, iterators::Pair};

use crate::ast::*;
use crate::document::{CoordinateFormat, Notation, ZeroOmission};
use crate::eval::ExprError;

#[derive(Parser)]
#[grammar = "gerber.pest"]
pub struct GerberParser;

fn malformed(input: &str, e: Error<Rule>) -> ExprError {
    let pos = match e.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };
    ExprError::Malformed { expr: input.into(), pos }
}

fn make_expr(pair: Pair<Rule>) -> Expr {
    match pair.as_rule() {
        Rule::number => Expr::Num(pair.as_str().parse().unwrap_or(0.)),
        // absurdly large indices can never be defined, so they read as 0
        Rule::variable => Expr::Var(pair.as_str()[1..].parse().unwrap_or(u32::MAX)),
        Rule::expr_atom => pair.into_inner().next().map(make_expr).unwrap_or_default(),
        Rule::expr_unary => {
            let mut negate = false;
            let mut atom = Expr::default();
            for pair in pair.into_inner() {
                match pair.as_rule() {
                    Rule::sign => if pair.as_str() == "-" { negate = !negate },
                    _ => atom = make_expr(pair),
                }
            }
            if negate { Expr::Neg(Box::new(atom)) } else { atom }
        }
        // rules inside (left-associative) binops
        Rule::expr | Rule::expr_mul => {
            let mut lhs = None;
            let mut op = None;
            for pair in pair.into_inner() {
                match pair.as_rule() {
                    Rule::op_add => op = Some(match pair.as_str() {
                        "+" => Op::Add, _ => Op::Sub,
                    }),
                    Rule::op_mul => op = Some(match pair.as_str() {
                        "/" => Op::Div, _ => Op::Mul,
                    }),
                    _ => {
                        let rhs = make_expr(pair);
                        lhs = Some(match (lhs.take(), op.take()) {
                            (Some(lhs), Some(op)) => Expr::BinOp(op, Box::new(lhs), Box::new(rhs)),
                            _ => rhs,
                        });
                    }
                }
            }
            lhs.unwrap_or_default()
        }
        _ => unreachable!()
    }
}

/// Parse a macro arithmetic expression.  An empty expression is 0.
pub fn parse_expr(input: &str) -> Result<Expr, ExprError> {
    if input.trim().is_empty() {
        return Ok(Expr::default());
    }
    let pairs = GerberParser::parse(Rule::expression, input).map_err(|e| malformed(input, e))?;
    Ok(pairs.flat_map(|pair| pair.into_inner())
            .find(|pair| pair.as_rule() == Rule::expr)
            .map(make_expr)
            .unwrap_or_default())
}

/// Parse the body of an `FS` command, e.g. `FSLAX26Y26`.
///
/// Only the X digit counts are used; producers never write a different Y
/// format in practice.
pub fn parse_format_spec(input: &str) -> Option<CoordinateFormat> {
    let pairs = GerberParser::parse(Rule::format_spec, input).ok()?;
    let mut zeros = ZeroOmission::Leading;
    let mut notation = Notation::Absolute;
    let mut digits = vec![];
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::fs_zeros => if pair.as_str() == "T" { zeros = ZeroOmission::Trailing },
            Rule::fs_notation => if pair.as_str() == "I" { notation = Notation::Incremental },
            Rule::fs_digits => digits.push(pair.as_str()),
            _ => ()
        }
    }
    let (x, _y) = digits.into_iter().collect_tuple()?;
    let (int, dec) = x.chars().filter_map(|c| c.to_digit(10)).collect_tuple()?;
    Some(CoordinateFormat::new(int, dec, zeros, notation))
}

/// Parse the body of an `AD` command, e.g. `ADD10C,0.5X0.25`.
pub fn parse_aperture_define(input: &str) -> Option<ApertureDefine> {
    let input: String = input.split_whitespace().collect();
    let pairs = GerberParser::parse(Rule::aperture_define, &input).ok()?;
    let mut def = ApertureDefine { dcode: 0, template: String::new(), params: vec![] };
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::ad_code => def.dcode = pair.as_str().parse().ok()?,
            Rule::ad_template => def.template = pair.as_str().into(),
            Rule::ad_value => def.params.push(pair.as_str().parse().ok()?),
            _ => ()
        }
    }
    Some(def)
}
