// SPDX-License-Identifier: MIT

//! Condition tree built from a condition document

use serde_json::Value;
use std::fmt;

/// A parsed condition node
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Comparison: left op right
    Compare {
        op: CompareOp,
        left: Value,
        right: Value,
    },
    /// Logical combination over children, in document order
    Combine {
        op: LogicOp,
        children: Vec<Condition>,
    },
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// eq
    Eq,
    /// ne
    Ne,
    /// gt
    Gt,
    /// ge
    Ge,
    /// lt
    Lt,
    /// le
    Le,
}

/// Combinator operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

/// Every operator name a document may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Compare(CompareOp),
    Combine(LogicOp),
}

impl Operator {
    /// Look up an operator by its document name. Names are case-sensitive.
    pub fn lookup(name: &str) -> Option<Self> {
        let op = match name {
            "eq" => Self::Compare(CompareOp::Eq),
            "ne" => Self::Compare(CompareOp::Ne),
            "gt" => Self::Compare(CompareOp::Gt),
            "ge" => Self::Compare(CompareOp::Ge),
            "lt" => Self::Compare(CompareOp::Lt),
            "le" => Self::Compare(CompareOp::Le),
            "and" => Self::Combine(LogicOp::And),
            "or" => Self::Combine(LogicOp::Or),
            _ => return None,
        };
        Some(op)
    }
}

impl Condition {
    /// The operator this node was built from
    pub fn operator(&self) -> Operator {
        match self {
            Condition::Compare { op, .. } => Operator::Compare(*op),
            Condition::Combine { op, .. } => Operator::Combine(*op),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "eq"),
            CompareOp::Ne => write!(f, "ne"),
            CompareOp::Gt => write!(f, "gt"),
            CompareOp::Ge => write!(f, "ge"),
            CompareOp::Lt => write!(f, "lt"),
            CompareOp::Le => write!(f, "le"),
        }
    }
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicOp::And => write!(f, "and"),
            LogicOp::Or => write!(f, "or"),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Compare(op) => op.fmt(f),
            Operator::Combine(op) => op.fmt(f),
        }
    }
}
