// SPDX-License-Identifier: MIT

//! Conditions gating task creation
//!
//! A condition is a JSON document with a single root operator:
//! - `{"eq": [1, 1]}`
//! - `{"and": {"gt": [5, 3], "lt": [2, 10]}}`
//! - `{"or": {"eq": [1, 2], "eq": [1, 1]}}`

mod ast;
mod builder;
mod document;
mod evaluator;
mod interpreter;

pub use ast::{CompareOp, Condition, LogicOp, Operator};
pub use builder::build;
pub use document::{ConditionValue, Document};
pub use evaluator::evaluate;
pub use interpreter::{compile, evaluate_document};
