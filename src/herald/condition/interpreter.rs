//! Single entry point: condition document in, boolean out

use super::ast::Condition;
use super::builder::build;
use super::document::Document;
use super::evaluator::evaluate;
use crate::base::error::ConditionError;

/// Build the tree rooted at the document's first (root) operator.
///
/// Callers are expected to have checked that the document has exactly one
/// key; any further entries are ignored.
pub fn compile(document: &Document) -> Result<Condition, ConditionError> {
    let (operator, value) = document.first().ok_or(ConditionError::EmptyDocument)?;
    build(operator, value)
}

/// Build and evaluate a condition document
pub fn evaluate_document(document: &Document) -> Result<bool, ConditionError> {
    let root = compile(document)?;
    let result = evaluate(&root)?;
    log::debug!("Condition rooted at '{}' evaluated to {}", root.operator(), result);
    Ok(result)
}
