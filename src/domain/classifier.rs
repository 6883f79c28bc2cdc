// Expression order classification, recomputed on every use

use super::models::Expression;
use super::value_objects::ExpressionOrder;

/// Classify an expression by the largest variable count across its terms.
pub fn classify(expression: &Expression) -> ExpressionOrder {
    ExpressionOrder::from_degree(expression.degree())
}
