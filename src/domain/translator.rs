// Term translation: algebraic terms to engine-level linear and quadratic terms

use super::models::{Expression, Monomial};

/// `coefficient * var`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTerm<V> {
    pub coefficient: f64,
    pub var: V,
}

/// `coefficient * first * second`, coefficient forwarded as given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticTerm<V> {
    pub coefficient: f64,
    pub first: V,
    pub second: V,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TranslatedTerm<V> {
    Linear(LinearTerm<V>),
    Quadratic(QuadraticTerm<V>),
}

/// Terms of one expression split by arity, in expression iteration order.
#[derive(Debug, Clone, PartialEq)]
pub struct TermBatch<V> {
    pub linear: Vec<LinearTerm<V>>,
    pub quadratic: Vec<QuadraticTerm<V>>,
}

impl<V> Default for TermBatch<V> {
    fn default() -> Self {
        Self {
            linear: Vec::new(),
            quadratic: Vec::new(),
        }
    }
}

impl<V> TermBatch<V> {
    pub fn len(&self) -> usize {
        self.linear.len() + self.quadratic.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("variable {0} has no engine column")]
    UnknownVariable(usize),

    #[error("term {monomial} has {degree} variables; only 1 or 2 are supported")]
    UnsupportedArity { monomial: String, degree: usize },
}

/// Translate a single term through `lookup` (variable index → engine handle).
pub fn translate_term<V, F>(
    monomial: &Monomial,
    coefficient: f64,
    lookup: F,
) -> Result<TranslatedTerm<V>, TranslateError>
where
    F: Fn(usize) -> Option<V>,
{
    let resolve = |index: usize| lookup(index).ok_or(TranslateError::UnknownVariable(index));

    match *monomial.vars() {
        [var] => Ok(TranslatedTerm::Linear(LinearTerm {
            coefficient,
            var: resolve(var)?,
        })),
        [first, second] => Ok(TranslatedTerm::Quadratic(QuadraticTerm {
            coefficient,
            first: resolve(first)?,
            second: resolve(second)?,
        })),
        _ => Err(TranslateError::UnsupportedArity {
            monomial: monomial.to_string(),
            degree: monomial.degree(),
        }),
    }
}

/// Translate every term of `expression`, routing each by its own arity.
///
/// The constant is not part of the batch; callers fold it into the
/// objective offset or the row's right-hand side.
pub fn translate_expression<V, F>(
    expression: &Expression,
    lookup: F,
) -> Result<TermBatch<V>, TranslateError>
where
    F: Fn(usize) -> Option<V>,
{
    let mut batch = TermBatch::default();
    for (monomial, coefficient) in expression.terms() {
        match translate_term(monomial, coefficient, &lookup)? {
            TranslatedTerm::Linear(term) => batch.linear.push(term),
            TranslatedTerm::Quadratic(term) => batch.quadratic.push(term),
        }
    }
    Ok(batch)
}
