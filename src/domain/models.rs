use super::value_objects::{ObjectiveSense, Relation, VariableType};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Decision variable (a column) owned by a solver session
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub index: usize,
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub name: String,
}

impl Variable {
    /// Continuous column on `[0, +inf)`, named `x` + 1-based index.
    pub fn continuous(index: usize) -> Self {
        Self {
            index,
            variable_type: VariableType::Continuous,
            lower_bound: 0.0,
            upper_bound: f64::INFINITY,
            name: format!("x{}", index + 1),
        }
    }

    pub fn is_integer(&self) -> bool {
        self.variable_type.is_integer()
    }
}

/// Ordered list of variable indices multiplied together in a term.
///
/// Order is significant: `x0*x1` and `x1*x0` are distinct monomials and are
/// forwarded to the engine in the order given.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(Vec<usize>);

impl Monomial {
    pub fn new(vars: impl Into<Vec<usize>>) -> Self {
        Self(vars.into())
    }

    pub fn vars(&self) -> &[usize] {
        &self.0
    }

    pub fn degree(&self) -> usize {
        self.0.len()
    }

    fn product(&self, other: &Monomial) -> Monomial {
        let mut vars = Vec::with_capacity(self.0.len() + other.0.len());
        vars.extend_from_slice(&self.0);
        vars.extend_from_slice(&other.0);
        Monomial(vars)
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, var) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            write!(f, "v{}", var)?;
        }
        Ok(())
    }
}

/// Polynomial over session variables: monomial → coefficient, plus a constant.
///
/// Adding a monomial that is already present sums the coefficients; a term
/// whose coefficient cancels to exactly zero is dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    terms: BTreeMap<Monomial, f64>,
    constant: f64,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_constant(constant: f64) -> Self {
        Self {
            constant,
            ..Default::default()
        }
    }

    /// Single variable with coefficient 1.0.
    pub fn var(index: usize) -> Self {
        Self::term([index], 1.0)
    }

    /// Single term: `coefficient * vars[0] * vars[1] * ...`.
    pub fn term(vars: impl Into<Vec<usize>>, coefficient: f64) -> Self {
        let mut expr = Self::new();
        expr.add_term(vars, coefficient);
        expr
    }

    /// Linear expression from `(index, coefficient)` pairs.
    pub fn linear(terms: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut expr = Self::new();
        for (index, coefficient) in terms {
            expr.add_term([index], coefficient);
        }
        expr
    }

    /// Add a term in place. An empty variable list contributes to the constant.
    pub fn add_term(&mut self, vars: impl Into<Vec<usize>>, coefficient: f64) -> &mut Self {
        let vars = vars.into();
        if vars.is_empty() {
            self.constant += coefficient;
            return self;
        }
        self.insert(Monomial(vars), coefficient);
        self
    }

    fn insert(&mut self, monomial: Monomial, coefficient: f64) {
        let total = self.terms.get(&monomial).copied().unwrap_or(0.0) + coefficient;
        if total == 0.0 {
            // cancelled terms must not influence the order
            self.terms.remove(&monomial);
        } else {
            self.terms.insert(monomial, total);
        }
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, f64)> + '_ {
        self.terms.iter().map(|(m, c)| (m, *c))
    }

    pub fn coefficient(&self, vars: &[usize]) -> f64 {
        self.terms
            .get(&Monomial(vars.to_vec()))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Largest number of variables in any term (0 when there are none).
    pub fn degree(&self) -> usize {
        self.terms.keys().map(Monomial::degree).max().unwrap_or(0)
    }

    pub fn scale(&self, by: f64) -> Self {
        let mut scaled = Self::from_constant(self.constant * by);
        for (monomial, coefficient) in &self.terms {
            scaled.insert(monomial.clone(), coefficient * by);
        }
        scaled
    }

    pub fn leq(self, rhs: impl Into<Expression>) -> Constraint {
        Constraint::new(self, Relation::LessThanOrEqual, rhs)
    }

    pub fn geq(self, rhs: impl Into<Expression>) -> Constraint {
        Constraint::new(self, Relation::GreaterThanOrEqual, rhs)
    }

    pub fn equals(self, rhs: impl Into<Expression>) -> Constraint {
        Constraint::new(self, Relation::Equal, rhs)
    }
}

impl From<f64> for Expression {
    fn from(constant: f64) -> Self {
        Self::from_constant(constant)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (monomial, coefficient) in &self.terms {
            if first {
                write!(f, "{} {}", coefficient, monomial)?;
                first = false;
            } else if *coefficient < 0.0 {
                write!(f, " - {} {}", -coefficient, monomial)?;
            } else {
                write!(f, " + {} {}", coefficient, monomial)?;
            }
        }
        if first {
            write!(f, "{}", self.constant)
        } else if self.constant < 0.0 {
            write!(f, " - {}", -self.constant)
        } else if self.constant > 0.0 {
            write!(f, " + {}", self.constant)
        } else {
            Ok(())
        }
    }
}

impl AddAssign<&Expression> for Expression {
    fn add_assign(&mut self, rhs: &Expression) {
        self.constant += rhs.constant;
        for (monomial, coefficient) in &rhs.terms {
            self.insert(monomial.clone(), *coefficient);
        }
    }
}

impl AddAssign for Expression {
    fn add_assign(&mut self, rhs: Expression) {
        *self += &rhs;
    }
}

impl SubAssign<&Expression> for Expression {
    fn sub_assign(&mut self, rhs: &Expression) {
        *self += &rhs.scale(-1.0);
    }
}

impl Add for Expression {
    type Output = Expression;

    fn add(mut self, rhs: Expression) -> Expression {
        self += &rhs;
        self
    }
}

impl Add<f64> for Expression {
    type Output = Expression;

    fn add(mut self, rhs: f64) -> Expression {
        self.constant += rhs;
        self
    }
}

impl Sub for Expression {
    type Output = Expression;

    fn sub(mut self, rhs: Expression) -> Expression {
        self -= &rhs;
        self
    }
}

impl Sub<f64> for Expression {
    type Output = Expression;

    fn sub(mut self, rhs: f64) -> Expression {
        self.constant -= rhs;
        self
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        self.scale(-1.0)
    }
}

impl Mul<f64> for Expression {
    type Output = Expression;

    fn mul(self, rhs: f64) -> Expression {
        self.scale(rhs)
    }
}

impl Mul<Expression> for f64 {
    type Output = Expression;

    fn mul(self, rhs: Expression) -> Expression {
        rhs.scale(self)
    }
}

impl Mul for &Expression {
    type Output = Expression;

    /// Distributes the product; monomials are concatenated left to right.
    fn mul(self, rhs: &Expression) -> Expression {
        let mut product = Expression::from_constant(self.constant * rhs.constant);
        for (left, lc) in &self.terms {
            for (right, rc) in &rhs.terms {
                product.insert(left.product(right), lc * rc);
            }
            if rhs.constant != 0.0 {
                product.insert(left.clone(), lc * rhs.constant);
            }
        }
        if self.constant != 0.0 {
            for (right, rc) in &rhs.terms {
                product.insert(right.clone(), self.constant * rc);
            }
        }
        product
    }
}

impl Mul for Expression {
    type Output = Expression;

    fn mul(self, rhs: Expression) -> Expression {
        &self * &rhs
    }
}

/// Constraint normalized to `expression <relation> rhs`, where
/// `expression = lhs - rhs_side` and `rhs = -expression.constant()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    expression: Expression,
    relation: Relation,
    rhs: f64,
    name: Option<String>,
}

impl Constraint {
    pub fn new(lhs: impl Into<Expression>, relation: Relation, rhs: impl Into<Expression>) -> Self {
        let expression = lhs.into() - rhs.into();
        let rhs = -expression.constant();
        Self {
            expression,
            relation,
            rhs,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The combined `lhs - rhs` expression, constant included.
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} 0", self.expression, self.relation)
    }
}

/// Objective function to minimize or maximize
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub expression: Expression,
    pub sense: ObjectiveSense,
}

impl Objective {
    pub fn new(expression: Expression, sense: ObjectiveSense) -> Self {
        Self { expression, sense }
    }

    pub fn minimize(expression: Expression) -> Self {
        Self::new(expression, ObjectiveSense::Minimize)
    }

    pub fn maximize(expression: Expression) -> Self {
        Self::new(expression, ObjectiveSense::Maximize)
    }
}
