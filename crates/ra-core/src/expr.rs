//! Scalar expressions carried by operators (conditions, mappings, aggregates)

use crate::error::{CoreError, CoreResult};
use crate::scheme::Scheme;
use crate::types::ColumnType;
use serde::{Deserialize, Serialize};

/// Reference to a column of an operator's input, by name or by position
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeRef {
    /// Positional reference, rendered `$i`
    Unnamed(usize),
    /// Reference by column name
    Named(String),
}

impl AttributeRef {
    /// Shorthand for a named reference
    pub fn named(name: impl Into<String>) -> Self {
        AttributeRef::Named(name.into())
    }
}

impl std::fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeRef::Unnamed(i) => write!(f, "${i}"),
            AttributeRef::Named(name) => write!(f, "{name}"),
        }
    }
}

/// A literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Boolean literal
    Boolean(bool),
    /// Integer literal
    Integer(i64),
    /// Float literal
    Float(f64),
    /// String literal
    String(String),
}

impl Literal {
    /// Column type of this literal
    pub fn column_type(&self) -> ColumnType {
        match self {
            Literal::Boolean(_) => ColumnType::Boolean,
            Literal::Integer(_) => ColumnType::Long,
            Literal::Float(_) => ColumnType::Double,
            Literal::String(_) => ColumnType::String,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Integer(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{x}"),
            Literal::String(s) => write!(f, "'{s}'"),
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// Logical NOT
    Not,
    /// Arithmetic negation
    Neg,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// Equality (=)
    Eq,
    /// Inequality (!=)
    NotEq,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    LtEq,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    GtEq,
    /// Logical AND
    And,
    /// Logical OR
    Or,
    /// Addition (+)
    Plus,
    /// Subtraction (-)
    Minus,
    /// Multiplication (*)
    Times,
    /// Division (/)
    Divide,
}

impl BinaryOp {
    /// Check if this is a comparison operator
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
        )
    }

    /// Check if this is a logical operator
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// Upper-case kind name
    pub fn kind_name(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "EQ",
            BinaryOp::NotEq => "NEQ",
            BinaryOp::Lt => "LT",
            BinaryOp::LtEq => "LTEQ",
            BinaryOp::Gt => "GT",
            BinaryOp::GtEq => "GTEQ",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Plus => "PLUS",
            BinaryOp::Minus => "MINUS",
            BinaryOp::Times => "TIMES",
            BinaryOp::Divide => "DIVIDE",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Divide => "/",
        };
        write!(f, "{symbol}")
    }
}

/// Aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFunc {
    /// COUNT(expr)
    Count,
    /// COUNT(*)
    CountAll,
    /// SUM(expr)
    Sum,
    /// MIN(expr)
    Min,
    /// MAX(expr)
    Max,
    /// AVG(expr)
    Avg,
}

impl AggregateFunc {
    /// Upper-case kind name
    pub fn kind_name(&self) -> &'static str {
        match self {
            AggregateFunc::Count => "COUNT",
            AggregateFunc::CountAll => "COUNTALL",
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Min => "MIN",
            AggregateFunc::Max => "MAX",
            AggregateFunc::Avg => "AVG",
        }
    }
}

/// Scalar expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// Column reference
    Attr(AttributeRef),
    /// Constant
    Literal(Literal),
    /// Unary operation
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    /// Binary operation
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Aggregate over an input expression (`None` only for COUNT(*))
    Aggregate {
        func: AggregateFunc,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<Box<Expression>>,
    },
}

impl Expression {
    /// Named column reference
    pub fn attr(name: impl Into<String>) -> Self {
        Expression::Attr(AttributeRef::Named(name.into()))
    }

    /// Positional column reference
    pub fn col(position: usize) -> Self {
        Expression::Attr(AttributeRef::Unnamed(position))
    }

    /// Integer literal
    pub fn int(value: i64) -> Self {
        Expression::Literal(Literal::Integer(value))
    }

    /// Build a binary expression
    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `left = right`
    pub fn equals(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOp::Eq, left, right)
    }

    /// `left AND right`
    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOp::And, left, right)
    }

    /// Equijoin condition `$col0 = $col1`
    pub fn eq_attrs(col0: usize, col1: usize) -> Self {
        Self::equals(Self::col(col0), Self::col(col1))
    }

    /// Build an aggregate over an input expression
    pub fn aggregate(func: AggregateFunc, input: Expression) -> Self {
        Expression::Aggregate {
            func,
            input: Some(Box::new(input)),
        }
    }

    /// COUNT(*)
    pub fn count_all() -> Self {
        Expression::Aggregate {
            func: AggregateFunc::CountAll,
            input: None,
        }
    }

    /// Whether this expression is a bare column reference
    pub fn as_attribute(&self) -> Option<&AttributeRef> {
        match self {
            Expression::Attr(attr) => Some(attr),
            _ => None,
        }
    }

    /// Whether an aggregate occurs anywhere in this expression
    pub fn is_aggregate(&self) -> bool {
        match self {
            Expression::Aggregate { .. } => true,
            Expression::Attr(_) | Expression::Literal(_) => false,
            Expression::Unary { operand, .. } => operand.is_aggregate(),
            Expression::Binary { left, right, .. } => left.is_aggregate() || right.is_aggregate(),
        }
    }

    /// Upper-case name of the expression's outermost kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Attr(AttributeRef::Named(_)) => "NAMEDATTRIBUTEREF",
            Expression::Attr(AttributeRef::Unnamed(_)) => "UNNAMEDATTRIBUTEREF",
            Expression::Literal(_) => "LITERAL",
            Expression::Unary {
                op: UnaryOp::Not, ..
            } => "NOT",
            Expression::Unary {
                op: UnaryOp::Neg, ..
            } => "NEG",
            Expression::Binary { op, .. } => op.kind_name(),
            Expression::Aggregate { func, .. } => func.kind_name(),
        }
    }

    /// All column references in this expression, left to right
    pub fn attributes(&self) -> Vec<&AttributeRef> {
        let mut out = Vec::new();
        self.collect_attributes(&mut out);
        out
    }

    fn collect_attributes<'a>(&'a self, out: &mut Vec<&'a AttributeRef>) {
        match self {
            Expression::Attr(attr) => out.push(attr),
            Expression::Literal(_) => {}
            Expression::Unary { operand, .. } => operand.collect_attributes(out),
            Expression::Binary { left, right, .. } => {
                left.collect_attributes(out);
                right.collect_attributes(out);
            }
            Expression::Aggregate { input, .. } => {
                if let Some(input) = input {
                    input.collect_attributes(out);
                }
            }
        }
    }

    /// Infer the result type of this expression over an input scheme
    pub fn type_of(&self, scheme: &Scheme) -> CoreResult<ColumnType> {
        match self {
            Expression::Attr(attr) => Ok(scheme.resolve(attr)?.column_type),
            Expression::Literal(lit) => Ok(lit.column_type()),
            Expression::Unary {
                op: UnaryOp::Not, ..
            } => Ok(ColumnType::Boolean),
            Expression::Unary {
                op: UnaryOp::Neg,
                operand,
            } => {
                let ty = operand.type_of(scheme)?;
                if ty.is_numeric() {
                    Ok(ty)
                } else {
                    Err(self.mismatch(format!("cannot negate {ty}")))
                }
            }
            Expression::Binary { op, left, right } => {
                let lt = left.type_of(scheme)?;
                let rt = right.type_of(scheme)?;
                if op.is_comparison() || op.is_logical() {
                    return Ok(ColumnType::Boolean);
                }
                if *op == BinaryOp::Divide && lt.is_numeric() && rt.is_numeric() {
                    return Ok(ColumnType::Double);
                }
                lt.widen(rt)
                    .ok_or_else(|| self.mismatch(format!("{op} over {lt} and {rt}")))
            }
            Expression::Aggregate { func, input } => {
                let input_ty = match input {
                    Some(input) => Some(input.type_of(scheme)?),
                    None => None,
                };
                match (func, input_ty) {
                    (AggregateFunc::Count | AggregateFunc::CountAll, _) => Ok(ColumnType::Long),
                    (AggregateFunc::Avg, _) => Ok(ColumnType::Double),
                    (AggregateFunc::Sum, Some(ty)) if ty.is_floating() => Ok(ColumnType::Double),
                    (AggregateFunc::Sum, Some(ty)) if ty.is_numeric() => Ok(ColumnType::Long),
                    (AggregateFunc::Min | AggregateFunc::Max, Some(ty)) => Ok(ty),
                    (_, ty) => Err(self.mismatch(format!(
                        "{} over {}",
                        func.kind_name(),
                        ty.map(|t| t.to_string()).unwrap_or_else(|| "*".into())
                    ))),
                }
            }
        }
    }

    fn mismatch(&self, message: String) -> CoreError {
        CoreError::TypeMismatch {
            expr: self.to_string(),
            message,
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Attr(attr) => write!(f, "{attr}"),
            Expression::Literal(lit) => write!(f, "{lit}"),
            Expression::Unary {
                op: UnaryOp::Not,
                operand,
            } => write!(f, "NOT({operand})"),
            Expression::Unary {
                op: UnaryOp::Neg,
                operand,
            } => write!(f, "(-{operand})"),
            Expression::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
            Expression::Aggregate { func, input: None } => write!(f, "{}", func.kind_name()),
            Expression::Aggregate {
                func,
                input: Some(input),
            } => write!(f, "{}({input})", func.kind_name()),
        }
    }
}

#[cfg(test)]
#[path = "expr_test.rs"]
mod tests;
