//! Column lists carried by Apply and GroupBy

use ra_core::{Expression, Scheme};
use serde::{Deserialize, Serialize};

/// One output column of an `Apply`: an expression and an optional name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub expr: Expression,
}

impl Mapping {
    pub fn new(name: impl Into<String>, expr: Expression) -> Self {
        Self {
            name: Some(name.into()),
            expr,
        }
    }

    pub fn unnamed(expr: Expression) -> Self {
        Self { name: None, expr }
    }

    /// Output column name.
    ///
    /// Explicit name first, then the name of a referenced input column, then
    /// the expression text.
    pub fn output_name(&self, input: &Scheme) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.expr
            .as_attribute()
            .and_then(|attr| input.resolve(attr).ok())
            .and_then(|column| column.name.clone())
            .unwrap_or_else(|| self.expr.to_string())
    }
}

impl std::fmt::Display for Mapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}={}", self.expr),
            None => write!(f, "{}", self.expr),
        }
    }
}

/// GroupBy column list, split at construction into grouping and aggregate
/// expressions.
///
/// Positions in the original list are kept so that synthesized output
/// names stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Expression>", into = "Vec<Expression>")]
pub struct GroupColumns {
    columns: Vec<Expression>,
    grouping: Vec<usize>,
    aggregates: Vec<usize>,
}

impl GroupColumns {
    pub fn new(columns: Vec<Expression>) -> Self {
        let (aggregates, grouping): (Vec<usize>, Vec<usize>) =
            (0..columns.len()).partition(|&i| columns[i].is_aggregate());
        Self {
            columns,
            grouping,
            aggregates,
        }
    }

    /// The full list as given
    pub fn columns(&self) -> &[Expression] {
        &self.columns
    }

    /// Grouping expressions with their original positions
    pub fn grouping(&self) -> impl Iterator<Item = (usize, &Expression)> + '_ {
        self.grouping.iter().map(|&i| (i, &self.columns[i]))
    }

    /// Aggregate expressions with their original positions
    pub fn aggregates(&self) -> impl Iterator<Item = (usize, &Expression)> + '_ {
        self.aggregates.iter().map(|&i| (i, &self.columns[i]))
    }

    /// Output order: grouping expressions, then aggregates
    pub fn output_order(&self) -> impl Iterator<Item = (usize, &Expression)> + '_ {
        self.grouping().chain(self.aggregates())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl From<Vec<Expression>> for GroupColumns {
    fn from(columns: Vec<Expression>) -> Self {
        Self::new(columns)
    }
}

impl From<GroupColumns> for Vec<Expression> {
    fn from(columns: GroupColumns) -> Self {
        columns.columns
    }
}

impl std::fmt::Display for GroupColumns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let grouping: Vec<String> = self.grouping().map(|(_, e)| e.to_string()).collect();
        let aggregates: Vec<String> = self.aggregates().map(|(_, e)| e.to_string()).collect();
        write!(f, "{}; {}", grouping.join(","), aggregates.join(","))
    }
}
