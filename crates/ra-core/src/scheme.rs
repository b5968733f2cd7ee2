//! Relation scheme: ordered list of named, typed columns

use crate::error::{CoreError, CoreResult};
use crate::expr::AttributeRef;
use crate::types::ColumnType;
use serde::{Deserialize, Serialize};

/// A single column of a scheme
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Column name; unnamed columns are only addressable by position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    /// Create a named column
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: Some(name.into()),
            column_type,
        }
    }

    /// Create a column with no name
    pub fn unnamed(column_type: ColumnType) -> Self {
        Self {
            name: None,
            column_type,
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}:{}", name, self.column_type),
            None => write!(f, "_:{}", self.column_type),
        }
    }
}

/// Scheme of a relation: the ordered columns an operator produces.
///
/// Immutable once built; concatenation produces a new scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scheme {
    columns: Vec<Column>,
}

impl Scheme {
    /// Create a scheme from a list of columns
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Create an empty scheme
    pub fn empty() -> Self {
        Self::default()
    }

    /// Ordered columns
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the scheme has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column at a position, if in range
    pub fn get(&self, position: usize) -> Option<&Column> {
        self.columns.get(position)
    }

    /// Column names in order (`None` for unnamed columns)
    pub fn column_names(&self) -> Vec<Option<&str>> {
        self.columns.iter().map(|c| c.name.as_deref()).collect()
    }

    /// Whether exactly one column carries this name
    pub fn contains(&self, name: &str) -> bool {
        self.position_of(name).is_ok()
    }

    /// Position of a named column.
    ///
    /// Fails if the name is absent or bound at more than one position.
    pub fn position_of(&self, name: &str) -> CoreResult<usize> {
        let mut found: Option<usize> = None;
        for (i, col) in self.columns.iter().enumerate() {
            if col.name.as_deref() != Some(name) {
                continue;
            }
            if let Some(first) = found {
                return Err(CoreError::AmbiguousColumn {
                    name: name.to_string(),
                    first,
                    second: i,
                });
            }
            found = Some(i);
        }
        found.ok_or_else(|| CoreError::UnknownColumn {
            name: name.to_string(),
            scheme: self.to_string(),
        })
    }

    /// Column at a position, or a schema error if out of range
    pub fn column_at(&self, position: usize) -> CoreResult<&Column> {
        self.columns
            .get(position)
            .ok_or(CoreError::ColumnOutOfRange {
                position,
                len: self.columns.len(),
            })
    }

    /// Resolve an attribute reference to its position
    pub fn resolve_position(&self, attr: &AttributeRef) -> CoreResult<usize> {
        match attr {
            AttributeRef::Named(name) => self.position_of(name),
            AttributeRef::Unnamed(position) => self.column_at(*position).map(|_| *position),
        }
    }

    /// Resolve an attribute reference to its (name, type) column
    pub fn resolve(&self, attr: &AttributeRef) -> CoreResult<&Column> {
        let position = self.resolve_position(attr)?;
        self.column_at(position)
    }

    /// Concatenate two schemes; right-hand positions shift by `self.len()`
    pub fn concat(&self, other: &Scheme) -> Scheme {
        let mut columns = Vec::with_capacity(self.len() + other.len());
        columns.extend(self.columns.iter().cloned());
        columns.extend(other.columns.iter().cloned());
        Scheme { columns }
    }
}

impl std::ops::Add for &Scheme {
    type Output = Scheme;

    fn add(self, rhs: &Scheme) -> Scheme {
        self.concat(rhs)
    }
}

impl std::ops::Add for Scheme {
    type Output = Scheme;

    fn add(mut self, rhs: Scheme) -> Scheme {
        self.columns.extend(rhs.columns);
        self
    }
}

impl From<Vec<(&str, ColumnType)>> for Scheme {
    fn from(pairs: Vec<(&str, ColumnType)>) -> Self {
        Scheme::new(
            pairs
                .into_iter()
                .map(|(name, ty)| Column::new(name, ty))
                .collect(),
        )
    }
}

impl FromIterator<Column> for Scheme {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        Scheme::new(iter.into_iter().collect())
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cols: Vec<String> = self.columns.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}]", cols.join(", "))
    }
}

#[cfg(test)]
#[path = "scheme_test.rs"]
mod tests;
