//! Relation keys: `user:program:relation` identifiers for stored relations

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Default user component for bare relation names
pub const DEFAULT_USER: &str = "public";
/// Default program component for bare relation names
pub const DEFAULT_PROGRAM: &str = "adhoc";

/// Identity of a stored relation.
///
/// Parsed from `user:program:relation`; a bare `relation` expands to
/// `public:adhoc:relation`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelationKey {
    pub user: String,
    pub program: String,
    pub relation: String,
}

impl RelationKey {
    /// Build a key from its three components
    pub fn new(
        user: impl Into<String>,
        program: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            program: program.into(),
            relation: relation.into(),
        }
    }

    /// Parse `user:program:relation` or a bare relation name
    pub fn parse(s: &str) -> CoreResult<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let key = match parts.as_slice() {
            [relation] => Self::new(DEFAULT_USER, DEFAULT_PROGRAM, *relation),
            [user, program, relation] => Self::new(*user, *program, *relation),
            _ => {
                return Err(CoreError::InvalidRelationKey {
                    key: s.to_string(),
                })
            }
        };
        if key.user.is_empty() || key.program.is_empty() || key.relation.is_empty() {
            return Err(CoreError::InvalidRelationKey {
                key: s.to_string(),
            });
        }
        Ok(key)
    }
}

impl std::fmt::Display for RelationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.user, self.program, self.relation)
    }
}

impl std::str::FromStr for RelationKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RelationKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RelationKey> for String {
    fn from(key: RelationKey) -> Self {
        key.to_string()
    }
}
