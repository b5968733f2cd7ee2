//! Shared test fixtures for ra-plan

use crate::algebra::Operator;
use crate::cfg::Cfg;
use ra_core::{ColumnType, RelationKey, Scheme};

/// `[a:INT, b:STRING]`
pub fn scheme_ab() -> Scheme {
    Scheme::from(vec![("a", ColumnType::Int), ("b", ColumnType::String)])
}

/// `[c:INT, d:DOUBLE]`
pub fn scheme_cd() -> Scheme {
    Scheme::from(vec![("c", ColumnType::Int), ("d", ColumnType::Double)])
}

/// Scan of `public:adhoc:<name>`
pub fn scan(name: &str, scheme: Scheme) -> Operator {
    Operator::scan(RelationKey::new("public", "adhoc", name), scheme)
}

/// `ScanTemp(name)` over [`scheme_ab`]
pub fn temp(name: &str) -> Operator {
    Operator::scan_temp(name, scheme_ab())
}

/// Use set from a list of temp names
pub fn uses(names: &[&str]) -> std::collections::BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Three-node chain:
///
/// ```text
/// 0: x = Scan(R)
/// 1: y = Distinct(x)
/// 2: Store(out, y)
/// ```
pub fn chain_cfg() -> Cfg {
    let mut cfg = Cfg::new();
    cfg.add_op(
        Operator::store_temp("x", scan("R", scheme_ab())),
        Some("x".to_string()),
        uses(&[]),
    );
    cfg.add_op(
        Operator::store_temp("y", Operator::distinct(temp("x"))),
        Some("y".to_string()),
        uses(&["x"]),
    );
    cfg.add_op(
        Operator::store(RelationKey::new("public", "adhoc", "out"), temp("y")),
        None,
        uses(&["y"]),
    );
    cfg
}
