use super::*;
use crate::test_utils::{chain_cfg, scan, scheme_ab, uses};
use ra_core::RelationKey;

fn stmt(name: &str) -> Operator {
    Operator::store(
        RelationKey::new("public", "adhoc", name),
        scan("R", scheme_ab()),
    )
}

/// Nodes with no def/uses, so no optimization touches them
fn cfg_of(names: &[&str]) -> Cfg {
    let mut cfg = Cfg::new();
    for name in names {
        cfg.add_op(stmt(name), None, uses(&[]));
    }
    cfg
}

#[test]
fn test_linear_program_is_sequence() {
    let cfg = cfg_of(&["A", "B", "C"]);
    assert_eq!(
        cfg.structure().unwrap(),
        Operator::sequence(vec![stmt("A"), stmt("B"), stmt("C")])
    );
}

#[test]
fn test_loop_round_trip() {
    let mut cfg = cfg_of(&["A", "B", "C", "D", "E"]);
    cfg.add_edge(3, 1).unwrap();
    assert!(cfg.is_loop_header(1));
    assert!(cfg.is_loop_terminator(3));

    assert_eq!(
        cfg.structure().unwrap(),
        Operator::sequence(vec![
            stmt("A"),
            Operator::do_while(Operator::sequence(vec![stmt("B"), stmt("C")]), stmt("D")),
            stmt("E"),
        ])
    );
}

#[test]
fn test_loop_at_program_boundaries() {
    // header is the first node, terminator the last
    let mut cfg = cfg_of(&["B", "C", "D"]);
    cfg.add_edge(2, 0).unwrap();
    assert_eq!(
        cfg.structure().unwrap(),
        Operator::sequence(vec![Operator::do_while(
            Operator::sequence(vec![stmt("B"), stmt("C")]),
            stmt("D")
        )])
    );
}

#[test]
fn test_nested_loops() {
    // A; do { B; do { C } while D; E } while F; G
    let mut cfg = cfg_of(&["A", "B", "C", "D", "E", "F", "G"]);
    cfg.add_edge(3, 2).unwrap();
    cfg.add_edge(5, 1).unwrap();
    let inner = Operator::do_while(Operator::sequence(vec![stmt("C")]), stmt("D"));
    assert_eq!(
        cfg.structure().unwrap(),
        Operator::sequence(vec![
            stmt("A"),
            Operator::do_while(
                Operator::sequence(vec![stmt("B"), inner, stmt("E")]),
                stmt("F")
            ),
            stmt("G"),
        ])
    );
}

#[test]
fn test_loops_sharing_a_header() {
    // A; do { do { B } while C; D } while E; F
    let mut cfg = cfg_of(&["A", "B", "C", "D", "E", "F"]);
    cfg.add_edge(2, 1).unwrap();
    cfg.add_edge(4, 1).unwrap();
    let inner = Operator::do_while(Operator::sequence(vec![stmt("B")]), stmt("C"));
    assert_eq!(
        cfg.structure().unwrap(),
        Operator::sequence(vec![
            stmt("A"),
            Operator::do_while(Operator::sequence(vec![inner, stmt("D")]), stmt("E")),
            stmt("F"),
        ])
    );
}

#[test]
fn test_node_closing_two_loops() {
    // do { A; do { B } while C } while C; D
    let mut cfg = cfg_of(&["A", "B", "C", "D"]);
    cfg.add_edge(2, 1).unwrap();
    cfg.add_edge(2, 0).unwrap();
    assert_eq!(cfg.loops_closed(2), 2);

    let inner = Operator::do_while(Operator::sequence(vec![stmt("B")]), stmt("C"));
    assert_eq!(
        cfg.structure().unwrap(),
        Operator::sequence(vec![
            Operator::do_while(Operator::sequence(vec![stmt("A"), inner]), stmt("C")),
            stmt("D"),
        ])
    );
}

#[test]
fn test_single_node_loop() {
    let mut cfg = cfg_of(&["A", "B", "C"]);
    cfg.add_edge(1, 1).unwrap();
    assert_eq!(
        cfg.structure().unwrap(),
        Operator::sequence(vec![
            stmt("A"),
            Operator::do_while(Operator::sequence(vec![]), stmt("B")),
            stmt("C"),
        ])
    );
}

#[test]
fn test_terminator_without_header_is_unbalanced() {
    let mut cfg = cfg_of(&["A", "B", "C"]);
    // extra exit edge from B makes it a terminator with no open loop
    cfg.add_op(stmt("D"), None, uses(&[]));
    cfg.add_edge(1, 3).unwrap();
    assert!(matches!(
        cfg.structure(),
        Err(PlanError::UnbalancedLoops { .. })
    ));
}

#[test]
fn test_get_logical_plan_respects_config() {
    let full = chain_cfg().get_logical_plan(&PlannerConfig::default()).unwrap();
    assert_eq!(
        full,
        Operator::sequence(vec![Operator::store(
            RelationKey::new("public", "adhoc", "out"),
            Operator::distinct(scan("R", scheme_ab()))
        )])
    );

    let config = PlannerConfig {
        chaining: false,
        ..PlannerConfig::default()
    };
    let unchained = chain_cfg().get_logical_plan(&config).unwrap();
    match unchained.kind() {
        crate::algebra::OpKind::Sequence { ops } => assert_eq!(ops.len(), 3),
        other => panic!("expected Sequence, got {other:?}"),
    }
}
