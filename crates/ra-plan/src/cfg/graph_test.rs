use super::*;
use crate::test_utils::{chain_cfg, scan, scheme_ab, temp, uses};

#[test]
fn test_add_op_links_linearly() {
    let cfg = chain_cfg();
    assert_eq!(cfg.len(), 3);
    assert_eq!(cfg.node_ids(), vec![0, 1, 2]);
    assert_eq!(cfg.edges(), vec![(0, 1), (1, 2)]);
    assert_eq!(cfg.next_op_id(), 3);
    assert_eq!(cfg.successors(0), vec![1]);
    assert_eq!(cfg.predecessors(2), vec![1]);
}

#[test]
fn test_entry_and_exit_count_as_edges() {
    let cfg = chain_cfg();
    assert_eq!(cfg.in_degree(0), 1);
    assert_eq!(cfg.out_degree(0), 1);
    assert_eq!(cfg.in_degree(2), 1);
    assert_eq!(cfg.out_degree(2), 1);
    assert!(!cfg.is_loop_header(0));
    assert!(!cfg.is_loop_terminator(2));
}

#[test]
fn test_back_edge_marks_loop() {
    let mut cfg = chain_cfg();
    cfg.add_edge(2, 1).unwrap();
    assert!(cfg.is_loop_header(1));
    assert!(cfg.is_loop_terminator(2));
    assert_eq!(cfg.out_degree(2), 2);
}

#[test]
fn test_add_edge_unknown_node() {
    let mut cfg = chain_cfg();
    assert!(matches!(
        cfg.add_edge(0, 9),
        Err(PlanError::UnknownCfgNode { id: 9 })
    ));
}

#[test]
fn test_delete_node_reroutes_predecessors() {
    let mut cfg = chain_cfg();
    let removed = cfg.delete_node(1).unwrap();
    assert_eq!(removed.def.as_deref(), Some("y"));
    assert_eq!(cfg.node_ids(), vec![0, 2]);
    assert_eq!(cfg.edges(), vec![(0, 2)]);
}

#[test]
fn test_delete_loop_header_reroutes_back_edge() {
    let mut cfg = chain_cfg();
    cfg.add_op(scan("T", scheme_ab()), None, uses(&[]));
    cfg.add_edge(2, 1).unwrap();

    cfg.delete_node(1).unwrap();
    assert_eq!(cfg.edges(), vec![(0, 2), (2, 2), (2, 3)]);
    assert!(cfg.is_loop_header(2));
    assert!(cfg.is_loop_terminator(2));
}

#[test]
fn test_delete_outer_header_onto_inner_header() {
    // 0; do { 1; do { 2 } while 3 } while 4; 5
    let mut cfg = chain_cfg();
    for name in ["T3", "T4", "T5"] {
        cfg.add_op(scan(name, scheme_ab()), None, uses(&[]));
    }
    cfg.add_edge(3, 2).unwrap();
    cfg.add_edge(4, 1).unwrap();
    assert_eq!(cfg.loops_opened(1), 1);
    assert_eq!(cfg.loops_opened(2), 1);

    cfg.delete_node(1).unwrap();
    assert_eq!(cfg.predecessors(2), vec![0, 3, 4]);
    assert_eq!(cfg.in_degree(2), 3);
    assert_eq!(cfg.loops_opened(2), 2);
    assert!(cfg.is_loop_header(2));
    assert_eq!(cfg.loops_closed(3), 1);
    assert_eq!(cfg.loops_closed(4), 1);
    assert_eq!(cfg.loops_closed(5), 0);
}

#[test]
fn test_delete_last_node() {
    let mut cfg = chain_cfg();
    cfg.delete_node(2).unwrap();
    assert_eq!(cfg.edges(), vec![(0, 1)]);
    assert_eq!(cfg.out_degree(1), 1);
    assert!(cfg.delete_node(2).is_err());
}

#[test]
fn test_inline_node_substitutes_stored_plan() {
    let mut cfg = chain_cfg();
    cfg.inline_node(0, 1, "x").unwrap();
    let node = cfg.node(1).unwrap();
    assert_eq!(
        node.op,
        Operator::store_temp("y", Operator::distinct(scan("R", scheme_ab())))
    );
    assert!(node.uses.is_empty());
    assert_eq!(cfg.node_ids(), vec![1, 2]);
}

#[test]
fn test_inline_node_without_read_fails() {
    let mut cfg = Cfg::new();
    cfg.add_op(
        Operator::store_temp("x", scan("R", scheme_ab())),
        Some("x".to_string()),
        uses(&[]),
    );
    // claims to read x but never scans it
    cfg.add_op(Operator::distinct(temp("z")), None, uses(&["x"]));
    assert!(matches!(
        cfg.inline_node(0, 1, "x"),
        Err(PlanError::InconsistentUses { node: 1, .. })
    ));
}

#[test]
fn test_display() {
    let cfg = chain_cfg();
    let text = cfg.to_string();
    assert!(text.starts_with("0: uses=[] def=x op=StoreTemp(x)[Scan(public:adhoc:R)]"));
    assert!(text.contains("1: uses=[x] def=y"));
    assert!(text.contains("2: uses=[y] def=-"));
    assert!(text.ends_with("0=>1; 1=>2"));
}
