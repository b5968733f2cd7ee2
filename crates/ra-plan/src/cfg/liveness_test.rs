use super::*;
use crate::algebra::Operator;
use crate::test_utils::{chain_cfg, scan, scheme_ab, temp, uses};

#[test]
fn test_liveness_on_chain() {
    let cfg = chain_cfg();
    let live = cfg.compute_liveness();

    assert_eq!(*live.live_out(0), uses(&["x"]));
    assert_eq!(*live.live_in(1), uses(&["x"]));
    assert_eq!(*live.live_out(1), uses(&["y"]));
    assert_eq!(*live.live_in(2), uses(&["y"]));
    assert!(live.live_out(2).is_empty());
    assert!(live.live_in(0).is_empty());
}

#[test]
fn test_liveness_around_loop() {
    // 0: x = Scan(R)
    // 1: x = Distinct(x)      <- loop header
    // 2: cond(x)              -> back to 1
    // 3: Store(out, x)
    let mut cfg = Cfg::new();
    cfg.add_op(
        Operator::store_temp("x", scan("R", scheme_ab())),
        Some("x".into()),
        uses(&[]),
    );
    cfg.add_op(
        Operator::store_temp("x", Operator::distinct(temp("x"))),
        Some("x".into()),
        uses(&["x"]),
    );
    cfg.add_op(temp("x"), None, uses(&["x"]));
    cfg.add_op(temp("x"), None, uses(&["x"]));
    cfg.add_edge(2, 1).unwrap();

    let live = cfg.compute_liveness();
    // x flows around the back edge into the header
    assert_eq!(*live.live_out(2), uses(&["x"]));
    assert_eq!(*live.live_in(1), uses(&["x"]));
    assert_eq!(*live.live_out(1), uses(&["x"]));
    assert_eq!(*live.live_out(0), uses(&["x"]));
}

#[test]
fn test_def_kills_liveness() {
    let mut cfg = Cfg::new();
    cfg.add_op(
        Operator::store_temp("x", scan("R", scheme_ab())),
        Some("x".into()),
        uses(&[]),
    );
    cfg.add_op(
        Operator::store_temp("x", scan("S", scheme_ab())),
        Some("x".into()),
        uses(&[]),
    );
    cfg.add_op(temp("x"), None, uses(&["x"]));

    let live = cfg.compute_liveness();
    assert!(live.live_in(1).is_empty());
    assert!(!live.live_out(0).contains("x"));
}

#[test]
fn test_unknown_node_has_empty_sets() {
    let live = chain_cfg().compute_liveness();
    assert!(live.live_in(42).is_empty());
    assert!(live.live_out(42).is_empty());
}
