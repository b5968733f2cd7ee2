use super::*;
use crate::error::PlanError;
use crate::test_utils::{scan, scheme_ab, scheme_cd, temp};
use ra_core::serde_helpers::from_yaml_str;
use ra_core::{AggregateFunc, BinaryOp, Column, ColumnType, CoreError};

fn r() -> Operator {
    scan("R", scheme_ab())
}

fn s() -> Operator {
    scan("S", scheme_cd())
}

#[test]
fn test_equality_ignores_bookkeeping() {
    let mut first = r();
    let second = r();
    assert_eq!(first, second);

    first.set_bound(Some("V7".to_string()));
    first.add_trace("origin", "line 3");
    first.set_alias(Some("renamed".to_string()));
    first.set_cleanup("DROP TABLE V7");
    assert_eq!(first, second);
}

#[test]
fn test_equality_compares_variant_fields() {
    let a = Operator::limit(10, r());
    let b = Operator::limit(11, r());
    assert_ne!(a, b);
    assert_ne!(r(), s());
    assert_ne!(Operator::union(r(), r()), Operator::union_all(r(), r()));
}

#[test]
fn test_copy_is_independent() {
    let mut original = Operator::project(
        vec![AttributeRef::Unnamed(1), AttributeRef::Unnamed(0)],
        r(),
    );
    original.set_bound(Some("V1".to_string()));
    original.add_trace("k", "v");

    let mut copy = original.copy();
    assert_eq!(copy, original);
    assert_eq!(copy.bound(), None);
    assert_eq!(copy.trace(), original.trace());

    if let OpKind::Project { columns, .. } = copy.kind_mut() {
        columns.push(AttributeRef::Unnamed(0));
    }
    assert_ne!(copy, original);
    match original.kind() {
        OpKind::Project { columns, .. } => assert_eq!(columns.len(), 2),
        other => panic!("expected Project, got {other:?}"),
    }
}

#[test]
fn test_apply_replaces_children_in_place() {
    let mut join = Operator::cross_product(r(), s());
    join.apply(Operator::distinct);
    assert_eq!(
        join,
        Operator::cross_product(Operator::distinct(r()), Operator::distinct(s()))
    );
    assert_eq!(join.children().len(), 2);
}

#[test]
fn test_apply_on_leaf_is_noop() {
    let mut leaf = r();
    let mut calls = 0;
    leaf.apply(|c| {
        calls += 1;
        c
    });
    assert_eq!(calls, 0);
    assert!(leaf.is_leaf());
}

#[test]
fn test_select_scheme_passes_through() {
    let select = Operator::select(
        Expression::binary(BinaryOp::Gt, Expression::attr("a"), Expression::int(3)),
        r(),
    );
    assert_eq!(select.scheme().unwrap(), scheme_ab());
}

#[test]
fn test_join_scheme_concatenates() {
    let join = Operator::join(Expression::eq_attrs(0, 2), r(), s());
    let scheme = join.scheme().unwrap();
    assert_eq!(scheme.len(), 4);
    assert_eq!(scheme.to_string(), "[a:INT, b:STRING, c:INT, d:DOUBLE]");
    assert_eq!(Operator::cross_product(r(), s()).scheme().unwrap(), scheme);
}

#[test]
fn test_project_resolves_columns() {
    let project = Operator::project(
        vec![AttributeRef::named("b"), AttributeRef::Unnamed(0)],
        r(),
    );
    assert_eq!(project.scheme().unwrap().to_string(), "[b:STRING, a:INT]");
}

#[test]
fn test_project_unknown_column_is_schema_error() {
    let project = Operator::project(vec![AttributeRef::named("zzz")], r());
    let err = project.scheme().unwrap_err();
    assert!(err.is_schema_error(), "got {err}");

    let out_of_range = Operator::project(vec![AttributeRef::Unnamed(9)], r());
    assert!(out_of_range.scheme().unwrap_err().is_schema_error());
}

#[test]
fn test_empty_column_list_is_schema_error() {
    let empty = [
        Operator::project(vec![], r()),
        Operator::apply_mappings(vec![], r()),
        Operator::group_by(vec![], r()),
        Operator::projecting_join(Expression::eq_attrs(0, 2), Some(vec![]), r(), s()),
    ];
    for op in empty {
        let err = op.scheme().unwrap_err();
        assert!(err.is_schema_error(), "{}: {err}", op.name());
        assert!(matches!(
            err,
            PlanError::Schema(CoreError::InvalidColumnList { .. })
        ));
    }
}

#[test]
fn test_group_by_names_aggregates_by_original_position() {
    let group = Operator::group_by(
        vec![
            Expression::aggregate(AggregateFunc::Max, Expression::col(0)),
            Expression::attr("b"),
            Expression::count_all(),
        ],
        r(),
    );
    let scheme = group.scheme().unwrap();
    assert_eq!(
        scheme.column_names(),
        vec![Some("b"), Some("MAX0"), Some("COUNTALL2")]
    );
    assert_eq!(scheme.get(1).unwrap().column_type, ColumnType::Int);
    assert_eq!(scheme.get(2).unwrap().column_type, ColumnType::Long);
    assert_eq!(group.short_str(), "GroupBy(b; MAX($0),COUNTALL)");
}

#[test]
fn test_apply_scheme_names() {
    let apply = Operator::apply_mappings(
        vec![
            Mapping::new("total", Expression::binary(BinaryOp::Plus, Expression::col(0), Expression::int(1))),
            Mapping::unnamed(Expression::attr("b")),
            Mapping::unnamed(Expression::int(7)),
        ],
        r(),
    );
    let scheme = apply.scheme().unwrap();
    assert_eq!(
        scheme.column_names(),
        vec![Some("total"), Some("b"), Some("7")]
    );
    assert_eq!(scheme.get(0).unwrap().column_type, ColumnType::Long);
}

#[test]
fn test_projecting_join_selects_positions() {
    let pj = Operator::projecting_join(
        Expression::eq_attrs(0, 2),
        Some(vec![AttributeRef::Unnamed(3), AttributeRef::Unnamed(1)]),
        r(),
        s(),
    );
    assert_eq!(pj.scheme().unwrap().to_string(), "[d:DOUBLE, b:STRING]");
}

#[test]
fn test_nary_join_and_set_operations() {
    let nary = Operator::nary_join(vec![vec![0, 2]], vec![r(), s(), r()]);
    assert_eq!(nary.scheme().unwrap().len(), 6);
    assert_eq!(nary.short_str(), "NaryJoin([$0=$2])");
    assert_eq!(Operator::difference(r(), r()).scheme().unwrap(), scheme_ab());
}

#[test]
fn test_control_flow_operators_have_empty_scheme() {
    let seq = Operator::sequence(vec![Operator::store_temp("x", r())]);
    assert!(seq.scheme().unwrap().is_empty());
    let dw = Operator::do_while(seq.clone(), temp("x"));
    assert!(dw.scheme().unwrap().is_empty());
    assert!(Operator::singleton().scheme().unwrap().is_empty());
}

#[test]
fn test_fixpoint_scheme_before_binding_is_recursion_error() {
    let fixpoint = Operator::fixpoint();
    assert!(matches!(
        fixpoint.scheme(),
        Err(PlanError::Recursion { .. })
    ));
    let state = fixpoint.state_for("R").unwrap();
    assert!(matches!(state.scheme(), Err(PlanError::Recursion { .. })));
}

#[test]
fn test_fixpoint_scheme_after_binding() {
    let mut fixpoint = Operator::fixpoint();
    let state = fixpoint.state_for("R").unwrap();
    fixpoint.loop_body(Operator::distinct(r())).unwrap();
    assert_eq!(fixpoint.scheme().unwrap(), scheme_ab());
    assert_eq!(state.scheme().unwrap(), scheme_ab());
}

#[test]
fn test_state_outliving_fixpoint() {
    let state = Operator::fixpoint().state_for("R").unwrap();
    assert!(matches!(state.scheme(), Err(PlanError::Recursion { .. })));
}

#[test]
fn test_copy_of_fixpoint_binds_independently() {
    let mut original = Operator::fixpoint();
    let state = original.state_for("R").unwrap();

    let mut copy = original.copy();
    copy.loop_body(Operator::distinct(r())).unwrap();
    assert_eq!(copy.scheme().unwrap(), scheme_ab());
    assert!(matches!(original.scheme(), Err(PlanError::Recursion { .. })));
    assert!(matches!(state.scheme(), Err(PlanError::Recursion { .. })));

    original.loop_body(s()).unwrap();
    assert_eq!(state.scheme().unwrap(), scheme_cd());
    assert_eq!(copy.scheme().unwrap(), scheme_ab());
}

#[test]
fn test_copy_relinks_states_within_the_tree() {
    let mut fixpoint = Operator::fixpoint();
    fixpoint.loop_body(Operator::distinct(r())).unwrap();
    let outside = fixpoint.state_for("R").unwrap();
    let plan = Operator::sequence(vec![fixpoint.clone(), fixpoint.state_for("R").unwrap()]);

    let mut copy = plan.copy();
    assert_eq!(copy, plan);
    let OpKind::Sequence { ops } = copy.kind_mut() else {
        panic!("expected Sequence");
    };
    // the copied State starts out with the binding it was copied with
    assert_eq!(ops[1].scheme().unwrap(), scheme_ab());

    ops[0]
        .loop_body(Operator::project(vec![AttributeRef::Unnamed(0)], r()))
        .unwrap();
    let narrowed = Scheme::from(vec![("a", ColumnType::Int)]);
    assert_eq!(ops[1].scheme().unwrap(), narrowed);
    assert_eq!(outside.scheme().unwrap(), scheme_ab());
    assert_eq!(plan.children()[1].scheme().unwrap(), scheme_ab());
}

#[test]
fn test_deserialized_fixpoint_publishes_body_scheme() {
    let json = r#"{"fixpoint": {"body": {"distinct": {"input": {"scan": {
        "relation_key": "R",
        "scheme": [{"name": "a", "type": "int"}, {"name": "b", "type": "string"}]
    }}}}}}"#;
    let fixpoint: Operator = serde_json::from_str(json).unwrap();
    assert_eq!(fixpoint.scheme().unwrap(), scheme_ab());
    let state = fixpoint.state_for("R").unwrap();
    assert_eq!(state.scheme().unwrap(), scheme_ab());
}

#[test]
fn test_deserialized_state_is_detached() {
    let state: Operator = serde_json::from_str(r#"{"state": {"name": "R"}}"#).unwrap();
    assert!(matches!(state.scheme(), Err(PlanError::Recursion { .. })));
}

#[test]
fn test_resolve_attribute() {
    let join = Operator::join(Expression::eq_attrs(0, 2), r(), s());
    assert_eq!(
        join.resolve_attribute(&AttributeRef::named("d")).unwrap(),
        Column::new("d", ColumnType::Double)
    );
    assert_eq!(
        join.resolve_attribute(&AttributeRef::Unnamed(1)).unwrap(),
        Column::new("b", ColumnType::String)
    );
    assert!(join
        .resolve_attribute(&AttributeRef::named("zzz"))
        .unwrap_err()
        .is_schema_error());
}

#[test]
fn test_loop_body_on_non_fixpoint() {
    let mut op = r();
    assert!(matches!(
        op.loop_body(s()),
        Err(PlanError::Unsupported { .. })
    ));
}

#[test]
fn test_equijoin_on_cross_product_becomes_join() {
    let joined = Operator::cross_product(r(), s())
        .add_equijoin_condition(0, 2)
        .unwrap();
    assert_eq!(joined, Operator::join(Expression::eq_attrs(0, 2), r(), s()));
}

#[test]
fn test_equijoin_on_join_conjoins() {
    let cond = Expression::binary(BinaryOp::Gt, Expression::col(0), Expression::int(1));
    let mut join = Operator::join(cond.clone(), r(), s());
    join.add_trace("kept", "yes");
    let joined = join.add_equijoin_condition(3, 1).unwrap();
    assert_eq!(
        joined,
        Operator::join(Expression::and(cond, Expression::eq_attrs(3, 1)), r(), s())
    );
    assert_eq!(joined.trace().len(), 1);
}

#[test]
fn test_equijoin_same_side_rejected() {
    let err = Operator::cross_product(r(), s())
        .add_equijoin_condition(0, 1)
        .unwrap_err();
    assert!(matches!(
        err,
        PlanError::EquijoinColumns {
            left_len: 2,
            total: 4,
            ..
        }
    ));
    assert!(Operator::cross_product(r(), s())
        .add_equijoin_condition(0, 4)
        .is_err());
}

#[test]
fn test_equijoin_unsupported_variants() {
    let pj = Operator::projecting_join(Expression::eq_attrs(0, 2), None, r(), s());
    assert!(matches!(
        pj.add_equijoin_condition(1, 3),
        Err(PlanError::Unsupported { .. })
    ));
    assert!(matches!(
        Operator::union(r(), r()).add_equijoin_condition(0, 2),
        Err(PlanError::Unsupported { .. })
    ));
}

#[test]
fn test_display_renders_tree() {
    let plan = Operator::store_temp(
        "y",
        Operator::join(Expression::eq_attrs(0, 2), Operator::distinct(r()), s()),
    );
    assert_eq!(
        plan.to_string(),
        "StoreTemp(y)[Join(($0 = $2))[Distinct[Scan(public:adhoc:R)], Scan(public:adhoc:S)]]"
    );
    assert_eq!(Operator::collect(Some(0), r()).short_str(), "Collect(@0)");
    assert_eq!(
        temp("x").short_str(),
        "ScanTemp(x,[a:INT, b:STRING])"
    );
}

#[test]
fn test_traversal_orders() {
    let plan = Operator::cross_product(Operator::distinct(r()), s());
    let post: Vec<&str> = plan.postorder(|op| Some(op.name())).collect();
    assert_eq!(post, vec!["Scan", "Distinct", "Scan", "CrossProduct"]);
    let pre: Vec<&str> = plan.preorder(|op| Some(op.name())).collect();
    assert_eq!(pre, vec!["CrossProduct", "Distinct", "Scan", "Scan"]);

    // restartable
    assert_eq!(plan.postorder(|op| Some(op.name())).count(), 4);
    // f may yield nothing for a node
    let leaves: Vec<String> = plan
        .postorder(|op| op.is_leaf().then(|| op.short_str()))
        .collect();
    assert_eq!(leaves, vec!["Scan(public:adhoc:R)", "Scan(public:adhoc:S)"]);
    // or several
    let edges: Vec<(&str, &str)> = plan
        .preorder(|op| {
            op.children()
                .into_iter()
                .map(|child| (op.name(), child.name()))
                .collect::<Vec<_>>()
        })
        .collect();
    assert_eq!(
        edges,
        vec![
            ("CrossProduct", "Distinct"),
            ("CrossProduct", "Scan"),
            ("Distinct", "Scan")
        ]
    );
}

#[test]
fn test_referenced_temps_and_substitution() {
    let mut plan = Operator::union(
        Operator::distinct(temp("x")),
        Operator::cross_product(temp("x"), temp("y")),
    );
    let temps: Vec<String> = plan.referenced_temps().into_iter().collect();
    assert_eq!(temps, vec!["x", "y"]);

    let replaced = plan.substitute_temp("x", &r());
    assert_eq!(replaced, 2);
    assert_eq!(
        plan,
        Operator::union(
            Operator::distinct(r()),
            Operator::cross_product(r(), temp("y")),
        )
    );
    assert_eq!(plan.substitute_temp("x", &r()), 0);
}

#[test]
fn test_collect_graph() {
    let plan = Operator::cross_product(Operator::distinct(r()), s());
    let graph = plan.collect_graph();
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 3);
    let edges: Vec<(&str, &str)> = graph
        .edges()
        .into_iter()
        .map(|(child, parent)| (child.name(), parent.name()))
        .collect();
    assert!(edges.contains(&("Distinct", "CrossProduct")));
    assert!(edges.contains(&("Scan", "Distinct")));

    let dot = graph.to_dot();
    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("CrossProduct"));
}

#[test]
fn test_operator_from_yaml() {
    let yaml = r#"
select:
  condition:
    binary:
      op: gt
      left:
        attr: a
      right:
        literal: 3
  input:
    scan:
      relation_key: "public:adhoc:R"
      scheme:
        - name: a
          type: int
        - name: b
          type: string
"#;
    let op: Operator = from_yaml_str(yaml).unwrap();
    assert_eq!(op.name(), "Select");
    assert_eq!(op.scheme().unwrap(), scheme_ab());
    assert_eq!(op.to_string(), "Select((a > 3))[Scan(public:adhoc:R)]");
}
