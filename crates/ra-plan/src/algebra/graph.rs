//! Plan graphs for visualisation

use super::operator::Operator;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Operator tree flattened into a graph with edges child -> parent.
///
/// Nodes are deduplicated by identity, so a subtree reached twice through
/// the same reference appears once.
#[derive(Debug)]
pub struct PlanGraph<'a> {
    graph: DiGraph<&'a Operator, ()>,
}

impl<'a> PlanGraph<'a> {
    fn build(root: &'a Operator) -> Self {
        let mut graph = DiGraph::new();
        let mut seen: HashMap<*const Operator, NodeIndex> = HashMap::new();
        let mut stack: Vec<(&'a Operator, Option<NodeIndex>)> = vec![(root, None)];

        while let Some((op, parent)) = stack.pop() {
            let key = op as *const Operator;
            let (idx, fresh) = match seen.get(&key) {
                Some(&idx) => (idx, false),
                None => {
                    let idx = graph.add_node(op);
                    seen.insert(key, idx);
                    (idx, true)
                }
            };
            if let Some(parent) = parent {
                graph.update_edge(idx, parent, ());
            }
            if fresh {
                for child in op.children().into_iter().rev() {
                    stack.push((child, Some(idx)));
                }
            }
        }
        Self { graph }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in discovery (preorder) order
    pub fn nodes(&self) -> impl Iterator<Item = &'a Operator> + '_ {
        self.graph.node_weights().copied()
    }

    /// Edges as `(child, parent)` pairs
    pub fn edges(&self) -> Vec<(&'a Operator, &'a Operator)> {
        self.graph
            .raw_edges()
            .iter()
            .map(|edge| (self.graph[edge.source()], self.graph[edge.target()]))
            .collect()
    }

    /// Graphviz rendering labelled with each node's short string
    pub fn to_dot(&self) -> String {
        let labelled = self.graph.map(|_, op| op.short_str(), |_, _| "");
        format!("{}", Dot::with_config(&labelled, &[Config::EdgeNoLabel]))
    }
}

impl Operator {
    pub fn collect_graph(&self) -> PlanGraph<'_> {
        PlanGraph::build(self)
    }
}
