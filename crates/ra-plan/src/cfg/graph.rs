//! Control-flow graph of program statements

use crate::algebra::{OpKind, Operator};
use crate::error::{PlanError, PlanResult};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet};

/// Node id; ids are dense and increasing in statement order
pub type CfgNodeId = usize;

/// One statement of the program
#[derive(Debug, Clone, PartialEq)]
pub struct CfgNode {
    /// Operator tree for the statement
    pub op: Operator,
    /// Variable written, if any
    pub def: Option<String>,
    /// Variables read
    pub uses: BTreeSet<String>,
}

/// Statements connected by control flow.
///
/// Built linearly with [`Cfg::add_op`], which links each node to its
/// predecessor; loops add explicit back edges with [`Cfg::add_edge`].
/// Program entry and exit count as one extra incoming edge on the first
/// node and one extra outgoing edge on the last node.
#[derive(Debug, Clone, Default)]
pub struct Cfg {
    graph: DiGraphMap<CfgNodeId, ()>,
    nodes: BTreeMap<CfgNodeId, CfgNode>,
    next_op_id: CfgNodeId,
}

impl Cfg {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement after the current last node.
    ///
    /// Returns the new node's id.
    pub fn add_op(
        &mut self,
        op: Operator,
        def: Option<String>,
        uses: BTreeSet<String>,
    ) -> CfgNodeId {
        let id = self.next_op_id;
        self.next_op_id += 1;

        let previous = self.last_id();
        self.graph.add_node(id);
        if let Some(previous) = previous {
            self.graph.add_edge(previous, id, ());
        }
        log::debug!(
            "CFG node {id}: {} def={} uses={:?}",
            op.short_str(),
            def.as_deref().unwrap_or("-"),
            uses
        );
        self.nodes.insert(id, CfgNode { op, def, uses });
        id
    }

    /// Add a control-flow edge (loop back edges, exits)
    pub fn add_edge(&mut self, source: CfgNodeId, dest: CfgNodeId) -> PlanResult<()> {
        self.require(source)?;
        self.require(dest)?;
        self.graph.add_edge(source, dest, ());
        Ok(())
    }

    /// Id the next [`Cfg::add_op`] will assign
    pub fn next_op_id(&self) -> CfgNodeId {
        self.next_op_id
    }

    pub fn node(&self, id: CfgNodeId) -> Option<&CfgNode> {
        self.nodes.get(&id)
    }

    /// Node ids in ascending order
    pub fn node_ids(&self) -> Vec<CfgNodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (CfgNodeId, &CfgNode)> {
        self.nodes.iter().map(|(&id, node)| (id, node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first_id(&self) -> Option<CfgNodeId> {
        self.nodes.keys().next().copied()
    }

    pub fn last_id(&self) -> Option<CfgNodeId> {
        self.nodes.keys().next_back().copied()
    }

    /// Sorted successor ids
    pub fn successors(&self, id: CfgNodeId) -> Vec<CfgNodeId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Sorted predecessor ids
    pub fn predecessors(&self, id: CfgNodeId) -> Vec<CfgNodeId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Edges as `(source, dest)`, sorted
    pub fn edges(&self) -> Vec<(CfgNodeId, CfgNodeId)> {
        let mut edges: Vec<_> = self.graph.all_edges().map(|(s, d, _)| (s, d)).collect();
        edges.sort_unstable();
        edges
    }

    /// Incoming edges, counting program entry for the first node
    pub fn in_degree(&self, id: CfgNodeId) -> usize {
        let entry = usize::from(self.first_id() == Some(id));
        self.predecessors(id).len() + entry
    }

    /// Outgoing edges, counting program exit for the last node
    pub fn out_degree(&self, id: CfgNodeId) -> usize {
        let exit = usize::from(self.last_id() == Some(id));
        self.successors(id).len() + exit
    }

    /// First node of at least one do/while body (in-degree 2 or more)
    pub fn is_loop_header(&self, id: CfgNodeId) -> bool {
        self.loops_opened(id) > 0
    }

    /// Condition node of at least one do/while (out-degree 2 or more)
    pub fn is_loop_terminator(&self, id: CfgNodeId) -> bool {
        self.loops_closed(id) > 0
    }

    /// Number of do/while bodies starting at `id`: one per incoming edge
    /// beyond the first
    pub fn loops_opened(&self, id: CfgNodeId) -> usize {
        self.in_degree(id).saturating_sub(1)
    }

    /// Number of do/while loops ending at `id`: one per outgoing edge
    /// beyond the first
    pub fn loops_closed(&self, id: CfgNodeId) -> usize {
        self.out_degree(id).saturating_sub(1)
    }

    fn neighbors(&self, id: CfgNodeId, direction: Direction) -> Vec<CfgNodeId> {
        if !self.graph.contains_node(id) {
            return Vec::new();
        }
        let mut ids: Vec<_> = self.graph.neighbors_directed(id, direction).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    fn require(&self, id: CfgNodeId) -> PlanResult<()> {
        if self.nodes.contains_key(&id) {
            Ok(())
        } else {
            Err(PlanError::UnknownCfgNode { id })
        }
    }

    /// Remove a node, rerouting each predecessor to the next node in id
    /// order.
    pub(crate) fn delete_node(&mut self, id: CfgNodeId) -> PlanResult<CfgNode> {
        self.require(id)?;
        let successor = self.nodes.range(id + 1..).next().map(|(&next, _)| next);
        let predecessors = self.predecessors(id);

        if let Some(successor) = successor {
            for pred in predecessors.into_iter().filter(|&p| p != id) {
                self.graph.add_edge(pred, successor, ());
            }
        }
        self.graph.remove_node(id);
        self.nodes
            .remove(&id)
            .ok_or(PlanError::UnknownCfgNode { id })
    }

    /// Fuse node `source` into `dest`: every `ScanTemp(var)` in `dest` is
    /// replaced by the plan `source` stores into `var`, then `source` is
    /// deleted.
    pub(crate) fn inline_node(
        &mut self,
        source: CfgNodeId,
        dest: CfgNodeId,
        var: &str,
    ) -> PlanResult<()> {
        self.require(dest)?;
        let inner = {
            let node = self
                .nodes
                .get(&source)
                .ok_or(PlanError::UnknownCfgNode { id: source })?;
            match node.op.kind() {
                OpKind::StoreTemp { name, input } if name == var => input.as_ref().clone(),
                _ => node.op.clone(),
            }
        };
        let source_uses = self
            .nodes
            .get(&source)
            .map(|node| node.uses.clone())
            .unwrap_or_default();

        let target = self
            .nodes
            .get_mut(&dest)
            .ok_or(PlanError::UnknownCfgNode { id: dest })?;
        let replaced = target.op.substitute_temp(var, &inner);
        if replaced == 0 {
            return Err(PlanError::InconsistentUses {
                node: dest,
                var: var.to_string(),
            });
        }
        target.uses.remove(var);
        target.uses.extend(source_uses);
        log::debug!("Inlined node {source} into {dest} ({replaced} reads of '{var}')");

        self.delete_node(source)?;
        Ok(())
    }
}

impl std::fmt::Display for Cfg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (id, node) in &self.nodes {
            let uses: Vec<&str> = node.uses.iter().map(String::as_str).collect();
            writeln!(
                f,
                "{id}: uses=[{}] def={} op={}",
                uses.join(","),
                node.def.as_deref().unwrap_or("-"),
                node.op
            )?;
        }
        let edges: Vec<String> = self
            .edges()
            .into_iter()
            .map(|(s, d)| format!("{s}=>{d}"))
            .collect();
        write!(f, "{}", edges.join("; "))
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
