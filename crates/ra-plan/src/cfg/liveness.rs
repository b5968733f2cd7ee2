//! Live-variable analysis

use super::graph::{Cfg, CfgNodeId};
use std::collections::{BTreeMap, BTreeSet};

/// Live-in and live-out sets per CFG node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Liveness {
    live_in: BTreeMap<CfgNodeId, BTreeSet<String>>,
    live_out: BTreeMap<CfgNodeId, BTreeSet<String>>,
}

impl Liveness {
    /// Solve the backward dataflow equations
    ///
    /// ```text
    /// live_out[n] = ∪ live_in[s]  for s in succ(n)
    /// live_in[n]  = uses[n] ∪ (live_out[n] - {def[n]})
    /// ```
    ///
    /// starting from `live_in[n] = uses[n]`, `live_out[n] = ∅` and iterating
    /// to the least fixed point.
    pub fn compute(cfg: &Cfg) -> Self {
        let ids = cfg.node_ids();
        let mut live_in: BTreeMap<CfgNodeId, BTreeSet<String>> = cfg
            .nodes()
            .map(|(id, node)| (id, node.uses.clone()))
            .collect();
        let mut live_out: BTreeMap<CfgNodeId, BTreeSet<String>> =
            ids.iter().map(|&id| (id, BTreeSet::new())).collect();

        let mut iterations = 0;
        loop {
            iterations += 1;
            let mut changed = false;
            // Reverse id order converges fastest for a backward problem
            for &id in ids.iter().rev() {
                let Some(node) = cfg.node(id) else {
                    continue;
                };
                let out: BTreeSet<String> = cfg
                    .successors(id)
                    .iter()
                    .filter_map(|s| live_in.get(s))
                    .flatten()
                    .cloned()
                    .collect();
                let mut inn = node.uses.clone();
                inn.extend(
                    out.iter()
                        .filter(|v| node.def.as_deref() != Some(v.as_str()))
                        .cloned(),
                );

                if live_out.get(&id) != Some(&out) {
                    live_out.insert(id, out);
                    changed = true;
                }
                if live_in.get(&id) != Some(&inn) {
                    live_in.insert(id, inn);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        log::debug!("Liveness converged after {iterations} iterations");

        Self { live_in, live_out }
    }

    /// Variables live on entry to `id`
    pub fn live_in(&self, id: CfgNodeId) -> &BTreeSet<String> {
        self.live_in.get(&id).unwrap_or(empty())
    }

    /// Variables live on exit from `id`
    pub fn live_out(&self, id: CfgNodeId) -> &BTreeSet<String> {
        self.live_out.get(&id).unwrap_or(empty())
    }
}

fn empty() -> &'static BTreeSet<String> {
    static EMPTY: BTreeSet<String> = BTreeSet::new();
    &EMPTY
}

impl Cfg {
    pub fn compute_liveness(&self) -> Liveness {
        Liveness::compute(self)
    }
}

#[cfg(test)]
#[path = "liveness_test.rs"]
mod tests;
