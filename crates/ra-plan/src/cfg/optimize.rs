//! Dead-code elimination and chaining over the CFG

use super::graph::{Cfg, CfgNodeId};
use crate::error::PlanResult;

impl Cfg {
    /// Delete statements whose definition is never read afterwards.
    ///
    /// Liveness is recomputed after every deletion. Statements without a
    /// definition (stores, loop conditions) are always kept. Returns the
    /// number of nodes removed.
    pub fn dead_code_elimination(&mut self) -> PlanResult<usize> {
        let mut removed = 0;
        while let Some(id) = self.find_dead_node() {
            log::debug!("Removing dead node {id}");
            self.delete_node(id)?;
            removed += 1;
        }
        if removed > 0 {
            log::info!("Dead-code elimination removed {removed} statements");
        }
        Ok(removed)
    }

    fn find_dead_node(&self) -> Option<CfgNodeId> {
        let liveness = self.compute_liveness();
        self.nodes().find_map(|(id, node)| {
            let def = node.def.as_ref()?;
            (!liveness.live_out(id).contains(def)).then_some(id)
        })
    }

    /// Fuse adjacent statements `A; B` where B is the only reader of A's
    /// result.
    ///
    /// A pair is fused when, in id order, A defines `v`, B uses `v`, `v` is
    /// dead after B, B is not a loop header and A is not a loop terminator.
    /// B then reads A's plan directly and A is deleted. Returns the number
    /// of fusions.
    pub fn apply_chaining(&mut self) -> PlanResult<usize> {
        let mut fused = 0;
        while let Some((a, b, var)) = self.find_chainable_pair() {
            log::debug!("Chaining node {a} into {b} through '{var}'");
            self.inline_node(a, b, &var)?;
            fused += 1;
        }
        if fused > 0 {
            log::info!("Chaining fused {fused} statements");
        }
        Ok(fused)
    }

    fn find_chainable_pair(&self) -> Option<(CfgNodeId, CfgNodeId, String)> {
        let liveness = self.compute_liveness();
        let ids = self.node_ids();
        ids.windows(2).find_map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            if self.is_loop_header(b) || self.is_loop_terminator(a) {
                return None;
            }
            let var = self.node(a)?.def.as_ref()?;
            let reader = self.node(b)?;
            let fusable = reader.uses.contains(var) && !liveness.live_out(b).contains(var);
            fusable.then(|| (a, b, var.clone()))
        })
    }
}

#[cfg(test)]
#[path = "optimize_test.rs"]
mod tests;
