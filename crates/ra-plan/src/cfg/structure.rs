//! Rebuild Sequence/DoWhile structure from the CFG

use super::graph::Cfg;
use crate::algebra::Operator;
use crate::error::{PlanError, PlanResult};
use ra_core::PlannerConfig;

/// Open block while walking the CFG in id order
enum Block {
    Sequence(Vec<Operator>),
    DoWhile(Vec<Operator>),
}

impl Block {
    fn ops_mut(&mut self) -> &mut Vec<Operator> {
        match self {
            Block::Sequence(ops) | Block::DoWhile(ops) => ops,
        }
    }
}

impl Cfg {
    /// Run the enabled optimizations, then structure the result
    pub fn get_logical_plan(&mut self, config: &PlannerConfig) -> PlanResult<Operator> {
        if config.dead_code_elimination {
            self.dead_code_elimination()?;
        }
        if config.chaining {
            self.apply_chaining()?;
        }
        self.structure()
    }

    /// Turn the CFG into `Sequence`/`DoWhile` nesting.
    ///
    /// Each incoming edge of a node beyond the first opens a `DoWhile`
    /// (nested bodies that start at the same node share a header). Each
    /// outgoing edge beyond the first closes the innermost open loop. The
    /// node's operator becomes the condition of every loop it closes.
    /// Any other node is appended to the innermost open block.
    pub fn structure(&self) -> PlanResult<Operator> {
        let mut stack = vec![Block::Sequence(Vec::new())];

        for (id, node) in self.nodes() {
            for _ in 0..self.loops_opened(id) {
                log::info!("Introducing loop at node {id}");
                stack.push(Block::DoWhile(Vec::new()));
            }

            let closes = self.loops_closed(id);
            if closes == 0 {
                log::debug!("Appending node {id} to current block");
                if let Some(block) = stack.last_mut() {
                    block.ops_mut().push(node.op.clone());
                }
                continue;
            }

            for _ in 0..closes {
                log::info!("Terminating loop at node {id}");
                let body = match stack.pop() {
                    Some(Block::DoWhile(ops)) => ops,
                    _ => {
                        return Err(PlanError::UnbalancedLoops {
                            message: format!("node {id} ends a loop that was never opened"),
                        })
                    }
                };
                let do_while = Operator::do_while(Operator::sequence(body), node.op.clone());
                stack
                    .last_mut()
                    .ok_or_else(|| PlanError::UnbalancedLoops {
                        message: format!("node {id} closes the outermost block"),
                    })?
                    .ops_mut()
                    .push(do_while);
            }
        }

        let open = stack.len().saturating_sub(1);
        match stack.pop() {
            Some(Block::Sequence(ops)) if open == 0 => Ok(Operator::sequence(ops)),
            _ => Err(PlanError::UnbalancedLoops {
                message: format!("{open} loop(s) left open at end of program"),
            }),
        }
    }
}

#[cfg(test)]
#[path = "structure_test.rs"]
mod tests;
