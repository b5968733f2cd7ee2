//! Statement programs and their lowering to a CFG

use crate::algebra::Operator;
use crate::cfg::Cfg;
use crate::error::{PlanError, PlanResult};
use ra_core::serde_helpers;
use ra_core::{PlannerConfig, RelationKey, Scheme};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One statement of a program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Statement {
    /// `target = plan`
    Assign { target: String, plan: Operator },
    /// `store(plan, relation_key)`
    Store {
        relation_key: RelationKey,
        plan: Operator,
    },
    /// `do { body } while condition`
    DoWhile {
        body: Vec<Statement>,
        condition: Operator,
    },
}

/// A parsed statement program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Parse YAML; variants are written as single-key maps (`- assign: {..}`)
    pub fn from_yaml(content: &str) -> PlanResult<Self> {
        Ok(serde_helpers::from_yaml_str(content)?)
    }

    pub fn to_yaml(&self) -> PlanResult<String> {
        Ok(serde_helpers::to_yaml_string(self)?)
    }

    pub fn from_json(content: &str) -> PlanResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Lower the statements to a CFG.
    ///
    /// `ScanTemp` nodes without a scheme take the scheme of the most recent
    /// assignment to that temp; every statement's scheme is checked.
    pub fn to_cfg(&self) -> PlanResult<Cfg> {
        let mut lowering = Lowering::default();
        lowering.block(&self.statements)?;
        Ok(lowering.cfg)
    }

    /// Lower, optimize per `config` and structure into a single plan
    pub fn compile(&self, config: &PlannerConfig) -> PlanResult<Operator> {
        self.to_cfg()?.get_logical_plan(config)
    }
}

#[derive(Default)]
struct Lowering {
    cfg: Cfg,
    temps: HashMap<String, Scheme>,
}

impl Lowering {
    fn block(&mut self, statements: &[Statement]) -> PlanResult<()> {
        statements.iter().try_for_each(|s| self.statement(s))
    }

    fn statement(&mut self, statement: &Statement) -> PlanResult<()> {
        match statement {
            Statement::Assign { target, plan } => {
                let (plan, scheme) = self.prepare(plan)?;
                let uses = plan.referenced_temps();
                self.temps.insert(target.clone(), scheme);
                self.cfg.add_op(
                    Operator::store_temp(target.clone(), plan),
                    Some(target.clone()),
                    uses,
                );
            }
            Statement::Store { relation_key, plan } => {
                let (plan, _) = self.prepare(plan)?;
                let uses = plan.referenced_temps();
                self.cfg
                    .add_op(Operator::store(relation_key.clone(), plan), None, uses);
            }
            Statement::DoWhile { body, condition } => {
                if body.is_empty() {
                    return Err(PlanError::Program {
                        message: "do/while body is empty".to_string(),
                    });
                }
                let header = self.cfg.next_op_id();
                self.block(body)?;
                let (condition, _) = self.prepare(condition)?;
                let uses = condition.referenced_temps();
                let terminator = self.cfg.add_op(condition, None, uses);
                self.cfg.add_edge(terminator, header)?;
            }
        }
        Ok(())
    }

    fn prepare(&self, plan: &Operator) -> PlanResult<(Operator, Scheme)> {
        let mut plan = plan.clone();
        plan.bind_temp_schemes(&self.temps)?;
        let scheme = plan.scheme()?;
        Ok((plan, scheme))
    }
}

#[cfg(test)]
#[path = "program_test.rs"]
mod tests;
