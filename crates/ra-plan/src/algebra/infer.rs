//! Scheme inference

use super::operator::{OpKind, Operator};
use crate::error::{PlanError, PlanResult};
use ra_core::{AttributeRef, Column, CoreError, Scheme};

impl Operator {
    /// Output scheme, derived bottom-up from the children.
    ///
    /// Fails with [`PlanError::Schema`] on an unresolvable column reference
    /// or ill-typed expression, and with [`PlanError::Recursion`] when a
    /// `Fixpoint`/`State` is read before its body is bound.
    pub fn scheme(&self) -> PlanResult<Scheme> {
        match self.kind() {
            OpKind::Scan { scheme, .. }
            | OpKind::ScanTemp { scheme, .. }
            | OpKind::EmptyRelation { scheme } => Ok(scheme.clone()),
            OpKind::SingletonRelation => Ok(Scheme::empty()),
            OpKind::State { name, fixpoint } => fixpoint.scheme(name),

            OpKind::Select { input, .. }
            | OpKind::Distinct { input }
            | OpKind::Limit { input, .. }
            | OpKind::Shuffle { input, .. }
            | OpKind::Collect { input, .. }
            | OpKind::Broadcast { input }
            | OpKind::PartitionBy { input, .. }
            | OpKind::Store { input, .. }
            | OpKind::StoreTemp { input, .. } => input.scheme(),

            OpKind::Project { columns, input } => {
                require_columns("Project", columns.len())?;
                let input_scheme = input.scheme()?;
                project_columns(&input_scheme, columns)
            }
            OpKind::Apply { mappings, input } => {
                require_columns("Apply", mappings.len())?;
                let input_scheme = input.scheme()?;
                mappings
                    .iter()
                    .map(|mapping| -> PlanResult<Column> {
                        let column_type = mapping.expr.type_of(&input_scheme)?;
                        Ok(Column::new(mapping.output_name(&input_scheme), column_type))
                    })
                    .collect()
            }
            OpKind::GroupBy { columns, input } => {
                require_columns("GroupBy", columns.len())?;
                let input_scheme = input.scheme()?;
                columns
                    .output_order()
                    .map(|(index, expr)| -> PlanResult<Column> {
                        if let Some(attr) = expr.as_attribute() {
                            return Ok(input_scheme.resolve(attr)?.clone());
                        }
                        // Non-attribute outputs are named after their kind and
                        // their position in the original column list
                        let column_type = expr.type_of(&input_scheme)?;
                        Ok(Column::new(
                            format!("{}{}", expr.kind_name(), index),
                            column_type,
                        ))
                    })
                    .collect()
            }
            OpKind::Fixpoint { body, .. } => match body {
                Some(body) => body.scheme(),
                None => Err(PlanError::Recursion {
                    message: "Fixpoint scheme requested before its body was bound".to_string(),
                }),
            },

            OpKind::Join { left, right, .. } | OpKind::CrossProduct { left, right } => {
                Ok(left.scheme()? + right.scheme()?)
            }
            OpKind::ProjectingJoin {
                columns,
                left,
                right,
                ..
            } => {
                let combined = left.scheme()? + right.scheme()?;
                match columns {
                    Some(columns) => {
                        require_columns("ProjectingJoin", columns.len())?;
                        project_columns(&combined, columns)
                    }
                    None => Ok(combined),
                }
            }
            OpKind::Union { left, .. }
            | OpKind::UnionAll { left, .. }
            | OpKind::Intersection { left, .. }
            | OpKind::Difference { left, .. } => left.scheme(),

            OpKind::NaryJoin { inputs, .. } => inputs
                .iter()
                .try_fold(Scheme::empty(), |acc, input| -> PlanResult<Scheme> {
                    Ok(acc + input.scheme()?)
                }),

            OpKind::DoWhile { .. } | OpKind::Sequence { .. } => Ok(Scheme::empty()),
        }
    }

    /// Resolve a column reference against this operator's scheme
    pub fn resolve_attribute(&self, attr: &AttributeRef) -> PlanResult<Column> {
        let scheme = self.scheme()?;
        Ok(scheme.resolve(attr)?.clone())
    }
}

fn require_columns(operator: &str, len: usize) -> PlanResult<()> {
    if len == 0 {
        return Err(CoreError::InvalidColumnList {
            message: format!("{operator} needs at least one output column"),
        }
        .into());
    }
    Ok(())
}

fn project_columns(input: &Scheme, columns: &[AttributeRef]) -> PlanResult<Scheme> {
    columns
        .iter()
        .map(|attr| -> PlanResult<Column> { Ok(input.resolve(attr)?.clone()) })
        .collect()
}
