//! Logical operators: the nodes of a plan tree

use super::columns::{GroupColumns, Mapping};
use super::recursion::{RecursionSlot, StateHandle};
use ra_core::{AttributeRef, Expression, RelationKey, Scheme};
use serde::{Deserialize, Serialize};

/// Compilation bookkeeping attached to every operator.
///
/// None of these fields take part in structural equality.
#[derive(Debug, Clone, Default)]
pub struct OpMeta {
    /// Name passes use to track the node under renaming; `None` means the
    /// node is its own alias
    alias: Option<String>,
    /// Result symbol assigned by a backend
    bound: Option<String>,
    /// Backend cleanup code
    cleanup: String,
    /// Ordered compilation annotations
    trace: Vec<(String, String)>,
}

/// Operator variants.
///
/// Children are owned: unary operators hold `input`, binary operators
/// `left`/`right`, n-ary operators a vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    // ---- leaves ----
    /// Scan of a stored relation
    Scan {
        relation_key: RelationKey,
        scheme: Scheme,
    },
    /// Scan of a temporary produced earlier in the program
    ScanTemp {
        name: String,
        #[serde(default)]
        scheme: Scheme,
    },
    /// Relation with no rows
    EmptyRelation {
        #[serde(default)]
        scheme: Scheme,
    },
    /// One row, no columns
    SingletonRelation,
    /// Current value of the relation a `Fixpoint` iterates on
    State {
        name: String,
        #[serde(skip)]
        fixpoint: StateHandle,
    },

    // ---- unary ----
    Select {
        condition: Expression,
        input: Box<Operator>,
    },
    Project {
        columns: Vec<AttributeRef>,
        input: Box<Operator>,
    },
    Apply {
        mappings: Vec<Mapping>,
        input: Box<Operator>,
    },
    GroupBy {
        columns: GroupColumns,
        input: Box<Operator>,
    },
    Distinct {
        input: Box<Operator>,
    },
    Limit {
        count: u64,
        input: Box<Operator>,
    },
    Shuffle {
        columns: Vec<AttributeRef>,
        input: Box<Operator>,
    },
    Collect {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        server: Option<u32>,
        input: Box<Operator>,
    },
    Broadcast {
        input: Box<Operator>,
    },
    PartitionBy {
        columns: Vec<AttributeRef>,
        input: Box<Operator>,
    },
    Store {
        relation_key: RelationKey,
        input: Box<Operator>,
    },
    StoreTemp {
        name: String,
        input: Box<Operator>,
    },
    /// Recursive computation; `body` is bound after construction
    Fixpoint {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<Box<Operator>>,
        #[serde(skip)]
        slot: RecursionSlot,
    },

    // ---- binary ----
    Join {
        condition: Expression,
        left: Box<Operator>,
        right: Box<Operator>,
    },
    CrossProduct {
        left: Box<Operator>,
        right: Box<Operator>,
    },
    /// Join followed by a projection over the concatenated scheme
    ProjectingJoin {
        condition: Expression,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        columns: Option<Vec<AttributeRef>>,
        left: Box<Operator>,
        right: Box<Operator>,
    },
    Union {
        left: Box<Operator>,
        right: Box<Operator>,
    },
    UnionAll {
        left: Box<Operator>,
        right: Box<Operator>,
    },
    Intersection {
        left: Box<Operator>,
        right: Box<Operator>,
    },
    Difference {
        left: Box<Operator>,
        right: Box<Operator>,
    },
    /// Run `body`, then repeat while `condition` is non-empty
    DoWhile {
        body: Box<Operator>,
        condition: Box<Operator>,
    },

    // ---- n-ary ----
    /// Multiway equijoin; each condition lists global column positions that
    /// must be equal
    NaryJoin {
        conditions: Vec<Vec<usize>>,
        inputs: Vec<Operator>,
    },
    /// Ordered list of statements
    Sequence {
        ops: Vec<Operator>,
    },
}

/// A node in a logical plan.
///
/// Equality is structural over [`OpKind`] only; alias, bound symbol, cleanup
/// code and trace are ignored.
///
/// Serialized as its [`OpKind`] alone. A deserialized `Fixpoint` publishes
/// its body scheme; `State` operators come back detached, as the binding
/// to their fixpoint is not part of the serialized form.
#[derive(Debug, Clone)]
pub struct Operator {
    kind: OpKind,
    meta: OpMeta,
}

impl Serialize for Operator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.kind.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let op = Operator::new(OpKind::deserialize(deserializer)?);
        op.publish_fixpoint_scheme();
        Ok(op)
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<OpKind> for Operator {
    fn from(kind: OpKind) -> Self {
        Self::new(kind)
    }
}

impl Operator {
    pub fn new(kind: OpKind) -> Self {
        Self {
            kind,
            meta: OpMeta::default(),
        }
    }

    // ---- constructors ----

    pub fn scan(relation_key: RelationKey, scheme: Scheme) -> Self {
        Self::new(OpKind::Scan {
            relation_key,
            scheme,
        })
    }

    pub fn scan_temp(name: impl Into<String>, scheme: Scheme) -> Self {
        Self::new(OpKind::ScanTemp {
            name: name.into(),
            scheme,
        })
    }

    pub fn empty_relation(scheme: Scheme) -> Self {
        Self::new(OpKind::EmptyRelation { scheme })
    }

    pub fn singleton() -> Self {
        Self::new(OpKind::SingletonRelation)
    }

    pub fn select(condition: Expression, input: Operator) -> Self {
        Self::new(OpKind::Select {
            condition,
            input: Box::new(input),
        })
    }

    pub fn project(columns: Vec<AttributeRef>, input: Operator) -> Self {
        Self::new(OpKind::Project {
            columns,
            input: Box::new(input),
        })
    }

    pub fn apply_mappings(mappings: Vec<Mapping>, input: Operator) -> Self {
        Self::new(OpKind::Apply {
            mappings,
            input: Box::new(input),
        })
    }

    pub fn group_by(columns: Vec<Expression>, input: Operator) -> Self {
        Self::new(OpKind::GroupBy {
            columns: GroupColumns::new(columns),
            input: Box::new(input),
        })
    }

    pub fn distinct(input: Operator) -> Self {
        Self::new(OpKind::Distinct {
            input: Box::new(input),
        })
    }

    pub fn limit(count: u64, input: Operator) -> Self {
        Self::new(OpKind::Limit {
            count,
            input: Box::new(input),
        })
    }

    pub fn shuffle(columns: Vec<AttributeRef>, input: Operator) -> Self {
        Self::new(OpKind::Shuffle {
            columns,
            input: Box::new(input),
        })
    }

    pub fn collect(server: Option<u32>, input: Operator) -> Self {
        Self::new(OpKind::Collect {
            server,
            input: Box::new(input),
        })
    }

    pub fn broadcast(input: Operator) -> Self {
        Self::new(OpKind::Broadcast {
            input: Box::new(input),
        })
    }

    pub fn partition_by(columns: Vec<AttributeRef>, input: Operator) -> Self {
        Self::new(OpKind::PartitionBy {
            columns,
            input: Box::new(input),
        })
    }

    pub fn store(relation_key: RelationKey, input: Operator) -> Self {
        Self::new(OpKind::Store {
            relation_key,
            input: Box::new(input),
        })
    }

    pub fn store_temp(name: impl Into<String>, input: Operator) -> Self {
        Self::new(OpKind::StoreTemp {
            name: name.into(),
            input: Box::new(input),
        })
    }

    /// Fixpoint with no body; bind one with [`Operator::loop_body`]
    pub fn fixpoint() -> Self {
        Self::new(OpKind::Fixpoint {
            body: None,
            slot: RecursionSlot::new(),
        })
    }

    pub fn join(condition: Expression, left: Operator, right: Operator) -> Self {
        Self::new(OpKind::Join {
            condition,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn cross_product(left: Operator, right: Operator) -> Self {
        Self::new(OpKind::CrossProduct {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn projecting_join(
        condition: Expression,
        columns: Option<Vec<AttributeRef>>,
        left: Operator,
        right: Operator,
    ) -> Self {
        Self::new(OpKind::ProjectingJoin {
            condition,
            columns,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn union(left: Operator, right: Operator) -> Self {
        Self::new(OpKind::Union {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn union_all(left: Operator, right: Operator) -> Self {
        Self::new(OpKind::UnionAll {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn intersection(left: Operator, right: Operator) -> Self {
        Self::new(OpKind::Intersection {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn difference(left: Operator, right: Operator) -> Self {
        Self::new(OpKind::Difference {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn do_while(body: Operator, condition: Operator) -> Self {
        Self::new(OpKind::DoWhile {
            body: Box::new(body),
            condition: Box::new(condition),
        })
    }

    pub fn nary_join(conditions: Vec<Vec<usize>>, inputs: Vec<Operator>) -> Self {
        Self::new(OpKind::NaryJoin { conditions, inputs })
    }

    pub fn sequence(ops: Vec<Operator>) -> Self {
        Self::new(OpKind::Sequence { ops })
    }

    // ---- accessors ----

    pub fn kind(&self) -> &OpKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut OpKind {
        &mut self.kind
    }

    pub fn into_kind(self) -> OpKind {
        self.kind
    }

    /// Variant name, e.g. `"Select"`
    pub fn name(&self) -> &'static str {
        match &self.kind {
            OpKind::Scan { .. } => "Scan",
            OpKind::ScanTemp { .. } => "ScanTemp",
            OpKind::EmptyRelation { .. } => "EmptyRelation",
            OpKind::SingletonRelation => "SingletonRelation",
            OpKind::State { .. } => "State",
            OpKind::Select { .. } => "Select",
            OpKind::Project { .. } => "Project",
            OpKind::Apply { .. } => "Apply",
            OpKind::GroupBy { .. } => "GroupBy",
            OpKind::Distinct { .. } => "Distinct",
            OpKind::Limit { .. } => "Limit",
            OpKind::Shuffle { .. } => "Shuffle",
            OpKind::Collect { .. } => "Collect",
            OpKind::Broadcast { .. } => "Broadcast",
            OpKind::PartitionBy { .. } => "PartitionBy",
            OpKind::Store { .. } => "Store",
            OpKind::StoreTemp { .. } => "StoreTemp",
            OpKind::Fixpoint { .. } => "Fixpoint",
            OpKind::Join { .. } => "Join",
            OpKind::CrossProduct { .. } => "CrossProduct",
            OpKind::ProjectingJoin { .. } => "ProjectingJoin",
            OpKind::Union { .. } => "Union",
            OpKind::UnionAll { .. } => "UnionAll",
            OpKind::Intersection { .. } => "Intersection",
            OpKind::Difference { .. } => "Difference",
            OpKind::DoWhile { .. } => "DoWhile",
            OpKind::NaryJoin { .. } => "NaryJoin",
            OpKind::Sequence { .. } => "Sequence",
        }
    }

    pub fn alias(&self) -> Option<&str> {
        self.meta.alias.as_deref()
    }

    pub fn set_alias(&mut self, alias: Option<String>) {
        self.meta.alias = alias;
    }

    pub fn bound(&self) -> Option<&str> {
        self.meta.bound.as_deref()
    }

    pub fn set_bound(&mut self, symbol: Option<String>) {
        self.meta.bound = symbol;
    }

    pub fn cleanup(&self) -> &str {
        &self.meta.cleanup
    }

    pub fn set_cleanup(&mut self, code: impl Into<String>) {
        self.meta.cleanup = code.into();
    }

    /// Append a compilation annotation
    pub fn add_trace(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.meta.trace.push((key.into(), value.into()));
    }

    pub fn trace(&self) -> &[(String, String)] {
        &self.meta.trace
    }

    // ---- children ----

    /// Children in order: input; left, right; or the n-ary list
    pub fn children(&self) -> Vec<&Operator> {
        match &self.kind {
            OpKind::Scan { .. }
            | OpKind::ScanTemp { .. }
            | OpKind::EmptyRelation { .. }
            | OpKind::SingletonRelation
            | OpKind::State { .. } => Vec::new(),
            OpKind::Select { input, .. }
            | OpKind::Project { input, .. }
            | OpKind::Apply { input, .. }
            | OpKind::GroupBy { input, .. }
            | OpKind::Distinct { input }
            | OpKind::Limit { input, .. }
            | OpKind::Shuffle { input, .. }
            | OpKind::Collect { input, .. }
            | OpKind::Broadcast { input }
            | OpKind::PartitionBy { input, .. }
            | OpKind::Store { input, .. }
            | OpKind::StoreTemp { input, .. } => vec![input.as_ref()],
            OpKind::Fixpoint { body, .. } => body.iter().map(|b| &**b).collect(),
            OpKind::Join { left, right, .. }
            | OpKind::CrossProduct { left, right }
            | OpKind::ProjectingJoin { left, right, .. }
            | OpKind::Union { left, right }
            | OpKind::UnionAll { left, right }
            | OpKind::Intersection { left, right }
            | OpKind::Difference { left, right } => vec![left.as_ref(), right.as_ref()],
            OpKind::DoWhile { body, condition } => vec![body.as_ref(), condition.as_ref()],
            OpKind::NaryJoin { inputs, .. } => inputs.iter().collect(),
            OpKind::Sequence { ops } => ops.iter().collect(),
        }
    }

    /// Mutable children, same order as [`Operator::children`]
    pub fn children_mut(&mut self) -> Vec<&mut Operator> {
        match &mut self.kind {
            OpKind::Scan { .. }
            | OpKind::ScanTemp { .. }
            | OpKind::EmptyRelation { .. }
            | OpKind::SingletonRelation
            | OpKind::State { .. } => Vec::new(),
            OpKind::Select { input, .. }
            | OpKind::Project { input, .. }
            | OpKind::Apply { input, .. }
            | OpKind::GroupBy { input, .. }
            | OpKind::Distinct { input }
            | OpKind::Limit { input, .. }
            | OpKind::Shuffle { input, .. }
            | OpKind::Collect { input, .. }
            | OpKind::Broadcast { input }
            | OpKind::PartitionBy { input, .. }
            | OpKind::Store { input, .. }
            | OpKind::StoreTemp { input, .. } => vec![input.as_mut()],
            OpKind::Fixpoint { body, .. } => body.iter_mut().map(|b| &mut **b).collect(),
            OpKind::Join { left, right, .. }
            | OpKind::CrossProduct { left, right }
            | OpKind::ProjectingJoin { left, right, .. }
            | OpKind::Union { left, right }
            | OpKind::UnionAll { left, right }
            | OpKind::Intersection { left, right }
            | OpKind::Difference { left, right } => vec![left.as_mut(), right.as_mut()],
            OpKind::DoWhile { body, condition } => vec![body.as_mut(), condition.as_mut()],
            OpKind::NaryJoin { inputs, .. } => inputs.iter_mut().collect(),
            OpKind::Sequence { ops } => ops.iter_mut().collect(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Replace every child `c` with `f(c)`, keeping arity
    pub fn apply<F>(&mut self, mut f: F) -> &mut Self
    where
        F: FnMut(Operator) -> Operator,
    {
        for slot in self.children_mut() {
            let child = std::mem::replace(slot, Operator::singleton());
            *slot = f(child);
        }
        self
    }

    /// Structurally equal, independent node with no bound symbol.
    ///
    /// Variant fields and trace are carried over; the alias reverts to the
    /// node itself. Fixpoints in the copy get their own binding, shared
    /// with the copied `State`s that read them.
    pub fn copy(&self) -> Operator {
        let mut op = self.clone();
        op.meta.bound = None;
        op.meta.alias = None;
        op.relink_recursion();
        op
    }

    // ---- rendering ----

    /// One-line description of this node, without children
    pub fn short_str(&self) -> String {
        match &self.kind {
            OpKind::Scan { relation_key, .. } => format!("Scan({relation_key})"),
            OpKind::ScanTemp { name, scheme } => format!("ScanTemp({name},{scheme})"),
            OpKind::EmptyRelation { scheme } => format!("EmptyRelation({scheme})"),
            OpKind::SingletonRelation => "SingletonRelation".to_string(),
            OpKind::State { name, .. } => format!("State({name})"),
            OpKind::Select { condition, .. } => format!("Select({condition})"),
            OpKind::Project { columns, .. } => format!("Project({})", join_display(columns)),
            OpKind::Apply { mappings, .. } => format!("Apply({})", join_display(mappings)),
            OpKind::GroupBy { columns, .. } => format!("GroupBy({columns})"),
            OpKind::Distinct { .. } => "Distinct".to_string(),
            OpKind::Limit { count, .. } => format!("Limit({count})"),
            OpKind::Shuffle { columns, .. } => format!("Shuffle({})", join_display(columns)),
            OpKind::Collect { server, .. } => match server {
                Some(server) => format!("Collect(@{server})"),
                None => "Collect".to_string(),
            },
            OpKind::Broadcast { .. } => "Broadcast".to_string(),
            OpKind::PartitionBy { columns, .. } => {
                format!("PartitionBy({})", join_display(columns))
            }
            OpKind::Store { relation_key, .. } => format!("Store({relation_key})"),
            OpKind::StoreTemp { name, .. } => format!("StoreTemp({name})"),
            OpKind::Fixpoint { .. } => "Fixpoint".to_string(),
            OpKind::Join { condition, .. } => format!("Join({condition})"),
            OpKind::CrossProduct { .. } => "CrossProduct".to_string(),
            OpKind::ProjectingJoin {
                condition, columns, ..
            } => match columns {
                Some(columns) => {
                    format!("ProjectingJoin({condition}; {})", join_display(columns))
                }
                None => format!("ProjectingJoin({condition})"),
            },
            OpKind::Union { .. } => "Union".to_string(),
            OpKind::UnionAll { .. } => "UnionAll".to_string(),
            OpKind::Intersection { .. } => "Intersection".to_string(),
            OpKind::Difference { .. } => "Difference".to_string(),
            OpKind::DoWhile { .. } => "DoWhile".to_string(),
            OpKind::NaryJoin { conditions, .. } => {
                let groups: Vec<String> = conditions
                    .iter()
                    .map(|group| {
                        let cols: Vec<String> = group.iter().map(|p| format!("${p}")).collect();
                        format!("[{}]", cols.join("="))
                    })
                    .collect();
                format!("NaryJoin({})", groups.join(","))
            }
            OpKind::Sequence { .. } => "Sequence".to_string(),
        }
    }
}

fn join_display<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_str())?;
        let children = self.children();
        if children.is_empty() {
            return Ok(());
        }
        write!(f, "[")?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{child}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[path = "operator_test.rs"]
mod tests;
