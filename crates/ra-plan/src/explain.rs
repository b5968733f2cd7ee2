//! Human-readable plan listings

use crate::algebra::Operator;
use ra_core::SymbolGenerator;
use std::fmt::Write;

/// Indented tree, one node per line
pub fn explain_tree(op: &Operator) -> String {
    let mut out = String::new();
    write_tree(op, 0, &mut out);
    out
}

fn write_tree(op: &Operator, depth: usize, out: &mut String) {
    let _ = writeln!(out, "{}{}", "  ".repeat(depth), op.short_str());
    for child in op.children() {
        write_tree(child, depth + 1, out);
    }
}

/// Bind a result symbol to every node, children first, and list one
/// assignment per node: `V2 = Distinct[V1]`.
///
/// Nodes that already carry a bound symbol are reused without descending
/// into them.
pub fn explain_symbols(op: &mut Operator, symbols: &mut SymbolGenerator) -> String {
    let mut lines = Vec::new();
    bind_symbols(op, symbols, &mut lines);
    lines.join("\n")
}

fn bind_symbols(
    op: &mut Operator,
    symbols: &mut SymbolGenerator,
    lines: &mut Vec<String>,
) -> String {
    if let Some(bound) = op.bound() {
        return bound.to_string();
    }
    let inputs: Vec<String> = op
        .children_mut()
        .into_iter()
        .map(|child| bind_symbols(child, symbols, lines))
        .collect();

    let symbol = symbols.fresh();
    if inputs.is_empty() {
        lines.push(format!("{symbol} = {}", op.short_str()));
    } else {
        lines.push(format!("{symbol} = {}[{}]", op.short_str(), inputs.join(", ")));
    }
    op.set_bound(Some(symbol.clone()));
    symbol
}
