//! Preorder and postorder traversal over operator trees

use super::operator::Operator;

/// Borrowing preorder iterator: each node before its children
pub struct Preorder<'a> {
    stack: Vec<&'a Operator>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Operator;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}

/// Borrowing postorder iterator: children before their parent
pub struct Postorder<'a> {
    // (node, children already pushed)
    stack: Vec<(&'a Operator, bool)>,
}

impl<'a> Iterator for Postorder<'a> {
    type Item = &'a Operator;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            if expanded {
                return Some(node);
            }
            self.stack.push((node, true));
            self.stack
                .extend(node.children().into_iter().rev().map(|child| (child, false)));
        }
    }
}

impl Operator {
    pub fn iter_preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    pub fn iter_postorder(&self) -> Postorder<'_> {
        Postorder {
            stack: vec![(self, false)],
        }
    }

    /// Lazily yield `f(node)` for every node, children before parents.
    ///
    /// `f` may yield any number of values per node. Calling again restarts
    /// the traversal.
    pub fn postorder<'a, F, I>(&'a self, f: F) -> impl Iterator<Item = I::Item> + 'a
    where
        F: FnMut(&'a Operator) -> I + 'a,
        I: IntoIterator + 'a,
        I::IntoIter: 'a,
    {
        self.iter_postorder().flat_map(f)
    }

    /// Lazily yield `f(node)` for every node, parents before children
    pub fn preorder<'a, F, I>(&'a self, f: F) -> impl Iterator<Item = I::Item> + 'a
    where
        F: FnMut(&'a Operator) -> I + 'a,
        I: IntoIterator + 'a,
        I::IntoIter: 'a,
    {
        self.iter_preorder().flat_map(f)
    }
}
