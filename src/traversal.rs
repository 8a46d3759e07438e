use alloc::vec::Vec;

use crate::node::{Color, NIL};
use crate::rb_tree::RbTree;

/// In-order iterator over the keys of an [`RbTree`].
///
/// Equal keys come out in the order they were inserted.
#[derive(Debug, Clone)]
pub struct Iter<'a, K> {
    tree: &'a RbTree<K>,
    /// Nodes whose left subtree is done or pending, deepest on top
    stack: Vec<usize>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn new(tree: &'a RbTree<K>) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
            remaining: tree.len(),
        };
        iter.push_left_spine(tree.root);
        iter
    }

    fn push_left_spine(&mut self, mut node: usize) {
        while node != NIL {
            self.stack.push(node);
            node = self.tree.node_at(node).left;
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let node = self.tree.node_at(idx);
        self.push_left_spine(node.right);
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

/// Pre-order walk yielding `(depth, key, color)` for every node, root first at
/// depth 1, each node before its left then right subtree.
///
/// Meant for debugging and printing; borrowing the tree keeps it from changing
/// mid-walk. Clone the iterator or call [`RbTree::traverse`] again to restart.
#[derive(Debug, Clone)]
pub struct Traverse<'a, K> {
    tree: &'a RbTree<K>,
    stack: Vec<(usize, usize)>,
}

impl<'a, K> Iterator for Traverse<'a, K> {
    type Item = (usize, &'a K, Color);

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, depth) = self.stack.pop()?;
        let node = self.tree.node_at(idx);
        if node.right != NIL {
            self.stack.push((node.right, depth + 1));
        }
        if node.left != NIL {
            self.stack.push((node.left, depth + 1));
        }
        Some((depth, &node.key, node.color))
    }
}

impl<K> RbTree<K> {
    /// Iterates over the keys in ascending order
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self)
    }

    /// Walks the tree in pre-order, yielding `(depth, key, color)`
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_index::{Color, RbTree};
    ///
    /// let tree: RbTree<i32> = [2, 1, 3].into_iter().collect();
    /// let lines: Vec<_> = tree
    ///     .traverse()
    ///     .map(|(depth, key, color)| format!("{depth}:{key}-{color}"))
    ///     .collect();
    ///
    /// assert_eq!(lines, ["1:2-black", "2:1-red", "2:3-red"]);
    /// ```
    pub fn traverse(&self) -> Traverse<'_, K> {
        let mut stack = Vec::new();
        if self.root != NIL {
            stack.push((self.root, 1));
        }
        Traverse { tree: self, stack }
    }
}

impl<'a, K> IntoIterator for &'a RbTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use core::fmt::Write;

    #[test]
    fn test_iter_sorted() {
        let tree: RbTree<i32> = [80, 120, 10, 20, 60, 50, 100, 90, 140, 30]
            .into_iter()
            .collect();

        let keys: Vec<_> = tree.iter().copied().collect();
        assert_eq!(keys, vec![10, 20, 30, 50, 60, 80, 90, 100, 120, 140]);
        assert_eq!(tree.iter().len(), 10);

        let mut total = 0;
        for key in &tree {
            total += key;
        }
        assert_eq!(total, keys.iter().sum());
    }

    #[test]
    fn test_iter_empty() {
        let tree = RbTree::<i32>::new();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.traverse().next(), None);
    }

    #[test]
    fn test_traverse_print_format() {
        let tree: RbTree<i32> = [80, 120, 10, 20, 60, 50, 100, 90, 140, 30]
            .into_iter()
            .collect();

        let mut out = String::new();
        for (depth, key, color) in tree.traverse() {
            writeln!(out, "{depth}:{key}-{color}").unwrap();
        }

        assert_eq!(
            out,
            "1:80-black\n2:20-red\n3:10-black\n3:50-black\n4:30-red\n4:60-red\n\
             2:100-red\n3:90-black\n3:120-black\n4:140-red\n"
        );
    }

    #[test]
    fn test_traverse_is_restartable() {
        let tree: RbTree<i32> = (0..50).collect();
        let walk = tree.traverse();

        let first: Vec<_> = walk.clone().collect();
        let second: Vec<_> = walk.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 50);
        assert_eq!(first, tree.traverse().collect::<Vec<_>>());

        let max_depth = first.iter().map(|&(depth, _, _)| depth).max();
        assert_eq!(max_depth, Some(tree.height()));
    }
}
