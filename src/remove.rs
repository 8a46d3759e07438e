use crate::node::{Color, NIL, Side};
use crate::rb_tree::RbTree;

impl<K: Ord> RbTree<K> {
    /// Removes one node holding a key equal to `key`.
    ///
    /// A node with two children first trades keys with its in-order successor
    /// (leftmost node of its right subtree) and the successor's slot is the
    /// one spliced out. When the spliced node was black the tree is
    /// rebalanced before returning. The new root is available through
    /// [`root`](RbTree::root).
    ///
    /// Handles to the spliced node go stale. When keys were traded, the handle
    /// that pointed at the removed key now reads the successor's key.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to remove
    ///
    /// # Returns
    ///
    /// * `Option<K>` - The removed key, or `None` if no equal key is stored
    ///
    /// # Panics
    ///
    /// In debug builds, if the tree was left unbalanced by the raw rotation
    /// primitives, since the invariants are checked after the removal.
    pub fn remove(&mut self, key: &K) -> Option<K> {
        let target = self.find_node(key, self.root)?;
        let spliced = self.select_splice_node(target);
        let removed = self.delete_node(spliced);
        self.len -= 1;
        log::debug!("removed node {spliced}, len {}", self.len);

        debug_assert_eq!(
            self.validate(),
            Ok(()),
            "RB tree invariants violated after removal"
        );

        Some(removed)
    }

    /// Returns the node to splice out in place of `node`, moving keys so the
    /// spliced node carries the key being removed
    fn select_splice_node(&mut self, node: usize) -> usize {
        let left = self.node_at(node).left;
        let right = self.node_at(node).right;
        if left == NIL || right == NIL {
            return node;
        }

        let successor = self.find_minimum(right);
        self.swap_keys(node, successor);
        successor
    }

    fn swap_keys(&mut self, a: usize, b: usize) {
        debug_assert_ne!(a, b);
        let (low, high) = (a.min(b), a.max(b));
        let (head, tail) = self.nodes.split_at_mut(high);
        match (&mut head[low], &mut tail[0]) {
            (Some(x), Some(y)) => core::mem::swap(&mut x.key, &mut y.key),
            _ => panic!("arena slots {low} and {high} must both be live"),
        }
    }

    /// Splices out `node`, which has at most one child, and returns its key
    fn delete_node(&mut self, node: usize) -> K {
        let (left, right, parent, color) = {
            let n = self.node_at(node);
            (n.left, n.right, n.parent, n.color)
        };
        debug_assert!(left == NIL || right == NIL);

        let child = if left != NIL { left } else { right };
        self.replace_in_parent(node, child);

        if color == Color::Black {
            self.fix_removal_violations(child, parent);
        }

        self.deallocate_node(node).key
    }

    /// Resolves the missing black on the path through `node`, whose parent is
    /// `parent`. `node` may be NIL when a black leaf was spliced out.
    fn fix_removal_violations(&mut self, mut node: usize, mut parent: usize) {
        while node != self.root && self.is_black(node) {
            if parent == NIL {
                break;
            }

            let side = if node == self.get_left(parent) {
                Side::Left
            } else {
                Side::Right
            };
            let far = side.opposite();
            let mut sibling = self.child(parent, far);

            if self.is_red(sibling) {
                log::trace!("red sibling {sibling}, rotating at {parent}");
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate_at(parent, side);
                sibling = self.child(parent, far);
            }

            if self.is_black(self.get_left(sibling)) && self.is_black(self.get_right(sibling)) {
                self.set_color(sibling, Color::Red);
                node = parent;
                parent = self.get_parent(node);
                continue;
            }

            if self.is_black(self.child(sibling, far)) {
                self.set_color(self.child(sibling, side), Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate_at(sibling, far);
                sibling = self.child(parent, far);
            }

            self.set_color(sibling, self.get_color(parent));
            self.set_color(parent, Color::Black);
            self.set_color(self.child(sibling, far), Color::Black);
            self.rotate_at(parent, side);
            node = self.root;
        }

        self.set_color(node, Color::Black);
    }
}
