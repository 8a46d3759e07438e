use ahash::RandomState;
use core::fmt;
use hashbrown::HashSet;

use crate::node::{Color, NIL, NodeId};
use crate::rb_tree::RbTree;

/// A broken red-black or search-tree invariant reported by [`RbTree::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The root is red
    RedRoot,
    /// The root has a parent link
    RootHasParent,
    /// A red node has a red child
    RedRedEdge {
        /// The red parent
        parent: NodeId,
        /// Its red child
        child: NodeId,
    },
    /// The two subtrees of a node reach absent children through different
    /// numbers of black nodes
    BlackHeightMismatch {
        /// The node whose subtrees disagree
        node: NodeId,
        /// Black nodes down the left subtree, the absent child counted as one
        left: usize,
        /// Black nodes down the right subtree, the absent child counted as one
        right: usize,
    },
    /// A child's parent link does not point back at the node holding it
    BrokenParentLink {
        /// The child with the wrong parent link
        child: NodeId,
    },
    /// A node's key is out of order with respect to one of its subtrees
    OutOfOrder {
        /// The node whose subtree holds a misplaced key
        node: NodeId,
    },
    /// A node is reachable twice from the root
    SharedOrCyclicLink {
        /// The node reached a second time
        node: NodeId,
    },
    /// The number of reachable nodes differs from the stored length
    LengthMismatch {
        /// The stored length
        expected: usize,
        /// Nodes reachable from the root
        reachable: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::RedRoot => f.write_str("root is red"),
            Violation::RootHasParent => f.write_str("root has a parent link"),
            Violation::RedRedEdge { parent, child } => write!(
                f,
                "red node {} has red child {}",
                parent.index(),
                child.index()
            ),
            Violation::BlackHeightMismatch { node, left, right } => write!(
                f,
                "black height mismatch at node {}: left {left}, right {right}",
                node.index()
            ),
            Violation::BrokenParentLink { child } => {
                write!(f, "node {} has a broken parent link", child.index())
            }
            Violation::OutOfOrder { node } => {
                write!(f, "subtree keys out of order at node {}", node.index())
            }
            Violation::SharedOrCyclicLink { node } => {
                write!(f, "node {} is reachable more than once", node.index())
            }
            Violation::LengthMismatch {
                expected,
                reachable,
            } => write!(
                f,
                "tree holds {expected} keys but {reachable} nodes are reachable"
            ),
        }
    }
}

/// Per-subtree facts gathered bottom-up
struct Subtree {
    /// Black nodes from the subtree root down to an absent child, that child counted
    black_height: usize,
    /// Node holding the smallest key
    min: usize,
    /// Node holding the largest key
    max: usize,
}

impl<K: Ord> RbTree<K> {
    /// Checks every structural invariant of the tree.
    ///
    /// - the root is black and has no parent
    /// - no red node has a red child
    /// - every path to an absent child crosses the same number of black nodes
    /// - every child links back to its parent
    /// - keys are ordered: left subtree `<=` node `<=` right subtree
    /// - the structure is a tree holding exactly [`len`](RbTree::len) nodes
    ///
    /// Runs in O(n). Debug builds call it after every insertion and removal.
    ///
    /// # Returns
    ///
    /// * `Result<(), Violation>` - The first violation found, if any
    pub fn validate(&self) -> Result<(), Violation> {
        let mut visited = HashSet::with_capacity_and_hasher(self.len, RandomState::default());

        if self.root != NIL {
            let root = self.node_at(self.root);
            if root.color == Color::Red {
                return Err(Violation::RedRoot);
            }
            if root.parent != NIL {
                return Err(Violation::RootHasParent);
            }
            self.check_subtree(self.root, &mut visited)?;
        }

        if visited.len() != self.len {
            return Err(Violation::LengthMismatch {
                expected: self.len,
                reachable: visited.len(),
            });
        }
        Ok(())
    }

    fn check_subtree(
        &self,
        idx: usize,
        visited: &mut HashSet<usize, RandomState>,
    ) -> Result<Subtree, Violation> {
        if !visited.insert(idx) {
            return Err(Violation::SharedOrCyclicLink {
                node: NodeId(idx),
            });
        }

        let node = self.node_at(idx);
        let mut heights = [1, 1];
        let mut min = idx;
        let mut max = idx;

        for (side, child) in [node.left, node.right].into_iter().enumerate() {
            if child == NIL {
                continue;
            }

            let child_node = self.node_at(child);
            if child_node.parent != idx {
                return Err(Violation::BrokenParentLink {
                    child: NodeId(child),
                });
            }
            if node.color == Color::Red && child_node.color == Color::Red {
                return Err(Violation::RedRedEdge {
                    parent: NodeId(idx),
                    child: NodeId(child),
                });
            }

            let sub = self.check_subtree(child, visited)?;
            if side == 0 {
                if self.node_at(sub.max).key > node.key {
                    return Err(Violation::OutOfOrder { node: NodeId(idx) });
                }
                min = sub.min;
            } else {
                if self.node_at(sub.min).key < node.key {
                    return Err(Violation::OutOfOrder { node: NodeId(idx) });
                }
                max = sub.max;
            }
            heights[side] = sub.black_height;
        }

        if heights[0] != heights[1] {
            return Err(Violation::BlackHeightMismatch {
                node: NodeId(idx),
                left: heights[0],
                right: heights[1],
            });
        }

        Ok(Subtree {
            black_height: heights[0] + usize::from(node.color == Color::Black),
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn scenario() -> RbTree<i32> {
        [80, 120, 10, 20, 60, 50, 100, 90, 140, 30]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_valid_trees() {
        assert_eq!(RbTree::<i32>::new().validate(), Ok(()));
        assert_eq!(scenario().validate(), Ok(()));
    }

    #[test]
    fn test_detects_red_root() {
        let mut tree = scenario();
        let root = tree.root;
        tree.set_color(root, Color::Red);
        assert_eq!(tree.validate(), Err(Violation::RedRoot));
    }

    #[test]
    fn test_detects_red_red_edge() {
        let mut tree = scenario();
        let node = tree.find(&10).unwrap();
        tree.set_color(node.index(), Color::Red);

        let parent = tree.parent(node).unwrap();
        assert_eq!(
            tree.validate(),
            Err(Violation::RedRedEdge {
                parent,
                child: node
            })
        );
    }

    #[test]
    fn test_detects_black_height_mismatch() {
        let mut tree = scenario();
        let node = tree.find(&30).unwrap();
        tree.set_color(node.index(), Color::Black);

        let parent = tree.parent(node).unwrap();
        assert_eq!(
            tree.validate(),
            Err(Violation::BlackHeightMismatch {
                node: parent,
                left: 2,
                right: 1
            })
        );
    }

    #[test]
    fn test_detects_broken_parent_link() {
        let mut tree = scenario();
        let node = tree.find(&140).unwrap();
        tree.node_at_mut(node.index()).parent = tree.root;

        assert_eq!(
            tree.validate(),
            Err(Violation::BrokenParentLink { child: node })
        );
    }

    #[test]
    fn test_detects_out_of_order_keys() {
        let mut tree = scenario();
        let node = tree.find(&30).unwrap();
        tree.node_at_mut(node.index()).key = 55;

        let parent = tree.parent(node).unwrap();
        assert_eq!(tree.validate(), Err(Violation::OutOfOrder { node: parent }));
    }

    #[test]
    fn test_detects_length_mismatch() {
        let mut tree = scenario();
        tree.len += 1;
        assert_eq!(
            tree.validate(),
            Err(Violation::LengthMismatch {
                expected: 11,
                reachable: 10
            })
        );
    }

    #[test]
    fn test_unbalanced_rotation_is_reported() {
        let mut tree = scenario();
        let node = tree.find(&100).unwrap();
        tree.rotate_left(node);
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_violation_display() {
        assert_eq!(Violation::RedRoot.to_string(), "root is red");
        assert_eq!(
            Violation::LengthMismatch {
                expected: 3,
                reachable: 2
            }
            .to_string(),
            "tree holds 3 keys but 2 nodes are reachable"
        );
    }
}
