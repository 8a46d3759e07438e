use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::node::{Color, NIL, Node, NodeId, Side};

/// A Red-Black tree storing ordered keys in a growable node arena.
///
/// Nodes live in a vector and link to each other by index: `left` and `right`
/// are the ownership edges, `parent` is a plain back-reference. Slots vacated
/// by [`remove`](RbTree::remove) are recycled through a LIFO free list, so node
/// handles ([`NodeId`]) stay small and copyable.
///
/// Key features:
/// - O(log n) insertion, lookup and removal
/// - Duplicate keys are kept as separate nodes, after all equal keys already present
/// - Rotation and root-resolution primitives exposed for callers building on the tree
/// - Invariant checker ([`validate`](RbTree::validate)) run after every mutation in debug builds
#[derive(Debug, Clone)]
pub struct RbTree<K> {
    /// Node arena, `None` marks a vacant slot
    pub(crate) nodes: Vec<Option<Node<K>>>,

    /// Stack of vacant slot indices, reused before the arena grows
    pub(crate) free_list: Vec<usize>,

    /// Number of live nodes
    pub(crate) len: usize,

    /// Index of the root node, NIL when the tree is empty
    pub(crate) root: usize,
}

impl<K> Default for RbTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RbTree<K> {
    /// Creates an empty tree
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            root: NIL,
        }
    }

    /// Creates an empty tree with room for `capacity` nodes before reallocating
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of nodes to reserve
    ///
    /// # Panics
    ///
    /// If `capacity` would overflow the index space
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity < NIL,
            "Capacity too large - risk of index overflow"
        );

        Self {
            nodes: Vec::with_capacity(capacity),
            free_list: Vec::with_capacity(capacity),
            len: 0,
            root: NIL,
        }
    }

    /// Number of keys stored, duplicates included
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the tree holds no keys
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes the arena can hold without reallocating
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Removes every key, keeping the arena allocation
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.len = 0;
        self.root = NIL;
    }

    /// Current root, `None` for an empty tree
    #[inline]
    pub const fn root(&self) -> Option<NodeId> {
        NodeId::from_index(self.root)
    }

    /// Walks parent links up from `node` and returns the top of its tree
    ///
    /// For any live node this equals [`root`](RbTree::root). The "no node,
    /// no root" case is `option.map(|n| tree.root_of(n))`.
    ///
    /// # Panics
    ///
    /// If `node` is stale
    pub fn root_of(&self, node: NodeId) -> NodeId {
        let mut current = self.live(node);
        loop {
            let parent = self.node_at(current).parent;
            if parent == NIL {
                return NodeId(current);
            }
            current = parent;
        }
    }

    /// Borrows the key stored at `node`
    ///
    /// # Panics
    ///
    /// If `node` is stale
    pub fn key(&self, node: NodeId) -> &K {
        &self.node_at(self.live(node)).key
    }

    /// Color of `node`
    ///
    /// # Panics
    ///
    /// If `node` is stale
    pub fn color(&self, node: NodeId) -> Color {
        self.node_at(self.live(node)).color
    }

    /// Parent of `node`, `None` at the root
    ///
    /// # Panics
    ///
    /// If `node` is stale
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        NodeId::from_index(self.node_at(self.live(node)).parent)
    }

    /// Left child of `node`
    ///
    /// # Panics
    ///
    /// If `node` is stale
    pub fn left(&self, node: NodeId) -> Option<NodeId> {
        NodeId::from_index(self.node_at(self.live(node)).left)
    }

    /// Right child of `node`
    ///
    /// # Panics
    ///
    /// If `node` is stale
    pub fn right(&self, node: NodeId) -> Option<NodeId> {
        NodeId::from_index(self.node_at(self.live(node)).right)
    }

    /// Smallest key, the first one inserted among equals
    pub fn min(&self) -> Option<&K> {
        if self.root == NIL {
            return None;
        }
        Some(&self.node_at(self.find_minimum(self.root)).key)
    }

    /// Largest key, the last one inserted among equals
    pub fn max(&self) -> Option<&K> {
        if self.root == NIL {
            return None;
        }
        Some(&self.node_at(self.find_maximum(self.root)).key)
    }

    /// Number of nodes on the longest root-to-leaf path, 0 when empty
    pub fn height(&self) -> usize {
        let mut deepest = 0;
        let mut stack = Vec::new();
        if self.root != NIL {
            stack.push((self.root, 1));
        }
        while let Some((idx, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = self.node_at(idx);
            for child in [node.left, node.right] {
                if child != NIL {
                    stack.push((child, depth + 1));
                }
            }
        }
        deepest
    }

    /// Black-height of the root: black nodes below it on any path to an
    /// absent child. 0 for an empty or single-node tree.
    ///
    /// Follows the leftmost path; on a valid tree every path agrees.
    pub fn black_height(&self) -> usize {
        if self.root == NIL {
            return 0;
        }
        let mut count = 0;
        let mut current = self.node_at(self.root).left;
        while current != NIL {
            if self.is_black(current) {
                count += 1;
            }
            current = self.node_at(current).left;
        }
        count
    }

    /// Rotates the subtree at `pivot` to the left and returns the root.
    ///
    /// `pivot`'s right child takes its place and `pivot` becomes that child's
    /// left child. A child promoted to the root is painted black; no other
    /// colors change, so callers that rotate inside a balanced tree own the
    /// recoloring. No-op when `pivot` has no right child.
    ///
    /// Rotating back with [`rotate_right`](RbTree::rotate_right) restores the
    /// links but not the colors when the first rotation promoted a red child
    /// to the root, since that child was painted black.
    ///
    /// # Panics
    ///
    /// If `pivot` is stale
    pub fn rotate_left(&mut self, pivot: NodeId) -> Option<NodeId> {
        let pivot = self.live(pivot);
        self.rotate_at(pivot, Side::Left);
        self.root()
    }

    /// Mirror of [`rotate_left`](RbTree::rotate_left): `pivot`'s left child
    /// takes its place. No-op when `pivot` has no left child.
    ///
    /// # Panics
    ///
    /// If `pivot` is stale
    pub fn rotate_right(&mut self, pivot: NodeId) -> Option<NodeId> {
        let pivot = self.live(pivot);
        self.rotate_at(pivot, Side::Right);
        self.root()
    }

    /// Resolves a public handle to an arena index, panicking on stale handles
    #[inline]
    pub(crate) fn live(&self, node: NodeId) -> usize {
        match self.nodes.get(node.0) {
            Some(Some(_)) => node.0,
            _ => panic!("stale node handle {node:?}"),
        }
    }

    #[inline]
    pub(crate) fn node_at(&self, idx: usize) -> &Node<K> {
        match self.nodes.get(idx) {
            Some(Some(node)) => node,
            _ => panic!("arena slot {idx} is vacant"),
        }
    }

    #[inline]
    pub(crate) fn node_at_mut(&mut self, idx: usize) -> &mut Node<K> {
        match self.nodes.get_mut(idx) {
            Some(Some(node)) => node,
            _ => panic!("arena slot {idx} is vacant"),
        }
    }

    pub(crate) fn allocate_node(&mut self, node: Node<K>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx] = Some(node);
            idx
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    pub(crate) fn deallocate_node(&mut self, idx: usize) -> Node<K> {
        match self.nodes.get_mut(idx).and_then(Option::take) {
            Some(node) => {
                self.free_list.push(idx);
                node
            }
            None => panic!("arena slot {idx} freed twice"),
        }
    }

    pub(crate) fn find_minimum(&self, mut node: usize) -> usize {
        while node != NIL {
            let left = self.node_at(node).left;
            if left == NIL {
                break;
            }
            node = left;
        }
        node
    }

    pub(crate) fn find_maximum(&self, mut node: usize) -> usize {
        while node != NIL {
            let right = self.node_at(node).right;
            if right == NIL {
                break;
            }
            node = right;
        }
        node
    }

    #[inline]
    pub(crate) fn get_color(&self, node: usize) -> Color {
        if node == NIL {
            Color::Black
        } else {
            self.node_at(node).color
        }
    }

    #[inline]
    pub(crate) fn set_color(&mut self, node: usize, color: Color) {
        if node != NIL {
            self.node_at_mut(node).color = color;
        }
    }

    #[inline]
    pub(crate) fn is_red(&self, node: usize) -> bool {
        self.get_color(node).is_red()
    }

    #[inline]
    pub(crate) fn is_black(&self, node: usize) -> bool {
        self.get_color(node).is_black()
    }

    #[inline]
    pub(crate) fn get_parent(&self, node: usize) -> usize {
        if node == NIL {
            NIL
        } else {
            self.node_at(node).parent
        }
    }

    #[inline]
    pub(crate) fn get_left(&self, node: usize) -> usize {
        if node == NIL {
            NIL
        } else {
            self.node_at(node).left
        }
    }

    #[inline]
    pub(crate) fn get_right(&self, node: usize) -> usize {
        if node == NIL {
            NIL
        } else {
            self.node_at(node).right
        }
    }

    /// Puts `new_node` into the child slot of `old_node`'s parent
    pub(crate) fn replace_in_parent(&mut self, old_node: usize, new_node: usize) {
        let parent = self.node_at(old_node).parent;

        if parent == NIL {
            self.root = new_node;
        } else if old_node == self.node_at(parent).left {
            self.node_at_mut(parent).left = new_node;
        } else {
            self.node_at_mut(parent).right = new_node;
        }

        if new_node != NIL {
            self.node_at_mut(new_node).parent = parent;
        }
    }

    /// Child of `node` on `side`, NIL for a NIL node
    #[inline]
    pub(crate) fn child(&self, node: usize, side: Side) -> usize {
        match side {
            Side::Left => self.get_left(node),
            Side::Right => self.get_right(node),
        }
    }

    #[inline]
    fn set_child(&mut self, node: usize, side: Side, child: usize) {
        let node = self.node_at_mut(node);
        match side {
            Side::Left => node.left = child,
            Side::Right => node.right = child,
        }
    }

    /// Lowers `pivot` toward `toward`, lifting its child from the other side
    /// into its place. Rotating toward `Side::Left` is a left rotation.
    pub(crate) fn rotate_at(&mut self, pivot: usize, toward: Side) {
        let lifted = self.child(pivot, toward.opposite());
        if lifted == NIL {
            return;
        }
        log::trace!("rotate {toward:?} at {pivot}, lifting {lifted}");

        // the lifted node's inner subtree changes hands
        let inner = self.child(lifted, toward);
        self.set_child(pivot, toward.opposite(), inner);
        if inner != NIL {
            self.node_at_mut(inner).parent = pivot;
        }

        self.replace_in_parent(pivot, lifted);
        if self.root == lifted {
            self.node_at_mut(lifted).color = Color::Black;
        }

        self.set_child(lifted, toward, pivot);
        self.node_at_mut(pivot).parent = lifted;
    }
}

impl<K: Ord> RbTree<K> {
    /// Inserts `key` and returns the root after rebalancing.
    ///
    /// Keys equal to ones already stored are accepted and placed after them
    /// in key order. The returned root may differ from the previous one when
    /// the rebalancing rotates at the top of the tree.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert
    ///
    /// # Returns
    ///
    /// * `NodeId` - The root of the tree after the insertion
    ///
    /// # Panics
    ///
    /// In debug builds the invariants are checked after the insertion, so
    /// this panics if the tree was already unbalanced, for example by an
    /// earlier call to [`rotate_left`](RbTree::rotate_left) or
    /// [`rotate_right`](RbTree::rotate_right).
    pub fn insert(&mut self, key: K) -> NodeId {
        let parent = self.find_insertion_parent(&key);
        let goes_left = parent != NIL && key < self.node_at(parent).key;

        let new_idx = self.allocate_node(Node::leaf(key, parent));
        self.link_to_parent(new_idx, parent, goes_left);
        self.len += 1;

        self.fix_insertion_violations(new_idx);
        log::debug!("inserted node {new_idx}, len {}", self.len);

        debug_assert_eq!(
            self.validate(),
            Ok(()),
            "RB tree invariants violated after insertion"
        );

        NodeId(self.root)
    }

    /// Looks `key` up starting at the root
    ///
    /// # Returns
    ///
    /// * `Option<NodeId>` - A node holding an equal key, or `None` if no such key is stored
    pub fn find(&self, key: &K) -> Option<NodeId> {
        self.find_node(key, self.root).map(NodeId)
    }

    /// Looks `key` up in the subtree rooted at `start`
    ///
    /// # Panics
    ///
    /// If `start` is stale
    pub fn find_from(&self, key: &K, start: NodeId) -> Option<NodeId> {
        self.find_node(key, self.live(start)).map(NodeId)
    }

    /// Returns `true` if an equal key is stored
    pub fn contains(&self, key: &K) -> bool {
        self.find_node(key, self.root).is_some()
    }

    pub(crate) fn find_node(&self, key: &K, from: usize) -> Option<usize> {
        let mut current = from;

        while current != NIL {
            let node = self.node_at(current);
            match key.cmp(&node.key) {
                Ordering::Equal => return Some(current),
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
            }
        }
        None
    }

    fn find_insertion_parent(&self, key: &K) -> usize {
        let mut current = self.root;
        let mut parent = NIL;

        while current != NIL {
            parent = current;
            let node = self.node_at(current);
            current = if *key < node.key {
                node.left
            } else {
                node.right
            };
        }
        parent
    }

    fn link_to_parent(&mut self, node_idx: usize, parent_idx: usize, goes_left: bool) {
        if parent_idx == NIL {
            self.root = node_idx;
        } else if goes_left {
            self.node_at_mut(parent_idx).left = node_idx;
        } else {
            self.node_at_mut(parent_idx).right = node_idx;
        }
    }

    fn fix_insertion_violations(&mut self, mut node: usize) {
        loop {
            let parent = self.get_parent(node);
            if parent == NIL {
                self.set_color(node, Color::Black);
                break;
            }

            let grandparent = self.get_parent(parent);
            if self.is_black(parent) || grandparent == NIL {
                break;
            }

            let side = if parent == self.get_left(grandparent) {
                Side::Left
            } else {
                Side::Right
            };
            let uncle = self.child(grandparent, side.opposite());

            if self.is_red(uncle) {
                log::trace!("red uncle {uncle}, pushing violation up to {grandparent}");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            // zig-zag: straighten so node, parent and grandparent line up
            let parent = if node == self.child(parent, side.opposite()) {
                self.rotate_at(parent, side);
                node
            } else {
                parent
            };
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate_at(grandparent, side.opposite());
            break;
        }
        self.set_color(self.root, Color::Black);
    }
}

impl<K: Ord> Extend<K> for RbTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for RbTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
