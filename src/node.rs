use core::fmt;

/// Sentinel index standing in for an absent link
pub(crate) const NIL: usize = usize::MAX;

/// Red-Black tree node colors used to maintain tree balance properties.
///
/// Red-Black trees maintain balance by ensuring:
/// - Red nodes have black children
/// - All paths from root to leaves have equal black node counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Red node - must have black children, cannot be adjacent to other red nodes
    Red,
    /// Black node - can have children of any color, contributes to black height
    Black,
}

impl Color {
    /// Returns `true` for [`Color::Red`]
    #[inline]
    pub const fn is_red(self) -> bool {
        matches!(self, Color::Red)
    }

    /// Returns `true` for [`Color::Black`]
    #[inline]
    pub const fn is_black(self) -> bool {
        matches!(self, Color::Black)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => f.write_str("red"),
            Color::Black => f.write_str("black"),
        }
    }
}

/// Which child slot of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Handle to a live node of an [`RbTree`](crate::RbTree).
///
/// Handles are plain arena indices. A handle goes stale once its node is
/// removed, and the slot may later be handed to a new key. Passing a stale
/// handle to a tree method panics; a handle minted by a different tree is not
/// detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the arena slot this handle points at
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    #[inline]
    pub(crate) const fn from_index(idx: usize) -> Option<Self> {
        if idx == NIL { None } else { Some(Self(idx)) }
    }
}

/// A node in the Red-Black tree containing the key and structural information.
#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    /// The stored key
    pub(crate) key: K,

    /// Index of parent node in the arena (NIL if this is root)
    pub(crate) parent: usize,

    /// Index of left child node in the arena (NIL if no left child)
    pub(crate) left: usize,

    /// Index of right child node in the arena (NIL if no right child)
    pub(crate) right: usize,

    /// Color of this node (Red or Black) used for Red-Black tree balancing
    pub(crate) color: Color,
}

impl<K> Node<K> {
    /// Fresh red leaf hanging off `parent`
    #[inline]
    pub(crate) const fn leaf(key: K, parent: usize) -> Self {
        Self {
            key,
            parent,
            left: NIL,
            right: NIL,
            color: Color::Red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_color_display() {
        assert_eq!(Color::Red.to_string(), "red");
        assert_eq!(Color::Black.to_string(), "black");
        assert!(Color::Red.is_red());
        assert!(Color::Black.is_black());
    }

    #[test]
    fn test_node_id_from_sentinel() {
        assert_eq!(NodeId::from_index(NIL), None);
        assert_eq!(NodeId::from_index(3).map(NodeId::index), Some(3));
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite().opposite(), Side::Right);
    }

    #[test]
    fn test_leaf_is_red_and_unlinked() {
        let node = Node::leaf(7, 2);
        assert_eq!(node.color, Color::Red);
        assert_eq!(node.parent, 2);
        assert_eq!(node.left, NIL);
        assert_eq!(node.right, NIL);
    }
}
