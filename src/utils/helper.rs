use num_traits::Float;

/// Returns the red-black height guarantee `2 * log2(len + 1)`
///
/// Any valid red-black tree holding `len` keys has at most this many nodes on
/// its longest root-to-leaf path.
///
/// # Arguments
///
/// * `len` - The number of keys in the tree
///
/// # Returns
///
/// * `f64` - The height bound
#[inline]
pub fn height_bound(len: usize) -> f64 {
    let n = len as f64 + 1.0;
    2.0 * Float::log2(n)
}

/// Returns `ceil(log2(len + 1))`, the height of a perfectly balanced tree
/// holding `len` keys
///
/// # Arguments
///
/// * `len` - The number of keys in the tree
///
/// # Returns
///
/// * `usize` - The smallest possible height
#[inline]
pub fn min_height(len: usize) -> usize {
    let n = len as f64 + 1.0;
    Float::ceil(Float::log2(n)) as usize
}
