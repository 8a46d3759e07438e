use alloc::vec::Vec;
use simplelog::{Config, LevelFilter, TestLogger};

use crate::node::Color;
use crate::rb_tree::RbTree;

/// Routes `log` output through the test harness; repeated calls are ignored
pub(crate) fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

/// Pre-order snapshot of depths, keys and colors
pub(crate) fn shape<K: Clone>(tree: &RbTree<K>) -> Vec<(usize, K, Color)> {
    tree.traverse()
        .map(|(depth, key, color)| (depth, key.clone(), color))
        .collect()
}
