pub mod label_tree;
pub mod reconciler;
pub mod tree_diff;
