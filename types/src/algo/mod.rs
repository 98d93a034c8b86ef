//! Traversal algorithms over type trees.
//!
//! Both algorithms are thin adapters around the drivers in
//! [`crate::core::traversal`] and accept plain closures.

mod transform;
mod visit;

pub use transform::{transform_postorder, try_transform_postorder};
pub use visit::{try_visit_preorder, visit_preorder};
