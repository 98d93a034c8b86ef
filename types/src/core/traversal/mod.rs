//! Type traversal drivers.
//!
//! This module provides two traversal patterns, both driven by an explicit
//! task stack so that nesting depth is never limited by the call stack:
//! - [`Fold`]: A bottom-up traversal that can transform types and combine results
//! - [`PreorderVisitor`]: A top-down walk that threads a context along each path
//!
//! # Example
//!
//! ```
//! use fedtypes_types::core::traversal::{Fold, FoldStep, drive_fold};
//! use fedtypes_types::{BoxBuilder, Dtype, Ty, TyBuilder};
//!
//! /// Counts the nodes of a type tree.
//! struct NodeCount;
//!
//! impl<B: TyBuilder> Fold<B> for NodeCount {
//!     type Output = usize;
//!     type Error = ();
//!
//!     fn visit(&mut self, _: &B, _: &Ty<B>) -> Result<FoldStep<usize>, ()> {
//!         Ok(FoldStep::Recurse)
//!     }
//!
//!     fn combine(
//!         &mut self,
//!         _: &B,
//!         _: &Ty<B>,
//!         children: impl ExactSizeIterator<Item = usize> + DoubleEndedIterator,
//!     ) -> Result<usize, ()> {
//!         Ok(1 + children.sum::<usize>())
//!     }
//! }
//!
//! let b = BoxBuilder::new();
//! let seq = Ty::sequence(&b, Ty::scalar(&b, Dtype::Int32));
//! assert_eq!(drive_fold(&b, seq, NodeCount), Ok(2));
//! ```

mod fold;
mod visit;

pub use fold::{Fold, FoldStep, drive_fold};
pub use visit::{PreorderVisitor, drive_preorder};
