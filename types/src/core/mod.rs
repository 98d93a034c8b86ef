//! Core type system components.
//!
//! This module provides the fundamental building blocks for the type system:
//!
//! - [`TyBuilder`]: Trait for node allocation strategies
//! - [`Ty`] and [`TyNode`]: Type handles and their underlying nodes
//! - [`TyKind`]: The closed set of type variants (tensors, sequences, functions, ...)
//! - [`TyFlags`]: Cached type properties for efficient queries
//!
//! See the [`traversal`] submodule for the fold and preorder drivers.

mod builder;
mod flags;
mod kind;
pub mod traversal;
mod ty;

pub use builder::TyBuilder;
pub use flags::TyFlags;
pub use kind::{Children, ContainerTag, Dim, Dtype, PlacementLiteral, Shape, TyKind};
pub use ty::{DimList, ElementList, Ident, Ty, TyNode};
