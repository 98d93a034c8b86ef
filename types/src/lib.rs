//! Structural traversal of federated computation types.
//!
//! Types form a tree of seven variants: tensors, sequences, functions,
//! structs, federated values, abstract type variables and placements. This
//! crate provides:
//!
//! - [`transform_postorder`]: bottom-up rewriting with change tracking, which
//!   rebuilds only the nodes whose children actually changed
//! - [`visit_preorder`]: top-down inspection with a context threaded from each
//!   parent to its children
//!
//! Types are allocated through a [`TyBuilder`]. [`BoxBuilder`] uses `Rc`
//! nodes; [`ArenaBuilder`] bump-allocates them and interns identifiers.
//!
//! # Example
//!
//! ```
//! use fedtypes_types::{BoxBuilder, Dtype, PlacementLiteral, Ty, TyKind, transform_postorder};
//!
//! let b = BoxBuilder::new();
//! let ty = Ty::federated(&b, Ty::scalar(&b, Dtype::Float32), PlacementLiteral::Clients, false);
//!
//! // Strip the placement, keep the member.
//! let (out, changed) = transform_postorder(&b, ty, |ty| match ty.kind() {
//!     TyKind::Federated { member, .. } => (member.clone(), true),
//!     _ => (ty, false),
//! })
//! .unwrap();
//!
//! assert!(changed);
//! assert_eq!(out, Ty::scalar(&b, Dtype::Float32));
//! ```

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
extern crate alloc;

pub mod algo;
pub mod builders;
pub mod coerce;
pub mod core;
mod error;
mod options;

pub use crate::algo::{transform_postorder, try_transform_postorder, try_visit_preorder, visit_preorder};
pub use crate::builders::{ArenaBuilder, BoxBuilder};
pub use crate::coerce::{ToType, TypeSpec};
pub use crate::core::{
    ContainerTag, Dim, Dtype, ElementList, Ident, PlacementLiteral, Shape, Ty, TyBuilder, TyFlags,
    TyKind,
};
pub use crate::error::Error;
pub use crate::options::TraversalOptions;
