//! fedtypes - Structural traversal for federated computation types
//!
//! # Overview
//!
//! Federated computations are typed with a small tree of variants: tensors,
//! sequences, functions, structs, federated values, abstract type variables
//! and placements. Compiler passes over such programs keep asking the same
//! two questions of a type:
//!
//! - *Rewrite*: replace some nodes and rebuild only what changed
//!   ([`transform_postorder`])
//! - *Inspect*: look at every node top-down, carrying context from parent to
//!   children ([`visit_preorder`])
//!
//! # Quick Start
//!
//! ```
//! use fedtypes::{BoxBuilder, Dtype, PlacementLiteral, Ty, TyKind};
//! use fedtypes::{transform_postorder, visit_preorder};
//!
//! let b = BoxBuilder::new();
//!
//! // <x=float32@CLIENTS, y=int32@SERVER>
//! let ty = Ty::structure(
//!     &b,
//!     [
//!         (
//!             Some("x"),
//!             Ty::federated(&b, Ty::scalar(&b, Dtype::Float32), PlacementLiteral::Clients, false),
//!         ),
//!         (
//!             Some("y"),
//!             Ty::federated(&b, Ty::scalar(&b, Dtype::Int32), PlacementLiteral::Server, true),
//!         ),
//!     ],
//! );
//!
//! // Count federated members.
//! let mut federated = 0;
//! visit_preorder(&b, &ty, |ty, ()| {
//!     if matches!(ty.kind(), TyKind::Federated { .. }) {
//!         federated += 1;
//!     }
//! }, ())
//! .unwrap();
//! assert_eq!(federated, 2);
//!
//! // Retype every float32 tensor.
//! let (_, changed) = transform_postorder(&b, ty, |ty| match ty.kind() {
//!     TyKind::Tensor { dtype: Dtype::Float32, shape } => {
//!         (Ty::tensor(&b, Dtype::Int32, shape.clone()), true)
//!     }
//!     _ => (ty, false),
//! })
//! .unwrap();
//! assert!(changed);
//! ```
//!
//! # Builders
//!
//! Types are allocated through a [`TyBuilder`]:
//!
//! 1. [`BoxBuilder`]: `Rc` nodes, no lifetimes to thread around
//! 2. [`ArenaBuilder`]: nodes in a `bumpalo::Bump`, `Copy` handles, interned
//!    identifiers

pub use fedtypes_types::{algo, builders, coerce, core::traversal};

pub use fedtypes_types::{
    ArenaBuilder, BoxBuilder, ContainerTag, Dim, Dtype, ElementList, Error, Ident,
    PlacementLiteral, Shape, ToType, TraversalOptions, Ty, TyBuilder, TyFlags, TyKind, TypeSpec,
    transform_postorder, try_transform_postorder, try_visit_preorder, visit_preorder,
};
