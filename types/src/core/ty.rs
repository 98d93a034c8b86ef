use alloc::{vec, vec::Vec};
use core::hash;
use core::mem;
use core::ops::Deref;
use core::fmt;

use super::builder::TyBuilder;
use super::flags::TyFlags;
use super::kind::{Dim, TyKind};

/// Lightweight wrapper around the builder's representation.
///
/// Equality and hashing are structural for every builder: two types are equal
/// when they have the same variant and equal fields. Use [`Ty::ptr_eq`] to ask
/// whether two handles point at the very same node.
///
/// `==` walks both trees with an explicit stack and stops early at shared
/// nodes, so it works at any depth. `Hash` and `Debug` recurse.
pub struct Ty<B: TyBuilder>(B::TyHandle);

impl<B: TyBuilder> Ty<B> {
    pub fn new(builder: &B, node: TyNode<B>) -> Self {
        Self(builder.alloc(node))
    }

    pub(crate) fn into_handle(self) -> B::TyHandle {
        self.0
    }

    pub fn node(&self) -> &TyNode<B> {
        self.0.as_ref()
    }

    pub fn kind(&self) -> &TyKind<B> {
        self.node().kind()
    }

    pub fn flags(&self) -> TyFlags {
        self.node().flags()
    }

    /// Returns `true` if both handles refer to the same allocated node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.node(), other.node())
    }
}

// Implement Copy when TyHandle is Copy (e.g., for ArenaBuilder)
impl<B: TyBuilder> Copy for Ty<B> where B::TyHandle: Copy {}

/// A type node: its kind plus flags cached at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TyNode<B: TyBuilder>(TyFlags, TyKind<B>);

impl<B: TyBuilder> TyNode<B> {
    pub fn new(kind: TyKind<B>) -> Self {
        let flags = kind.compute_flags();
        Self(flags, kind)
    }

    pub fn flags(&self) -> TyFlags {
        self.0
    }

    pub fn kind(&self) -> &TyKind<B> {
        &self.1
    }

    /// Moves the kind out, leaving a childless placeholder behind.
    pub(crate) fn take_kind(&mut self) -> TyKind<B> {
        mem::replace(&mut self.1, TyKind::Placement)
    }
}

impl<B: TyBuilder> AsRef<TyNode<B>> for TyNode<B> {
    fn as_ref(&self) -> &TyNode<B> {
        self
    }
}

impl<B: TyBuilder> hash::Hash for TyNode<B> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        // Flags are computed from the kind, so we don't need to hash them.
        self.kind().hash(state);
    }
}

pub struct Ident<B: TyBuilder>(B::IdentHandle);

impl<B: TyBuilder> Ident<B> {
    pub fn new(builder: &B, name: impl AsRef<str>) -> Self {
        Self(builder.alloc_ident(name))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

// Implement Copy when IdentHandle is Copy (e.g., for ArenaBuilder)
impl<B: TyBuilder> Copy for Ident<B> where B::IdentHandle: Copy {}

impl<B: TyBuilder> fmt::Display for Ident<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// === ElementList ===

/// Ordered `(name, type)` pairs of a struct type.
///
/// Iteration yields elements in declared order; names are optional and kept
/// verbatim.
pub struct ElementList<B: TyBuilder>(B::ElementListHandle);

impl<B: TyBuilder> ElementList<B> {
    pub fn from_iter(
        builder: &B,
        iter: impl IntoIterator<Item = (Option<Ident<B>>, Ty<B>), IntoIter: ExactSizeIterator>,
    ) -> Self {
        Self(builder.alloc_element_list(iter))
    }

    pub fn iter(&self) -> core::slice::Iter<'_, (Option<Ident<B>>, Ty<B>)> {
        self.0.iter()
    }

    pub fn names(&self) -> impl ExactSizeIterator<Item = Option<&Ident<B>>> + '_ {
        self.0.iter().map(|(name, _)| name.as_ref())
    }

    pub(crate) fn into_handle(self) -> B::ElementListHandle {
        self.0
    }
}

impl<B: TyBuilder> Deref for ElementList<B> {
    type Target = [(Option<Ident<B>>, Ty<B>)];

    fn deref(&self) -> &Self::Target {
        self.0.deref()
    }
}

impl<'a, B: TyBuilder> IntoIterator for &'a ElementList<B> {
    type Item = &'a (Option<Ident<B>>, Ty<B>);
    type IntoIter = core::slice::Iter<'a, (Option<Ident<B>>, Ty<B>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// === DimList ===

pub struct DimList<B: TyBuilder>(B::DimListHandle);

impl<B: TyBuilder> DimList<B> {
    pub fn from_iter(
        builder: &B,
        iter: impl IntoIterator<Item = Dim, IntoIter: ExactSizeIterator>,
    ) -> Self {
        Self(builder.alloc_dim_list(iter))
    }
}

impl<B: TyBuilder> Deref for DimList<B> {
    type Target = [Dim];

    fn deref(&self) -> &Self::Target {
        self.0.deref()
    }
}

impl<B: TyBuilder> PartialEq for Ty<B> {
    fn eq(&self, other: &Self) -> bool {
        let mut pending: Vec<(&Ty<B>, &Ty<B>)> = vec![(self, other)];
        while let Some((lhs, rhs)) = pending.pop() {
            if lhs.ptr_eq(rhs) {
                continue;
            }
            if !lhs.kind().same_node(rhs.kind()) {
                return false;
            }
            // `same_node` guarantees equal child counts.
            pending.extend(lhs.kind().children().zip(rhs.kind().children()));
        }
        true
    }
}

// Handle wrappers delegate to the builder's handle. The impls are bounded on
// `B: TyBuilder` only; the handle bounds come from the trait.
macro_rules! delegate_eq_to_handle {
    ($($wrapper:ident),* $(,)?) => {$(
        impl<B: TyBuilder> PartialEq for $wrapper<B> {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }
    )*};
}

macro_rules! delegate_to_handle {
    ($($wrapper:ident),* $(,)?) => {$(
        impl<B: TyBuilder> Clone for $wrapper<B> {
            fn clone(&self) -> Self {
                Self(self.0.clone())
            }
        }

        impl<B: TyBuilder> Eq for $wrapper<B> {}

        impl<B: TyBuilder> hash::Hash for $wrapper<B> {
            fn hash<H: hash::Hasher>(&self, state: &mut H) {
                self.0.hash(state)
            }
        }

        impl<B: TyBuilder> fmt::Debug for $wrapper<B> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(&self.0, f)
            }
        }
    )*};
}

delegate_eq_to_handle!(Ident, ElementList, DimList);
delegate_to_handle!(Ty, Ident, ElementList, DimList);
