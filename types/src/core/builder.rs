use core::{fmt::Debug, hash::Hash, ops::Deref};

use super::kind::Dim;
use super::ty::{Ident, Ty, TyNode};

/// Storage strategy for type nodes.
///
/// A builder decides how nodes, identifiers and lists are allocated. The type
/// model itself (`TyKind<B>`) is the same for every builder.
pub trait TyBuilder: Copy + Clone + Debug + Eq + Hash + Sized {
    /// Examples: `&'a TyNode<Self>`, `Rc<TyNode<Self>>`.
    type TyHandle: AsRef<TyNode<Self>> + Clone + Debug + Eq + Hash;

    /// Examples: `string_cache::DefaultAtom`, an arena-interned `&'a str`.
    type IdentHandle: AsRef<str> + Clone + Debug + Eq + Hash;

    /// Lists could be `Vec<T>` for Box, and `&'a [T]` for Arena.
    /// We don't use a GAT like `List<T>` as that makes lifetime handling more complex.
    type ElementListHandle: Deref<Target = [(Option<Ident<Self>>, Ty<Self>)]>
        + Clone
        + Debug
        + Eq
        + Hash;
    type DimListHandle: Deref<Target = [Dim]> + Clone + Debug + Eq + Hash;

    /// Internal: Allocate a new node.
    /// Call instead: `TyKind::...(...).alloc(builder)`.
    fn alloc(&self, node: TyNode<Self>) -> Self::TyHandle;

    fn alloc_ident(&self, ident: impl AsRef<str>) -> Self::IdentHandle;

    fn alloc_element_list(
        &self,
        iter: impl IntoIterator<
            Item = (Option<Ident<Self>>, Ty<Self>),
            IntoIter: ExactSizeIterator,
        >,
    ) -> Self::ElementListHandle;

    fn alloc_dim_list(
        &self,
        iter: impl IntoIterator<Item = Dim, IntoIter: ExactSizeIterator>,
    ) -> Self::DimListHandle;
}
