use crate::core::{Dim, Ident, Ty, TyBuilder, TyKind, TyNode};
use alloc::rc::Rc;
use alloc::{vec, vec::Vec};
use core::fmt;
use smallvec::SmallVec;
use string_cache::DefaultAtom;

/// Builder that uses reference counting (no deduplication).
///
/// Nodes are allocated with `Rc` and no interning is performed; identifiers
/// are `string_cache` atoms. This is useful for:
/// - Testing (simpler than arena)
/// - Types that must outlive any single arena
/// - Comparing performance with/without interning
///
/// # Example
///
/// ```
/// use fedtypes_types::{BoxBuilder, Dtype, Ty, TyKind};
///
/// let builder = BoxBuilder::new();
/// let int_ty = Ty::scalar(&builder, Dtype::Int32);
/// let seq_ty = TyKind::Sequence(int_ty).alloc(&builder);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoxBuilder;

impl BoxBuilder {
    /// Create a new box builder.
    pub fn new() -> Self {
        Self
    }
}

impl Default for BoxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reference-counted node handle of [`BoxBuilder`].
///
/// Releasing the last handle to a node frees the uniquely owned part of its
/// subtree from a heap worklist, so dropping a deeply nested type does not
/// grow the call stack.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BoxTy(Rc<TyNode<BoxBuilder>>);

impl AsRef<TyNode<BoxBuilder>> for BoxTy {
    fn as_ref(&self) -> &TyNode<BoxBuilder> {
        &self.0
    }
}

impl fmt::Debug for BoxTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl Drop for BoxTy {
    fn drop(&mut self) {
        let Some(node) = Rc::get_mut(&mut self.0) else {
            return;
        };
        if node.kind().is_leaf() {
            return;
        }

        let mut pending = vec![node.take_kind()];
        while let Some(kind) = pending.pop() {
            for child in into_children(kind) {
                let mut handle = child.into_handle();
                if let Some(node) = Rc::get_mut(&mut handle.0) {
                    if !node.kind().is_leaf() {
                        pending.push(node.take_kind());
                    }
                }
                // `handle` now owns at most a childless node.
            }
        }
    }
}

fn into_children(kind: TyKind<BoxBuilder>) -> SmallVec<[Ty<BoxBuilder>; 2]> {
    match kind {
        TyKind::Tensor { .. } | TyKind::Abstract(_) | TyKind::Placement => SmallVec::new(),
        TyKind::Sequence(member) | TyKind::Federated { member, .. } => smallvec::smallvec![member],
        TyKind::Function { param, result } => param.into_iter().chain([result]).collect(),
        TyKind::Struct { elements, .. } => elements
            .into_handle()
            .into_iter()
            .map(|(_, ty)| ty)
            .collect(),
    }
}

impl TyBuilder for BoxBuilder {
    type TyHandle = BoxTy;
    type IdentHandle = DefaultAtom;
    type ElementListHandle = Vec<(Option<Ident<Self>>, Ty<Self>)>;
    type DimListHandle = Vec<Dim>;

    fn alloc(&self, node: TyNode<Self>) -> Self::TyHandle {
        BoxTy(Rc::new(node))
    }

    fn alloc_ident(&self, ident: impl AsRef<str>) -> Self::IdentHandle {
        DefaultAtom::from(ident.as_ref())
    }

    fn alloc_element_list(
        &self,
        iter: impl IntoIterator<
            Item = (Option<Ident<Self>>, Ty<Self>),
            IntoIter: ExactSizeIterator,
        >,
    ) -> Self::ElementListHandle {
        iter.into_iter().collect()
    }

    fn alloc_dim_list(
        &self,
        iter: impl IntoIterator<Item = Dim, IntoIter: ExactSizeIterator>,
    ) -> Self::DimListHandle {
        iter.into_iter().collect()
    }
}
