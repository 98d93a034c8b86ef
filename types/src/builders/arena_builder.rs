use crate::core::{Dim, Ident, Ty, TyBuilder, TyNode};
use bumpalo::Bump;
use core::cell::RefCell;
use core::{fmt, hash, ptr};
use hashbrown::{DefaultHashBuilder, HashSet};

/// An interned arena string.
///
/// One [`ArenaBuilder`] hands out at most one `InternedStr` per distinct
/// content, so strings from the same builder usually compare by address.
/// Strings from different builders compare and hash by content.
#[derive(Clone, Copy)]
pub struct InternedStr<'arena>(&'arena str);

impl<'arena> InternedStr<'arena> {
    pub fn as_str(&self) -> &'arena str {
        self.0
    }
}

impl AsRef<str> for InternedStr<'_> {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl fmt::Debug for InternedStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0, f)
    }
}

impl PartialEq for InternedStr<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.0, other.0) || self.0 == other.0
    }
}

impl Eq for InternedStr<'_> {}

impl hash::Hash for InternedStr<'_> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

/// Deduplicating string table whose storage lives in the arena.
struct Interner<'arena> {
    strs: RefCell<HashSet<&'arena str, DefaultHashBuilder, &'arena Bump>>,
}

impl<'arena> Interner<'arena> {
    fn new_in(arena: &'arena Bump) -> Self {
        Self {
            strs: RefCell::new(HashSet::with_capacity_in(64, arena)),
        }
    }

    fn intern(&self, arena: &'arena Bump, s: &str) -> InternedStr<'arena> {
        let mut strs = self.strs.borrow_mut();
        let interned: &'arena str = *strs.get_or_insert_with(s, |s| &*arena.alloc_str(s));
        InternedStr(interned)
    }
}

/// Builder that allocates into a `bumpalo::Bump`.
///
/// Nodes, element lists and dimension lists live as long as the arena and
/// are never freed individually. Labels, element names and container tags go
/// through one interning table per builder.
///
/// Handles are plain references, so `Ty<ArenaBuilder>` is `Copy` and one
/// pointer wide.
///
/// # Example
///
/// ```
/// use fedtypes_types::{ArenaBuilder, Dtype, Ident, PlacementLiteral, Ty};
/// use bumpalo::Bump;
///
/// let arena = Bump::new();
/// let builder = ArenaBuilder::new(&arena);
///
/// let int_ty = Ty::scalar(&builder, Dtype::Int32);
/// let fed_ty = Ty::federated(&builder, int_ty, PlacementLiteral::Clients, false);
///
/// assert_eq!(Ident::new(&builder, "T"), Ident::new(&builder, "T"));
/// ```
#[derive(Copy, Clone)]
pub struct ArenaBuilder<'arena> {
    arena: &'arena Bump,
    interner: &'arena Interner<'arena>,
}

impl<'arena> ArenaBuilder<'arena> {
    pub fn new(arena: &'arena Bump) -> Self {
        Self {
            arena,
            interner: arena.alloc(Interner::new_in(arena)),
        }
    }
}

impl fmt::Debug for ArenaBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArenaBuilder")
            .field(&ptr::from_ref(self.arena))
            .finish()
    }
}

// Builders are identified by their arena.
impl PartialEq for ArenaBuilder<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.arena, other.arena)
    }
}

impl Eq for ArenaBuilder<'_> {}

impl hash::Hash for ArenaBuilder<'_> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        ptr::hash(self.arena, state)
    }
}

impl<'arena> TyBuilder for ArenaBuilder<'arena> {
    type TyHandle = &'arena TyNode<Self>;
    type IdentHandle = InternedStr<'arena>;
    type ElementListHandle = &'arena [(Option<Ident<Self>>, Ty<Self>)];
    type DimListHandle = &'arena [Dim];

    fn alloc(&self, node: TyNode<Self>) -> Self::TyHandle {
        self.arena.alloc(node)
    }

    fn alloc_ident(&self, ident: impl AsRef<str>) -> Self::IdentHandle {
        self.interner.intern(self.arena, ident.as_ref())
    }

    fn alloc_element_list(
        &self,
        iter: impl IntoIterator<
            Item = (Option<Ident<Self>>, Ty<Self>),
            IntoIter: ExactSizeIterator,
        >,
    ) -> Self::ElementListHandle {
        self.arena.alloc_slice_fill_iter(iter)
    }

    fn alloc_dim_list(
        &self,
        iter: impl IntoIterator<Item = Dim, IntoIter: ExactSizeIterator>,
    ) -> Self::DimListHandle {
        self.arena.alloc_slice_fill_iter(iter)
    }
}
