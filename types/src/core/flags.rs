use bitflags::bitflags;

bitflags! {
    /// Flags indicating various properties of a type.
    ///
    /// These flags are computed once when a node is allocated and cached
    /// for efficient queries. This avoids repeated recursive traversals
    /// when a client only needs to know whether a subtree contains
    /// something at all.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct TyFlags: u16 {
        const HAS_FEDERATED = 1;
        const HAS_ABSTRACT = 1 << 1;
        const HAS_PLACEMENT = 1 << 2;
        const HAS_FUNCTION = 1 << 3;
    }
}
