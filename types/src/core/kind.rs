use alloc::format;
use smallvec::{SmallVec, smallvec};

use super::builder::TyBuilder;
use super::flags::TyFlags;
use super::ty::{DimList, ElementList, Ident, Ty, TyNode};
use crate::Error;

/// The closed set of type variants.
///
/// Every traversal matches on this enum exhaustively, so a node can never
/// fall through dispatch unhandled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TyKind<B: TyBuilder> {
    /// Tensor with an element kind and a shape. Leaf.
    Tensor { dtype: Dtype, shape: Shape<B> },

    /// Sequence of values of the member type.
    Sequence(Ty<B>),

    /// Function type. The parameter is absent for no-argument functions.
    Function { param: Option<Ty<B>>, result: Ty<B> },

    /// Ordered, optionally named elements.
    ///
    /// `container` records which host container the struct was built from.
    /// It is carried through rewrites untouched and never interpreted here.
    Struct {
        elements: ElementList<B>,
        container: Option<ContainerTag<B>>,
    },

    /// A value distributed across the participants at `placement`.
    ///
    /// `all_equal` states that every participant holds the same member value.
    Federated {
        member: Ty<B>,
        placement: PlacementLiteral,
        all_equal: bool,
    },

    /// Abstract (type-parameter) type identified by its label. Leaf.
    Abstract(Ident<B>),

    /// The type of placement values. Leaf.
    Placement,
}

/// Children of a node, in the variant's natural order.
pub type Children<'a, B> = smallvec::IntoIter<[&'a Ty<B>; 2]>;

impl<B: TyBuilder> TyKind<B> {
    pub fn compute_flags(&self) -> TyFlags {
        match self {
            TyKind::Tensor { .. } => TyFlags::empty(),
            TyKind::Abstract(_) => TyFlags::HAS_ABSTRACT,
            TyKind::Placement => TyFlags::HAS_PLACEMENT,
            TyKind::Sequence(member) => member.flags(),
            TyKind::Function { param, result } => {
                let param_flags = param.as_ref().map_or(TyFlags::empty(), Ty::flags);
                param_flags | result.flags() | TyFlags::HAS_FUNCTION
            }
            TyKind::Struct { elements, .. } => elements
                .iter()
                .fold(TyFlags::empty(), |acc, (_, ty)| acc | ty.flags()),
            TyKind::Federated { member, .. } => member.flags() | TyFlags::HAS_FEDERATED,
        }
    }

    pub fn alloc(self, builder: &B) -> Ty<B> {
        Ty::new(builder, TyNode::new(self))
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            TyKind::Tensor { .. } => "Tensor",
            TyKind::Sequence(_) => "Sequence",
            TyKind::Function { .. } => "Function",
            TyKind::Struct { .. } => "Struct",
            TyKind::Federated { .. } => "Federated",
            TyKind::Abstract(_) => "Abstract",
            TyKind::Placement => "Placement",
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            TyKind::Tensor { .. } | TyKind::Abstract(_) | TyKind::Placement
        )
    }

    /// Compares everything except the child types: variant, dtype and
    /// shape, parameter presence, element names and container tag,
    /// placement and `all_equal`, abstract label.
    pub(crate) fn same_node(&self, other: &Self) -> bool {
        match (self, other) {
            (
                TyKind::Tensor { dtype, shape },
                TyKind::Tensor {
                    dtype: other_dtype,
                    shape: other_shape,
                },
            ) => dtype == other_dtype && shape == other_shape,
            (TyKind::Sequence(_), TyKind::Sequence(_)) => true,
            (TyKind::Function { param, .. }, TyKind::Function { param: other, .. }) => {
                param.is_some() == other.is_some()
            }
            (
                TyKind::Struct {
                    elements,
                    container,
                },
                TyKind::Struct {
                    elements: other_elements,
                    container: other_container,
                },
            ) => container == other_container && elements.names().eq(other_elements.names()),
            (
                TyKind::Federated {
                    placement,
                    all_equal,
                    ..
                },
                TyKind::Federated {
                    placement: other_placement,
                    all_equal: other_all_equal,
                    ..
                },
            ) => placement == other_placement && all_equal == other_all_equal,
            (TyKind::Abstract(label), TyKind::Abstract(other)) => label == other,
            (TyKind::Placement, TyKind::Placement) => true,
            _ => false,
        }
    }

    /// Child types in definition order:
    /// - `Sequence`, `Federated`: `[member]`
    /// - `Function`: `[param, result]`, or `[result]` when there is no param
    /// - `Struct`: `[element0, element1, ...]`
    /// - Leaves (`Tensor`, `Abstract`, `Placement`): `[]`
    pub fn children(&self) -> Children<'_, B> {
        let children: SmallVec<[&Ty<B>; 2]> = match self {
            TyKind::Tensor { .. } | TyKind::Abstract(_) | TyKind::Placement => SmallVec::new(),
            TyKind::Sequence(member) | TyKind::Federated { member, .. } => smallvec![member],
            TyKind::Function { param, result } => {
                param.iter().chain(core::iter::once(result)).collect()
            }
            TyKind::Struct { elements, .. } => elements.iter().map(|(_, ty)| ty).collect(),
        };
        children.into_iter()
    }

    pub fn child_count(&self) -> usize {
        match self {
            TyKind::Tensor { .. } | TyKind::Abstract(_) | TyKind::Placement => 0,
            TyKind::Sequence(_) | TyKind::Federated { .. } => 1,
            TyKind::Function { param, .. } => 1 + usize::from(param.is_some()),
            TyKind::Struct { elements, .. } => elements.len(),
        }
    }

    /// Rebuilds this node with new children, in the order given by
    /// [`TyKind::children`].
    ///
    /// Everything that is not a child is carried over: placement and
    /// `all_equal`, element names and order, the container tag, and the
    /// absence of a function parameter. Leaves are returned as-is.
    pub fn with_children(
        &self,
        builder: &B,
        children: impl IntoIterator<Item = Ty<B>>,
    ) -> Result<TyKind<B>, Error> {
        let children: SmallVec<[Ty<B>; 2]> = children.into_iter().collect();
        match (self, children.as_slice()) {
            (TyKind::Tensor { .. } | TyKind::Abstract(_) | TyKind::Placement, []) => {
                Ok(self.clone())
            }
            (TyKind::Sequence(_), [member]) => Ok(TyKind::Sequence(member.clone())),
            (TyKind::Function { param: None, .. }, [result]) => Ok(TyKind::Function {
                param: None,
                result: result.clone(),
            }),
            (TyKind::Function { param: Some(_), .. }, [param, result]) => Ok(TyKind::Function {
                param: Some(param.clone()),
                result: result.clone(),
            }),
            (
                TyKind::Struct {
                    elements,
                    container,
                },
                tys,
            ) if tys.len() == elements.len() => {
                let elements = ElementList::from_iter(
                    builder,
                    elements
                        .iter()
                        .zip(tys)
                        .map(|((name, _), ty)| (name.clone(), ty.clone())),
                );
                Ok(TyKind::Struct {
                    elements,
                    container: container.clone(),
                })
            }
            (
                TyKind::Federated {
                    placement,
                    all_equal,
                    ..
                },
                [member],
            ) => Ok(TyKind::Federated {
                member: member.clone(),
                placement: *placement,
                all_equal: *all_equal,
            }),
            (kind, tys) => Err(Error::InvalidArgument(format!(
                "`{}` takes {} child type(s), got {}",
                kind.variant_name(),
                kind.child_count(),
                tys.len()
            ))),
        }
    }
}

impl<B: TyBuilder> Ty<B> {
    pub fn tensor(builder: &B, dtype: Dtype, shape: Shape<B>) -> Self {
        TyKind::Tensor { dtype, shape }.alloc(builder)
    }

    /// Tensor of rank zero.
    pub fn scalar(builder: &B, dtype: Dtype) -> Self {
        Self::tensor(builder, dtype, Shape::scalar(builder))
    }

    pub fn sequence(builder: &B, member: Ty<B>) -> Self {
        TyKind::Sequence(member).alloc(builder)
    }

    pub fn function(builder: &B, param: Option<Ty<B>>, result: Ty<B>) -> Self {
        TyKind::Function { param, result }.alloc(builder)
    }

    pub fn structure<S: AsRef<str>>(
        builder: &B,
        elements: impl IntoIterator<Item = (Option<S>, Ty<B>), IntoIter: ExactSizeIterator>,
    ) -> Self {
        TyKind::Struct {
            elements: Self::element_list(builder, elements),
            container: None,
        }
        .alloc(builder)
    }

    pub fn structure_in<S: AsRef<str>>(
        builder: &B,
        elements: impl IntoIterator<Item = (Option<S>, Ty<B>), IntoIter: ExactSizeIterator>,
        container: ContainerTag<B>,
    ) -> Self {
        TyKind::Struct {
            elements: Self::element_list(builder, elements),
            container: Some(container),
        }
        .alloc(builder)
    }

    pub fn federated(
        builder: &B,
        member: Ty<B>,
        placement: PlacementLiteral,
        all_equal: bool,
    ) -> Self {
        TyKind::Federated {
            member,
            placement,
            all_equal,
        }
        .alloc(builder)
    }

    pub fn abstract_type(builder: &B, label: impl AsRef<str>) -> Self {
        TyKind::Abstract(Ident::new(builder, label)).alloc(builder)
    }

    pub fn placement(builder: &B) -> Self {
        TyKind::Placement.alloc(builder)
    }

    fn element_list<S: AsRef<str>>(
        builder: &B,
        elements: impl IntoIterator<Item = (Option<S>, Ty<B>), IntoIter: ExactSizeIterator>,
    ) -> ElementList<B> {
        ElementList::from_iter(
            builder,
            elements
                .into_iter()
                .map(|(name, ty)| (name.map(|name| Ident::new(builder, name)), ty)),
        )
    }
}

/// Element kind of a tensor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dtype {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float16,
    Float32,
    Float64,
    String,
}

/// A single dimension; `None` when its size is not known.
pub type Dim = Option<u64>;

/// Shape of a tensor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape<B: TyBuilder> {
    /// Rank not known.
    Unknown,
    /// Known rank; individual dimensions may still be unknown.
    Known(DimList<B>),
}

impl<B: TyBuilder> Shape<B> {
    pub fn scalar(builder: &B) -> Self {
        Shape::Known(DimList::from_iter(builder, core::iter::empty::<Dim>()))
    }

    pub fn from_dims(
        builder: &B,
        dims: impl IntoIterator<Item = Dim, IntoIter: ExactSizeIterator>,
    ) -> Self {
        Shape::Known(DimList::from_iter(builder, dims))
    }

    pub fn rank(&self) -> Option<usize> {
        match self {
            Shape::Unknown => None,
            Shape::Known(dims) => Some(dims.len()),
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.rank() == Some(0)
    }
}

/// The participant groups a federated value can live at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlacementLiteral {
    Clients,
    Server,
}

/// Opaque tag naming the host container a struct type was created from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerTag<B: TyBuilder>(Ident<B>);

impl<B: TyBuilder> ContainerTag<B> {
    pub fn new(builder: &B, name: impl AsRef<str>) -> Self {
        Self(Ident::new(builder, name))
    }

    pub fn name(&self) -> &str {
        self.0.as_str()
    }
}

// Implement Copy when IdentHandle is Copy (e.g., for ArenaBuilder)
impl<B: TyBuilder> Copy for ContainerTag<B> where B::IdentHandle: Copy {}
