//! Coercion of caller shorthand into canonical types.
//!
//! [`crate::algo::visit_preorder`] accepts anything implementing [`ToType`]:
//! an existing [`Ty`], a bare [`TyKind`], a [`Dtype`] (a scalar tensor), or a
//! [`TypeSpec`] tree describing tensors, structs and type variables.

use alloc::{format, string::ToString, vec::Vec};
use hashbrown::HashSet;

use crate::Error;
use crate::core::{ContainerTag, Dim, Dtype, ElementList, Ident, Shape, Ty, TyBuilder, TyKind};

/// Conversion into a canonical [`Ty`].
pub trait ToType<B: TyBuilder> {
    fn to_type(self, builder: &B) -> Result<Ty<B>, Error>;
}

impl<B: TyBuilder> ToType<B> for Ty<B> {
    fn to_type(self, _builder: &B) -> Result<Ty<B>, Error> {
        Ok(self)
    }
}

impl<B: TyBuilder> ToType<B> for &Ty<B> {
    fn to_type(self, _builder: &B) -> Result<Ty<B>, Error> {
        Ok(self.clone())
    }
}

impl<B: TyBuilder> ToType<B> for TyKind<B> {
    fn to_type(self, builder: &B) -> Result<Ty<B>, Error> {
        Ok(self.alloc(builder))
    }
}

impl<B: TyBuilder> ToType<B> for Dtype {
    fn to_type(self, builder: &B) -> Result<Ty<B>, Error> {
        Ok(Ty::scalar(builder, self))
    }
}

/// Shorthand description of a type, as handed over by a caller that does
/// not build [`Ty`] values itself.
#[derive(Debug, Clone)]
pub enum TypeSpec<'s, B: TyBuilder> {
    /// Already canonical.
    Ty(Ty<B>),
    /// Scalar tensor of the given element kind.
    Dtype(Dtype),
    /// Tensor with known rank.
    Tensor(Dtype, &'s [Dim]),
    /// Struct from a list, tuple or mapping. Names must be unique and
    /// non-empty; `container` names the originating container.
    Struct {
        elements: Vec<(Option<&'s str>, TypeSpec<'s, B>)>,
        container: Option<&'s str>,
    },
    /// Type variable with a non-empty label.
    Abstract(&'s str),
    /// A node from another encoding, identified only by its tag. Never
    /// coercible.
    Foreign(&'s str),
}

impl<'s, B: TyBuilder> TypeSpec<'s, B> {
    pub fn tuple(elements: impl IntoIterator<Item = TypeSpec<'s, B>>) -> Self {
        TypeSpec::Struct {
            elements: elements.into_iter().map(|spec| (None, spec)).collect(),
            container: None,
        }
    }

    pub fn named(elements: impl IntoIterator<Item = (&'s str, TypeSpec<'s, B>)>) -> Self {
        TypeSpec::Struct {
            elements: elements
                .into_iter()
                .map(|(name, spec)| (Some(name), spec))
                .collect(),
            container: None,
        }
    }
}

impl<B: TyBuilder> From<Ty<B>> for TypeSpec<'_, B> {
    fn from(ty: Ty<B>) -> Self {
        TypeSpec::Ty(ty)
    }
}

impl<B: TyBuilder> From<Dtype> for TypeSpec<'_, B> {
    fn from(dtype: Dtype) -> Self {
        TypeSpec::Dtype(dtype)
    }
}

impl<B: TyBuilder> ToType<B> for TypeSpec<'_, B> {
    fn to_type(self, builder: &B) -> Result<Ty<B>, Error> {
        match self {
            TypeSpec::Ty(ty) => Ok(ty),
            TypeSpec::Dtype(dtype) => Ok(Ty::scalar(builder, dtype)),
            TypeSpec::Tensor(dtype, dims) => Ok(Ty::tensor(
                builder,
                dtype,
                Shape::from_dims(builder, dims.iter().copied()),
            )),
            TypeSpec::Struct {
                elements,
                container,
            } => {
                check_element_names(elements.iter().filter_map(|(name, _)| *name))?;
                let elements = elements
                    .into_iter()
                    .map(|(name, spec)| {
                        let ty = spec.to_type(builder)?;
                        Ok((name.map(|name| Ident::new(builder, name)), ty))
                    })
                    .collect::<Result<Vec<_>, Error>>()?;
                Ok(TyKind::Struct {
                    elements: ElementList::from_iter(builder, elements),
                    container: container.map(|name| ContainerTag::new(builder, name)),
                }
                .alloc(builder))
            }
            TypeSpec::Abstract("") => {
                tracing::debug!("refusing to coerce abstract type with an empty label");
                Err(Error::InvalidArgument(
                    "abstract type label must be non-empty".to_string(),
                ))
            }
            TypeSpec::Abstract(label) => Ok(Ty::abstract_type(builder, label)),
            TypeSpec::Foreign(tag) => {
                tracing::debug!(tag, "refusing to coerce foreign type node");
                Err(Error::UnsupportedVariant {
                    tag: tag.to_string(),
                })
            }
        }
    }
}

fn check_element_names<'s>(names: impl Iterator<Item = &'s str>) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for name in names {
        let problem = if name.is_empty() {
            "empty struct element name".to_string()
        } else if !seen.insert(name) {
            format!("duplicate struct element name `{name}`")
        } else {
            continue;
        };
        tracing::debug!(%problem, "refusing to coerce struct");
        return Err(Error::InvalidArgument(problem));
    }
    Ok(())
}
