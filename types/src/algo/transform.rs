use alloc::format;
use smallvec::SmallVec;

use crate::core::traversal::{Fold, FoldStep, drive_fold};
use crate::core::{Ty, TyBuilder};
use crate::{Error, TraversalOptions};

/// Rewrite a type bottom-up.
///
/// Children are transformed before their parent. A node is rebuilt only when
/// at least one of its children reports a change; otherwise the callback sees
/// the original node. The callback runs exactly once per node and returns the
/// replacement together with whether it changed anything.
///
/// Returns the rewritten type and whether any callback reported a change.
///
/// # Example
///
/// ```
/// use fedtypes_types::{BoxBuilder, Dtype, Ty, TyKind, transform_postorder};
///
/// let b = BoxBuilder::new();
/// let ty = Ty::sequence(&b, Ty::scalar(&b, Dtype::Float32));
///
/// let (out, changed) = transform_postorder(&b, ty, |ty| match ty.kind() {
///     TyKind::Tensor { dtype: Dtype::Float32, shape } => {
///         (Ty::tensor(&b, Dtype::Int32, shape.clone()), true)
///     }
///     _ => (ty, false),
/// })
/// .unwrap();
///
/// assert!(changed);
/// assert_eq!(out, Ty::sequence(&b, Ty::scalar(&b, Dtype::Int32)));
/// ```
pub fn transform_postorder<B, F>(
    builder: &B,
    ty: Ty<B>,
    mut transform_fn: F,
) -> Result<(Ty<B>, bool), Error>
where
    B: TyBuilder,
    F: FnMut(Ty<B>) -> (Ty<B>, bool),
{
    try_transform_postorder(builder, ty, TraversalOptions::default(), |ty| {
        Ok::<_, Error>(transform_fn(ty))
    })
}

/// Fallible form of [`transform_postorder`].
///
/// The first error returned by `transform_fn` aborts the walk; nodes not yet
/// reached are never passed to the callback.
pub fn try_transform_postorder<B, F, E>(
    builder: &B,
    ty: Ty<B>,
    options: TraversalOptions,
    transform_fn: F,
) -> Result<(Ty<B>, bool), E>
where
    B: TyBuilder,
    F: FnMut(Ty<B>) -> Result<(Ty<B>, bool), E>,
    E: From<Error>,
{
    drive_fold(
        builder,
        ty,
        PostorderTransform {
            transform_fn,
            options,
        },
    )
}

struct PostorderTransform<F> {
    transform_fn: F,
    options: TraversalOptions,
}

impl<B, F, E> Fold<B> for PostorderTransform<F>
where
    B: TyBuilder,
    F: FnMut(Ty<B>) -> Result<(Ty<B>, bool), E>,
    E: From<Error>,
{
    type Output = (Ty<B>, bool);
    type Error = E;

    fn visit(&mut self, _builder: &B, _ty: &Ty<B>) -> Result<FoldStep<Self::Output>, E> {
        Ok(FoldStep::Recurse)
    }

    fn combine(
        &mut self,
        builder: &B,
        ty: &Ty<B>,
        children: impl ExactSizeIterator<Item = Self::Output> + DoubleEndedIterator,
    ) -> Result<Self::Output, E> {
        // Every child is consumed; one change does not stop the others.
        let (children, any_child_changed) = children.fold(
            (SmallVec::<[Ty<B>; 2]>::new(), false),
            |(mut acc, any_changed), (child, changed)| {
                acc.push(child);
                (acc, any_changed || changed)
            },
        );

        let candidate = if any_child_changed {
            tracing::trace!(
                variant = ty.kind().variant_name(),
                "rebuilding node with transformed children"
            );
            ty.kind().with_children(builder, children)?.alloc(builder)
        } else {
            ty.clone()
        };

        let (out, changed) = if self.options.verify_unchanged {
            let (out, changed) = (self.transform_fn)(candidate.clone())?;
            if !changed && !out.ptr_eq(&candidate) && out != candidate {
                tracing::debug!(
                    input = candidate.kind().variant_name(),
                    output = out.kind().variant_name(),
                    "callback altered a node it reported as unchanged"
                );
                return Err(Error::CallableContractViolation(format!(
                    "`{}` node reported unchanged but was replaced by a different `{}` node",
                    candidate.kind().variant_name(),
                    out.kind().variant_name(),
                ))
                .into());
            }
            (out, changed)
        } else {
            (self.transform_fn)(candidate)?
        };

        if changed {
            tracing::trace!(variant = out.kind().variant_name(), "callback reported a change");
        }
        Ok((out, changed || any_child_changed))
    }
}
