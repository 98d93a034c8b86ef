//! Generic fold (catamorphism) for type traversal and transformation.
//!
//! The `Fold` trait provides a stack-based visitor pattern that can:
//! - Transform types (`Output = (Ty<B>, bool)`, see [`crate::algo::transform_postorder`])
//! - Collect information (`Output = HashSet<PlacementLiteral>`)
//! - Perform side effects (`Output = ()`)

use alloc::{vec, vec::Vec};

use crate::core::{Ty, TyBuilder};

/// Control flow for the fold traversal.
///
/// - `Recurse`: Process children, then call `combine`
/// - `Done(out)`: Skip children, push `out` to results stack
pub enum FoldStep<Output> {
    /// Continue into children, then combine results.
    Recurse,
    /// Finished with this node, prune children (push to results stack).
    Done(Output),
}

/// A fold (catamorphism) over types.
///
/// The `Output` type determines what kind of fold this is:
/// - `(Ty<B>, bool)` for change-tracking type transformations
/// - `()` for side-effect-only traversals
/// - Any other type for computing values
pub trait Fold<B: TyBuilder> {
    type Output;
    type Error;

    /// Called before processing a type's children.
    ///
    /// Return:
    /// - `FoldStep::Recurse` to process children and call `combine`
    /// - `FoldStep::Done(out)` to skip children and use `out` as result
    fn visit(&mut self, builder: &B, ty: &Ty<B>) -> Result<FoldStep<Self::Output>, Self::Error>;

    /// Called after all children have been processed.
    ///
    /// `children` contains results from child types in definition order:
    /// - `Sequence`, `Federated`: `[member]`
    /// - `Function`: `[param, result]`, or `[result]` without a param
    /// - `Struct`: `[element0, element1, ...]`
    /// - Leaves (Tensor, Abstract, Placement): `[]`
    fn combine(
        &mut self,
        builder: &B,
        ty: &Ty<B>,
        children: impl ExactSizeIterator<Item = Self::Output> + DoubleEndedIterator,
    ) -> Result<Self::Output, Self::Error>;
}

enum Task<B: TyBuilder> {
    Visit(Ty<B>),
    Combine(usize, Ty<B>),
}

/// Drive a fold over a type tree using stack-based iteration.
///
/// This avoids stack overflow for deeply nested types. The first error
/// returned by the folder aborts the traversal.
pub fn drive_fold<B, F>(builder: &B, root: Ty<B>, mut folder: F) -> Result<F::Output, F::Error>
where
    B: TyBuilder,
    F: Fold<B>,
{
    tracing::trace!(root = root.kind().variant_name(), "drive_fold");

    let mut stack = vec![Task::<B>::Visit(root)];
    let mut results: Vec<F::Output> = Vec::new();

    while let Some(task) = stack.pop() {
        match task {
            Task::Visit(ty) => match folder.visit(builder, &ty)? {
                FoldStep::Done(out) => {
                    results.push(out);
                }
                FoldStep::Recurse => {
                    let children = ty.kind().children();
                    stack.push(Task::Combine(children.len(), ty.clone()));
                    stack.extend(children.rev().map(|child| Task::Visit(child.clone())));
                }
            },
            Task::Combine(count, ty) => {
                let start = results
                    .len()
                    .checked_sub(count)
                    .expect("Bug: result stack underflow");
                let children = results.drain(start..);
                let out = folder.combine(builder, &ty, children)?;
                results.push(out);
            }
        }
    }

    debug_assert_eq!(
        results.len(),
        1,
        "Algorithm bug: expected exactly one result"
    );
    Ok(results.pop().expect("empty result stack"))
}
