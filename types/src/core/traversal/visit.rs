use alloc::{vec, vec::Vec};

use crate::core::{Ty, TyBuilder};

/// A top-down walk over a type tree.
///
/// `enter` sees every node before any of its children and returns the
/// context handed to those children. Every child of a node receives its own
/// clone of that same context, so nothing a subtree does to its context is
/// visible to its siblings.
pub trait PreorderVisitor<B: TyBuilder> {
    type Context: Clone;
    type Error;

    fn enter(
        &mut self,
        builder: &B,
        ty: &Ty<B>,
        context: Self::Context,
    ) -> Result<Self::Context, Self::Error>;
}

/// Drive a preorder walk using stack-based iteration.
///
/// Children are visited in definition order (see [`crate::TyKind::children`]).
/// The first error returned by the visitor aborts the walk.
pub fn drive_preorder<B, V>(
    builder: &B,
    root: Ty<B>,
    visitor: &mut V,
    context: V::Context,
) -> Result<(), V::Error>
where
    B: TyBuilder,
    V: PreorderVisitor<B>,
{
    tracing::trace!(root = root.kind().variant_name(), "drive_preorder");

    let mut stack: Vec<(Ty<B>, V::Context)> = vec![(root, context)];

    while let Some((ty, context)) = stack.pop() {
        let context = visitor.enter(builder, &ty, context)?;
        // Pushed in reverse so they pop in definition order.
        stack.extend(
            ty.kind()
                .children()
                .rev()
                .map(|child| (child.clone(), context.clone())),
        );
    }

    Ok(())
}
