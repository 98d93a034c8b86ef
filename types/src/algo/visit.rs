use core::marker::PhantomData;

use crate::Error;
use crate::coerce::ToType;
use crate::core::traversal::{PreorderVisitor, drive_preorder};
use crate::core::{Ty, TyBuilder};

/// Walk a type top-down, threading a context from parent to children.
///
/// `input` is coerced with [`ToType`] first; if coercion fails the callback is
/// never called. `f` sees each node before its children and returns the
/// context for them. Siblings all receive the context their parent returned,
/// never one produced by another sibling's subtree.
///
/// # Example
///
/// ```
/// use fedtypes_types::{BoxBuilder, Dtype, Ty, visit_preorder};
///
/// let b = BoxBuilder::new();
/// let ty = Ty::sequence(&b, Ty::scalar(&b, Dtype::Int32));
///
/// let mut names = Vec::new();
/// visit_preorder(&b, ty, |ty, ()| names.push(ty.kind().variant_name()), ()).unwrap();
/// assert_eq!(names, ["Sequence", "Tensor"]);
/// ```
pub fn visit_preorder<B, T, C, F>(builder: &B, input: T, mut f: F, context: C) -> Result<(), Error>
where
    B: TyBuilder,
    T: ToType<B>,
    C: Clone,
    F: FnMut(&Ty<B>, C) -> C,
{
    try_visit_preorder(builder, input, |ty: &Ty<B>, context| Ok::<_, Error>(f(ty, context)), context)
}

/// Fallible form of [`visit_preorder`]. The first error aborts the walk.
pub fn try_visit_preorder<B, T, C, F, E>(
    builder: &B,
    input: T,
    f: F,
    context: C,
) -> Result<(), E>
where
    B: TyBuilder,
    T: ToType<B>,
    C: Clone,
    F: FnMut(&Ty<B>, C) -> Result<C, E>,
    E: From<Error>,
{
    let root = input.to_type(builder)?;
    let mut visitor = ClosureVisitor {
        enter: f,
        _context: PhantomData,
    };
    drive_preorder(builder, root, &mut visitor, context)
}

struct ClosureVisitor<F, C> {
    enter: F,
    _context: PhantomData<fn(C) -> C>,
}

impl<B, C, F, E> PreorderVisitor<B> for ClosureVisitor<F, C>
where
    B: TyBuilder,
    C: Clone,
    F: FnMut(&Ty<B>, C) -> Result<C, E>,
{
    type Context = C;
    type Error = E;

    fn enter(&mut self, _builder: &B, ty: &Ty<B>, context: C) -> Result<C, E> {
        (self.enter)(ty, context)
    }
}
