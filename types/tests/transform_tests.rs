//! Tests for bottom-up type rewriting.

use bumpalo::Bump;
use fedtypes_types::{
    ArenaBuilder, BoxBuilder, ContainerTag, Dtype, Error, Ident, PlacementLiteral, Shape,
    TraversalOptions, Ty, TyBuilder, TyKind, transform_postorder, try_transform_postorder,
};
use pretty_assertions::assert_eq;

/// Runs a generic check once per builder.
macro_rules! with_each_builder {
    ($($name:ident => $check:ident),* $(,)?) => {$(
        mod $name {
            use super::*;

            #[test]
            fn box_builder() {
                $check(&BoxBuilder::new());
            }

            #[test]
            fn arena_builder() {
                let arena = Bump::new();
                $check(&ArenaBuilder::new(&arena));
            }
        }
    )*};
}

fn float_to_int<B: TyBuilder>(b: &B) -> impl FnMut(Ty<B>) -> (Ty<B>, bool) + '_ {
    move |ty| match ty.kind() {
        TyKind::Tensor {
            dtype: Dtype::Float32,
            shape,
        } => (Ty::tensor(b, Dtype::Int32, shape.clone()), true),
        _ => (ty, false),
    }
}

fn label<B: TyBuilder>(ty: &Ty<B>) -> String {
    match ty.kind() {
        TyKind::Abstract(name) => name.to_string(),
        other => other.variant_name().to_string(),
    }
}

// ============================================================================
// Identity and change tracking
// ============================================================================

fn check_identity<B: TyBuilder>(b: &B) {
    let ty = Ty::function(
        b,
        Some(Ty::structure_in(
            b,
            [
                (Some("x"), Ty::scalar(b, Dtype::Float32)),
                (None, Ty::abstract_type(b, "T")),
            ],
            ContainerTag::new(b, "tuple"),
        )),
        Ty::federated(
            b,
            Ty::sequence(b, Ty::placement(b)),
            PlacementLiteral::Clients,
            false,
        ),
    );

    let mut calls = 0;
    let (out, changed) = transform_postorder(b, ty.clone(), |ty| {
        calls += 1;
        (ty, false)
    })
    .unwrap();

    assert!(!changed);
    assert_eq!(out, ty);
    assert!(out.ptr_eq(&ty));
    // Function, Struct, Tensor, Abstract, Federated, Sequence, Placement.
    assert_eq!(calls, 7);
}

fn check_scalar_retype<B: TyBuilder>(b: &B) {
    let (out, changed) =
        transform_postorder(b, Ty::scalar(b, Dtype::Float32), float_to_int(b)).unwrap();

    assert!(changed);
    assert_eq!(out, Ty::scalar(b, Dtype::Int32));
    let TyKind::Tensor { shape, .. } = out.kind() else {
        panic!("expected tensor, got {out:?}");
    };
    assert!(shape.is_scalar());
}

fn check_sequence_retype<B: TyBuilder>(b: &B) {
    let ty = Ty::sequence(b, Ty::scalar(b, Dtype::Float32));

    let (out, changed) = transform_postorder(b, ty, float_to_int(b)).unwrap();

    assert!(changed);
    assert_eq!(out, Ty::sequence(b, Ty::scalar(b, Dtype::Int32)));
}

fn check_shape_preserved<B: TyBuilder>(b: &B) {
    let shape = Shape::from_dims(b, [None, Some(28), Some(28)]);
    let ty = Ty::tensor(b, Dtype::Float32, shape.clone());

    let (out, _) = transform_postorder(b, ty, float_to_int(b)).unwrap();

    assert_eq!(out, Ty::tensor(b, Dtype::Int32, shape));
}

fn check_root_change_propagates<B: TyBuilder>(b: &B) {
    let ty = Ty::sequence(b, Ty::abstract_type(b, "T"));

    let (out, changed) = transform_postorder(b, ty, |ty| match ty.kind() {
        TyKind::Sequence(member) => (
            Ty::federated(b, member.clone(), PlacementLiteral::Server, true),
            true,
        ),
        _ => (ty, false),
    })
    .unwrap();

    assert!(changed);
    assert_eq!(
        out,
        Ty::federated(b, Ty::abstract_type(b, "T"), PlacementLiteral::Server, true)
    );
}

fn check_leaf_change_propagates<B: TyBuilder>(b: &B) {
    let ty = Ty::structure(
        b,
        [
            (
                Some("deep"),
                Ty::sequence(b, Ty::sequence(b, Ty::scalar(b, Dtype::Float32))),
            ),
            (Some("other"), Ty::scalar(b, Dtype::Bool)),
        ],
    );

    let (out, changed) = transform_postorder(b, ty, float_to_int(b)).unwrap();

    assert!(changed);
    assert_eq!(
        out,
        Ty::structure(
            b,
            [
                (
                    Some("deep"),
                    Ty::sequence(b, Ty::sequence(b, Ty::scalar(b, Dtype::Int32))),
                ),
                (Some("other"), Ty::scalar(b, Dtype::Bool)),
            ],
        )
    );
}

with_each_builder! {
    identity => check_identity,
    scalar_retype => check_scalar_retype,
    sequence_retype => check_sequence_retype,
    shape_preserved => check_shape_preserved,
    root_change_propagates => check_root_change_propagates,
    leaf_change_propagates => check_leaf_change_propagates,
}

// ============================================================================
// Call order and metadata preservation
// ============================================================================

fn check_children_before_parent<B: TyBuilder>(b: &B) {
    let ty = Ty::function(
        b,
        Some(Ty::structure(
            b,
            [
                (Some("a"), Ty::abstract_type(b, "A")),
                (Some("b"), Ty::abstract_type(b, "B")),
            ],
        )),
        Ty::sequence(b, Ty::abstract_type(b, "C")),
    );

    let mut order = Vec::new();
    transform_postorder(b, ty, |ty| {
        order.push(label(&ty));
        (ty, false)
    })
    .unwrap();

    assert_eq!(order, ["A", "B", "Struct", "C", "Sequence", "Function"]);
}

fn check_absent_param_skipped<B: TyBuilder>(b: &B) {
    let ty = Ty::function(b, None, Ty::scalar(b, Dtype::Float32));

    let mut seen = Vec::new();
    let mut retype = float_to_int(b);
    let (out, changed) = transform_postorder(b, ty, |ty| {
        seen.push(label(&ty));
        retype(ty)
    })
    .unwrap();

    assert!(changed);
    assert_eq!(seen, ["Tensor", "Function"]);
    assert_eq!(out, Ty::function(b, None, Ty::scalar(b, Dtype::Int32)));
    assert!(matches!(out.kind(), TyKind::Function { param: None, .. }));
}

fn check_function_param_retyped<B: TyBuilder>(b: &B) {
    let ty = Ty::function(
        b,
        Some(Ty::scalar(b, Dtype::Float32)),
        Ty::scalar(b, Dtype::Bool),
    );

    let (out, changed) = transform_postorder(b, ty, float_to_int(b)).unwrap();

    assert!(changed);
    assert_eq!(
        out,
        Ty::function(
            b,
            Some(Ty::scalar(b, Dtype::Int32)),
            Ty::scalar(b, Dtype::Bool)
        )
    );
}

fn check_struct_metadata<B: TyBuilder>(b: &B) {
    let ty = Ty::structure_in(
        b,
        [
            (Some("a"), Ty::scalar(b, Dtype::Float32)),
            (Some("b"), Ty::placement(b)),
        ],
        ContainerTag::new(b, "OrderedDict"),
    );

    let (out, changed) = transform_postorder(b, ty, float_to_int(b)).unwrap();

    assert!(changed);
    assert_eq!(
        out,
        Ty::structure_in(
            b,
            [
                (Some("a"), Ty::scalar(b, Dtype::Int32)),
                (Some("b"), Ty::placement(b)),
            ],
            ContainerTag::new(b, "OrderedDict"),
        )
    );

    let TyKind::Struct {
        elements,
        container,
    } = out.kind()
    else {
        panic!("expected struct, got {out:?}");
    };
    let names: Vec<_> = elements.names().map(|name| name.map(Ident::as_str)).collect();
    assert_eq!(names, [Some("a"), Some("b")]);
    assert_eq!(container.as_ref().map(ContainerTag::name), Some("OrderedDict"));
}

fn check_federated_metadata<B: TyBuilder>(b: &B) {
    let ty = Ty::federated(
        b,
        Ty::scalar(b, Dtype::Float32),
        PlacementLiteral::Clients,
        true,
    );

    let (out, changed) = transform_postorder(b, ty, float_to_int(b)).unwrap();

    assert!(changed);
    assert_eq!(
        out.kind(),
        &TyKind::Federated {
            member: Ty::scalar(b, Dtype::Int32),
            placement: PlacementLiteral::Clients,
            all_equal: true,
        }
    );
}

with_each_builder! {
    children_before_parent => check_children_before_parent,
    absent_param_skipped => check_absent_param_skipped,
    function_param_retyped => check_function_param_retyped,
    struct_metadata => check_struct_metadata,
    federated_metadata => check_federated_metadata,
}

// ============================================================================
// Errors and options
// ============================================================================

#[derive(Debug, PartialEq)]
enum RewriteError {
    Traversal(Error),
    Unresolved(String),
}

impl From<Error> for RewriteError {
    fn from(err: Error) -> Self {
        RewriteError::Traversal(err)
    }
}

#[test]
fn test_callback_error_type_passes_through() {
    let b = BoxBuilder::new();
    let ty = Ty::structure(
        &b,
        [
            (Some("x"), Ty::abstract_type(&b, "T")),
            (Some("y"), Ty::abstract_type(&b, "U")),
        ],
    );

    let mut seen = Vec::new();
    let result = try_transform_postorder(&b, ty, TraversalOptions::default(), |ty| {
        seen.push(label(&ty));
        match ty.kind() {
            TyKind::Abstract(name) => Err(RewriteError::Unresolved(name.to_string())),
            _ => Ok((ty, false)),
        }
    });

    assert_eq!(result, Err(RewriteError::Unresolved("T".to_string())));
    assert_eq!(seen, ["T"]);
}

#[test]
fn test_verify_unchanged_reports_violation() {
    let arena = Bump::new();
    let b = ArenaBuilder::new(&arena);
    let ty = Ty::structure(&b, [(Some("x"), Ty::scalar(&b, Dtype::Float32))]);
    let options = TraversalOptions::default().with_verify_unchanged(true);

    let mut retype = float_to_int(&b);
    let result = try_transform_postorder(&b, ty, options, |ty| {
        let (out, _) = retype(ty);
        Ok::<_, RewriteError>((out, false))
    });

    assert!(matches!(
        result,
        Err(RewriteError::Traversal(Error::CallableContractViolation(_)))
    ));
}

#[test]
fn test_verify_unchanged_allows_honest_callbacks() {
    let b = BoxBuilder::new();
    let ty = Ty::sequence(&b, Ty::scalar(&b, Dtype::Float32));
    let options = TraversalOptions::default().with_verify_unchanged(true);

    let mut retype = float_to_int(&b);
    let result = try_transform_postorder(&b, ty, options, |ty| Ok::<_, Error>(retype(ty)));

    assert_eq!(
        result,
        Ok((Ty::sequence(&b, Ty::scalar(&b, Dtype::Int32)), true))
    );
}

// ============================================================================
// Depth
// ============================================================================

const DEPTH: usize = 100_000;

fn nested_sequences<B: TyBuilder>(b: &B, leaf: Ty<B>) -> Ty<B> {
    (0..DEPTH).fold(leaf, |ty, _| Ty::sequence(b, ty))
}

fn check_deep_nesting<B: TyBuilder>(b: &B) {
    let ty = nested_sequences(b, Ty::scalar(b, Dtype::Float32));

    let (out, changed) = transform_postorder(b, ty, float_to_int(b)).unwrap();
    assert!(changed);

    let mut depth = 0;
    let mut node = out.clone();
    while let TyKind::Sequence(member) = node.kind() {
        depth += 1;
        node = member.clone();
    }
    assert_eq!(depth, DEPTH);
    assert!(matches!(
        node.kind(),
        TyKind::Tensor {
            dtype: Dtype::Int32,
            ..
        }
    ));

    // Equality walks with an explicit stack too.
    let expected = nested_sequences(b, Ty::scalar(b, Dtype::Int32));
    assert!(out == expected);
    assert!(out != nested_sequences(b, Ty::scalar(b, Dtype::Int64)));
}

fn check_deep_equal_replacement_verifies<B: TyBuilder>(b: &B) {
    let root = nested_sequences(b, Ty::abstract_type(b, "T"));
    let twin = nested_sequences(b, Ty::abstract_type(b, "T"));
    let options = TraversalOptions::default().with_verify_unchanged(true);

    // The root is swapped for a separately built, structurally equal tree.
    let (out, changed) = try_transform_postorder(b, root.clone(), options, |ty| {
        let out = if ty.ptr_eq(&root) { twin.clone() } else { ty };
        Ok::<_, Error>((out, false))
    })
    .unwrap();

    assert!(!changed);
    assert!(out.ptr_eq(&twin));
}

with_each_builder! {
    deep_nesting => check_deep_nesting,
    deep_equal_replacement_verifies => check_deep_equal_replacement_verifies,
}

#[test]
fn test_verify_unchanged_accepts_copy_from_sibling_builder() {
    let arena = Bump::new();
    let first = ArenaBuilder::new(&arena);
    let second = ArenaBuilder::new(&arena);
    let ty = Ty::sequence(&first, Ty::abstract_type(&first, "T"));
    let options = TraversalOptions::default().with_verify_unchanged(true);

    let result = try_transform_postorder(&first, ty, options, |ty| match ty.kind() {
        TyKind::Abstract(_) => Ok::<_, Error>((Ty::abstract_type(&second, "T"), false)),
        _ => Ok((ty, false)),
    });

    let (out, changed) = result.unwrap();
    assert!(!changed);
    assert_eq!(out, Ty::sequence(&second, Ty::abstract_type(&second, "T")));
}
