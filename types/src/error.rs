//! Errors raised by coercion and traversal.
//!
//! Every error aborts the call that raised it: a failing traversal never
//! hands back a partially rewritten tree.

use alloc::string::String;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input is not a type and cannot be coerced into one, or a node was
    /// rebuilt with the wrong number of children.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A raw node names a variant outside the closed set of type variants.
    #[error("unsupported type variant `{tag}`")]
    UnsupportedVariant { tag: String },

    /// A traversal callback returned something its contract forbids.
    #[error("callback contract violated: {0}")]
    CallableContractViolation(String),
}
