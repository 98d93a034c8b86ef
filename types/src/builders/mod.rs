//! Type builder implementations for different storage strategies.
//!
//! - [`ArenaBuilder`]: Arena-based allocation with identifier interning
//! - [`BoxBuilder`]: RC-based allocation without interning, suitable for simpler use cases

mod arena_builder;
mod box_builder;

pub use arena_builder::{ArenaBuilder, InternedStr};
pub use box_builder::{BoxBuilder, BoxTy};

use crate::core::Ty;

// Arena handles are a single pointer and can be copied freely.
static_assertions::assert_eq_size!(Ty<ArenaBuilder<'static>>, usize);
static_assertions::assert_impl_all!(Ty<ArenaBuilder<'static>>: Copy);
// `Rc`-backed handles stay on the thread that built them.
static_assertions::assert_not_impl_any!(Ty<BoxBuilder>: Send, Sync);
