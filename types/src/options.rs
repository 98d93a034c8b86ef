/// Knobs for [`crate::algo::try_transform_postorder`].
///
/// The defaults match [`crate::algo::transform_postorder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Reject a callback that reports `changed = false` while returning a
    /// type that is not structurally equal to its input.
    ///
    /// Costs one structural comparison per node whose output is not the
    /// input node itself. The comparison runs on an explicit stack and skips
    /// shared subtrees, so it is safe at any depth.
    pub verify_unchanged: bool,
}

impl TraversalOptions {
    pub fn with_verify_unchanged(mut self, verify: bool) -> Self {
        self.verify_unchanged = verify;
        self
    }
}
