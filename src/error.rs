// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Errors returned by the index and its occurrence chains.

/// Error returned to callers of the index and chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The key is not in the index, or the value is not in the chain.
    #[error("not found")]
    NotFound,
}

/// A broken structural invariant, reported by `Index::validate`.
///
/// None of these can be observed after a public call returns unless the
/// index itself has a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    /// A key is not strictly between the keys of its neighbours.
    #[error("keys are not in strictly ascending order")]
    Unordered,
    /// Subtree heights differ by more than one.
    #[error("node is unbalanced (balance factor {balance})")]
    Unbalanced { balance: i32 },
    /// The stored height disagrees with the children.
    #[error("stored height {stored} does not match computed height {expected}")]
    HeightMismatch { stored: i32, expected: i32 },
    /// A node is holding no occurrences.
    #[error("node has an empty occurrence chain")]
    EmptyChain,
}
