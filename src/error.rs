use thiserror::Error;

/// Errors surfaced by [`Tree`][crate::Tree] operations.
///
/// Reaching the edge of the tree (no minimum in an empty tree, no successor of the largest key,
/// etc.) is never an error. Those outcomes are `None`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The node passed in was not obtained from the tree it was passed to.
    #[error("node does not belong to this tree")]
    ForeignNode,
}
