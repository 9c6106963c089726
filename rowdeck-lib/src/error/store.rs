//! Store error types

/// Errors from structural invariant enforcement in the row store.
///
/// Field-level validation never reaches the store; these errors cover misuse
/// of the store's own contracts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A row with this id already exists in the collection.
    #[error("Row id '{id}' already exists")]
    DuplicateId {
        /// The offending identifier.
        id: String,
    },

    /// A mutation arrived while the initial load was still pending.
    #[error("Cannot mutate rows while the initial load is pending")]
    LoadInFlight,

    /// The single-shot load was requested more than once this session.
    #[error("The initial load already started for this session")]
    AlreadyStarted,
}

impl StoreError {
    /// Creates a new duplicate-id error.
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }
}
