//! Error types

mod load;
mod store;
mod validation;

pub use load::*;
pub use store::*;
pub use validation::*;

/// Umbrella error for callers that do not discriminate between kinds.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The seed dataset could not be read.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The store rejected an operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A form session rejected its input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
