//! rowdeck core library
//!
//! In-memory state core for a table editor seeded once from a remote
//! read-only dataset: the row collection and its mutation contracts, the
//! incremental reveal window, validated form sessions, and the simulated
//! submit latency. Presentation is left to a shell crate.

pub mod error;
pub mod form;
pub mod model;
pub mod seed;
pub mod source;
pub mod store;
pub mod submit;
pub mod window;

pub use store::RowStore;
pub use store::StoreCommand;
pub use window::WindowController;
