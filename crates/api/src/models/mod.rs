//! Domain models for the inventory API.
//!
//! These types represent validated domain objects, separate from database
//! row types and from the JSON request/response shapes.

pub mod product;
pub mod stock;
pub mod store;
pub mod user;

pub use product::{Product, ProductDraft, ProductInput};
pub use stock::{StockEntry, StockUpdate};
pub use store::{Store, StoreDraft, StoreInput};
pub use user::{ApiUser, NewCredentials};

/// Whether an upsert created a row or rewrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Inserted,
    Updated,
}

impl WriteOutcome {
    /// Map the `(xmax = 0)` flag returned by an upsert.
    #[must_use]
    pub const fn from_inserted(inserted: bool) -> Self {
        if inserted { Self::Inserted } else { Self::Updated }
    }
}

/// A record returned by an upsert together with what the upsert did.
#[derive(Debug, Clone)]
pub struct Written<T> {
    pub record: T,
    pub outcome: WriteOutcome,
}
