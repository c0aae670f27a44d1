//! Domain layer: the footprint estimator and the tree store ledger.

pub mod catalog;
pub mod errors;
pub mod footprint;
pub mod store;

pub use catalog::TreeType;
pub use errors::{Result, StoreError};
pub use footprint::FootprintService;
pub use store::{LedgerStore, TreeStore};
