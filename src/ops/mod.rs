//! Admission-controlled lifecycle operation state.
//!
//! Two stores make up the only mutable shared state in the crate: the
//! per-service [`OperationRegistry`] and the process-wide [`BulkCoordinator`]
//! singleton. Neither performs network calls — they are check-and-set
//! admission control wrapped around externally supplied async actions by
//! [`StatusStore`](crate::store::StatusStore).

mod bulk;
mod registry;

pub use bulk::{BulkCoordinator, BulkOperation};
pub use registry::OperationRegistry;
