//! Advisory layer: a pool of external reasoning workers consulted for a
//! non-authoritative veto/confirmation signal.

pub mod pool;
pub mod router;

pub use pool::{AdvisoryWorker, WorkerLease, WorkerPool};
pub use router::{build_pack, AdvisoryRouter, ContextPack, RoutedVerdict};
