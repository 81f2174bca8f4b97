//! Catalog agent: question normalization, intent routing and the service
//! facade that owns the active catalog.
//!
//! ```text
//! ingest(rows) ──> RecordIndexer ──> ActiveCatalog (swapped in atomically)
//! answer(q)    ──> QueryNormalizer ──> IntentRouter ──> AnswerStrategy
//! ```

pub mod normalizer;
pub mod parser;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use normalizer::QueryNormalizer;
pub use parser::{parse_router_output, RouterOutput};
pub use router::{IntentRouter, RouterOutcome, RouterState};
pub use service::{AnswerOutcome, CatalogService, CatalogStatus};
pub use session::{RouterSession, RouterStep};
