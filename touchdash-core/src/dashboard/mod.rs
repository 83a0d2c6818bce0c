//! Dashboard state and serial ingestion

mod ingest;
mod state;

pub use ingest::{IngestReport, IngestStats, MalformedPolicy, SerialIngestor};
pub use state::DashboardState;
