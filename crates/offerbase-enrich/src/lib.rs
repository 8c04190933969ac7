//! Chat-completion enrichment of discount records.
//!
//! Sends each record to a Groq-compatible chat-completion endpoint with a
//! fixed-schema re-classification prompt and parses the JSON object the
//! model returns. Rate limits rotate through a model list carried in an
//! explicit [`ModelRotation`] value; transient failures retry a bounded
//! number of times with a linear backoff, and on exhaustion the original
//! record is kept and the failure is only logged.

pub mod client;
pub mod enrich;
pub mod error;
pub mod prompt;
pub mod rotation;
mod types;

pub use client::EnrichClient;
pub use enrich::{enrich_batch, enrich_record, EnrichReport, EnrichSettings};
pub use error::EnrichError;
pub use prompt::system_prompt;
pub use rotation::ModelRotation;
