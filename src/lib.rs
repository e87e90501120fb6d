//! CareInsight
//!
//! Customer-success analytics for a healthcare SaaS portfolio: synthetic
//! customer data, narrative artifacts, retrieval context documents and a
//! chat front end over a language model.
//!
//! # Pipeline
//!
//! Each stage reads the previous stage's flat-file output:
//!
//! 1. [`generate`] produces the customer, interaction, call and feature
//!    request tables (plus daily usage telemetry) from a seed.
//! 2. [`narrative`] expands them into call transcripts, email threads,
//!    survey verbatims and outcome records.
//! 3. [`context`] builds one profile document per customer and the
//!    cross-customer thematic documents.
//! 4. [`dashboard`] loads everything for charts, quick insights and chat.
//!
//! ## Example Usage
//!
//! ```rust
//! use careinsight::context::ContextBuilder;
//! use careinsight::generate::{GeneratorConfig, SyntheticGenerator};
//!
//! let config = GeneratorConfig { customers: 5, ..GeneratorConfig::default() };
//! let tables = SyntheticGenerator::new(config).generate();
//! assert_eq!(tables.customers.len(), 5);
//!
//! let docs = ContextBuilder::new(&tables).build_documents();
//! assert!(docs.len() >= 5);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod dashboard;
pub mod generate;
pub mod llm;
pub mod model;
pub mod narrative;
pub mod persistence;
pub mod sampling;

// Re-export main types for convenience
pub use context::{ContextBuilder, ContextError, ContextResult, PortfolioSummary, RiskAssessment, RiskLevel};
pub use dashboard::{ChatError, ChatSession, ContextScope, DashboardData, LoadReport};
pub use generate::{GeneratorConfig, SyntheticDataset, SyntheticGenerator};
pub use llm::{CompletionModel, LlmClient, LlmConfig, LlmError, LlmProvider, LlmResult};
pub use model::{Call, ContextDocument, Customer, FeatureRequest, Interaction, UsageTelemetry};
pub use narrative::{NarrativeDataset, NarrativeGenerator};
pub use persistence::{DataLayout, PersistenceError, PersistenceResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
