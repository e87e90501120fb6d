//! Presentation core
//!
//! Loads the flat files once, then serves chart series, headline metrics,
//! quick insights and chat turns. Rendering is left to the caller.

pub mod charts;
pub mod chat;
pub mod insights;

pub use charts::{
    churn_trend, ehr_integration, expansion_funnel, health_distribution, mrr_by_risk, segment_health,
    support_topics, Bar, ChurnWeek, EhrIntegrationRow, FunnelStage, HeadlineMetrics, SegmentHealth,
};
pub use chat::{prompt, ChatError, ChatResult, ChatSession, ContextScope, Role, Turn};
pub use insights::{InsightCard, QuickInsights, STARTER_QUESTIONS};

use crate::context::ContextBuilder;
use crate::generate::SyntheticDataset;
use crate::model::{ContextDocument, Customer};
use crate::persistence::{
    read_csv, read_csv_optional, read_documents, DataLayout, PersistenceError, CALLS_FILE, CUSTOMERS_FILE,
    FEATURE_REQUESTS_FILE, INTERACTIONS_FILE,
};
use tracing::{info, warn};

/// Everything the dashboard reads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub tables: SyntheticDataset,
    /// Empty when no context documents have been built
    pub documents: Vec<ContextDocument>,
}

/// Outcome of [`DashboardData::load`]
#[derive(Debug, Default)]
pub struct LoadReport {
    /// `None` when a required table could not be read
    pub data: Option<DashboardData>,
    /// One message per problem, in file order
    pub errors: Vec<String>,
}

impl LoadReport {
    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }
}

impl DashboardData {
    /// Customers, interactions and calls are required; feature requests and
    /// context documents are read when present.
    pub fn load(layout: &DataLayout) -> LoadReport {
        let mut errors = Vec::new();

        let customers = read_csv(&layout.path(CUSTOMERS_FILE)).map_err(|e| errors.push(e.to_string()));
        let interactions = read_csv(&layout.path(INTERACTIONS_FILE)).map_err(|e| errors.push(e.to_string()));
        let calls = read_csv(&layout.path(CALLS_FILE)).map_err(|e| errors.push(e.to_string()));
        let feature_requests =
            read_csv_optional(&layout.path(FEATURE_REQUESTS_FILE)).map_err(|e| errors.push(e.to_string()));

        // A bad documents file is reported but does not block the tables
        let documents = match read_documents(&layout.documents()) {
            Ok(docs) => docs,
            Err(PersistenceError::MissingFile(_)) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Context documents unreadable");
                errors.push(e.to_string());
                Vec::new()
            }
        };

        let data = match (customers, interactions, calls, feature_requests) {
            (Ok(customers), Ok(interactions), Ok(calls), Ok(feature_requests)) => Some(DashboardData {
                tables: SyntheticDataset {
                    customers,
                    interactions,
                    calls,
                    feature_requests,
                },
                documents,
            }),
            _ => None,
        };

        match &data {
            Some(d) => info!(
                customers = d.tables.customers.len(),
                documents = d.documents.len(),
                "Dashboard data loaded"
            ),
            None => warn!(errors = errors.len(), dir = %layout.dir().display(), "Dashboard running without data"),
        }

        LoadReport { data, errors }
    }

    pub fn context(&self) -> ContextBuilder<'_> {
        ContextBuilder::new(&self.tables)
    }

    pub fn metrics(&self) -> HeadlineMetrics {
        HeadlineMetrics::compute(&self.tables.customers)
    }

    pub fn insights(&self) -> QuickInsights {
        QuickInsights::compute(&self.tables.customers)
    }

    /// Customers ordered by health, lowest first, for the scope picker
    pub fn customers_by_health(&self) -> Vec<&Customer> {
        let mut customers: Vec<&Customer> = self.tables.customers.iter().collect();
        customers.sort_by_key(|c| c.health_score);
        customers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{GeneratorConfig, SyntheticGenerator};
    use crate::persistence::write_documents;
    use tempfile::TempDir;

    fn layout_with_data(temp_dir: &TempDir) -> DataLayout {
        let layout = DataLayout::new(temp_dir.path());
        let data = SyntheticGenerator::new(GeneratorConfig {
            customers: 6,
            ..GeneratorConfig::default()
        })
        .generate();
        layout.write_dataset(&data).unwrap();
        layout
    }

    #[test]
    fn test_missing_directory_reports_every_required_file() {
        let temp_dir = TempDir::new().unwrap();
        let report = DashboardData::load(&DataLayout::new(temp_dir.path().join("nowhere")));
        assert!(!report.is_loaded());
        assert_eq!(report.errors.len(), 3);
        assert!(report.errors[0].contains(CUSTOMERS_FILE));
    }

    #[test]
    fn test_loads_without_documents() {
        let temp_dir = TempDir::new().unwrap();
        let report = DashboardData::load(&layout_with_data(&temp_dir));
        assert!(report.errors.is_empty());
        let data = report.data.unwrap();
        assert_eq!(data.tables.customers.len(), 6);
        assert!(data.documents.is_empty());
    }

    #[test]
    fn test_missing_calls_blocks_data() {
        let temp_dir = TempDir::new().unwrap();
        let layout = layout_with_data(&temp_dir);
        std::fs::remove_file(layout.path(CALLS_FILE)).unwrap();

        let report = DashboardData::load(&layout);
        assert!(report.data.is_none());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_documents_are_loaded() {
        let temp_dir = TempDir::new().unwrap();
        let layout = layout_with_data(&temp_dir);
        let tables = layout.read_dataset().unwrap();
        let docs = ContextBuilder::new(&tables).build_documents();
        write_documents(&layout.documents(), &docs).unwrap();

        let data = DashboardData::load(&layout).data.unwrap();
        assert_eq!(data.documents, docs);
        let scores: Vec<u8> = data.customers_by_health().iter().map(|c| c.health_score).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    }
}
