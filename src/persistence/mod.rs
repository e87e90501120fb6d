//! Flat-file persistence
//!
//! Every stage reads the previous stage's output from one data directory:
//! CSV tables with a header row and the context documents as JSONL.

pub mod documents;
pub mod tables;

pub use documents::{read_documents, write_documents, write_samples};
pub use tables::{read_csv, read_csv_optional, write_csv};

use crate::generate::SyntheticDataset;
use crate::model::UsageTelemetry;
use crate::narrative::NarrativeDataset;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV encoding or decoding error
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// JSON error on one JSONL line
    #[error("JSON error in {path} line {line}: {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Required input file does not exist
    #[error("Missing file: {0}")]
    MissingFile(PathBuf),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub const CUSTOMERS_FILE: &str = "healthcare_customers.csv";
pub const INTERACTIONS_FILE: &str = "healthcare_interactions.csv";
pub const CALLS_FILE: &str = "healthcare_calls.csv";
pub const FEATURE_REQUESTS_FILE: &str = "healthcare_feature_requests.csv";
pub const TELEMETRY_FILE: &str = "complete_usage_telemetry.csv";
pub const TRANSCRIPTS_FILE: &str = "complete_call_transcripts.csv";
pub const EMAILS_FILE: &str = "complete_email_threads.csv";
pub const SURVEYS_FILE: &str = "complete_survey_verbatims.csv";
pub const OUTCOMES_FILE: &str = "complete_outcomes_tracking.csv";
pub const DOCUMENTS_FILE: &str = "healthcare_rag_documents.jsonl";
pub const SAMPLE_TRANSCRIPT_FILE: &str = "sample_transcript.txt";
pub const SAMPLE_EMAIL_FILE: &str = "sample_email_thread.txt";

/// Number of documents also written as plain-text samples
pub const SAMPLE_DOCUMENTS: usize = 3;

/// File locations under one data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    dir: PathBuf,
}

impl DataLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    pub fn documents(&self) -> PathBuf {
        self.path(DOCUMENTS_FILE)
    }

    /// `sample_rag_doc_<n>.txt`, numbered from 1
    pub fn sample(&self, n: usize) -> PathBuf {
        self.dir.join(format!("sample_rag_doc_{n}.txt"))
    }

    /// Write the four base tables, creating the directory if needed
    pub fn write_dataset(&self, data: &SyntheticDataset) -> PersistenceResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        write_csv(&self.path(CUSTOMERS_FILE), &data.customers)?;
        write_csv(&self.path(INTERACTIONS_FILE), &data.interactions)?;
        write_csv(&self.path(CALLS_FILE), &data.calls)?;
        write_csv(&self.path(FEATURE_REQUESTS_FILE), &data.feature_requests)?;
        info!(
            dir = %self.dir.display(),
            customers = data.customers.len(),
            interactions = data.interactions.len(),
            calls = data.calls.len(),
            feature_requests = data.feature_requests.len(),
            "Wrote base tables"
        );
        Ok(())
    }

    /// Read the base tables; a missing feature-request file reads as empty
    pub fn read_dataset(&self) -> PersistenceResult<SyntheticDataset> {
        Ok(SyntheticDataset {
            customers: read_csv(&self.path(CUSTOMERS_FILE))?,
            interactions: read_csv(&self.path(INTERACTIONS_FILE))?,
            calls: read_csv(&self.path(CALLS_FILE))?,
            feature_requests: read_csv_optional(&self.path(FEATURE_REQUESTS_FILE))?,
        })
    }

    pub fn write_telemetry(&self, rows: &[UsageTelemetry]) -> PersistenceResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        write_csv(&self.path(TELEMETRY_FILE), rows)?;
        info!(rows = rows.len(), "Wrote usage telemetry");
        Ok(())
    }

    pub fn write_narratives(&self, data: &NarrativeDataset) -> PersistenceResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        write_csv(&self.path(TRANSCRIPTS_FILE), &data.transcripts)?;
        write_csv(&self.path(EMAILS_FILE), &data.emails)?;
        write_csv(&self.path(SURVEYS_FILE), &data.surveys)?;
        write_csv(&self.path(OUTCOMES_FILE), &data.outcomes)?;
        if let Some(first) = data.transcripts.first() {
            std::fs::write(self.path(SAMPLE_TRANSCRIPT_FILE), &first.transcript)?;
        }
        if let Some(first) = data.emails.first() {
            std::fs::write(self.path(SAMPLE_EMAIL_FILE), &first.thread_content)?;
        }
        info!(
            transcripts = data.transcripts.len(),
            emails = data.emails.len(),
            surveys = data.surveys.len(),
            outcomes = data.outcomes.len(),
            "Wrote narrative tables"
        );
        Ok(())
    }

    pub fn read_narratives(&self) -> PersistenceResult<NarrativeDataset> {
        Ok(NarrativeDataset {
            transcripts: read_csv(&self.path(TRANSCRIPTS_FILE))?,
            emails: read_csv(&self.path(EMAILS_FILE))?,
            surveys: read_csv(&self.path(SURVEYS_FILE))?,
            outcomes: read_csv(&self.path(OUTCOMES_FILE))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{GeneratorConfig, SyntheticGenerator};
    use crate::narrative::NarrativeGenerator;
    use tempfile::TempDir;

    fn small() -> SyntheticDataset {
        SyntheticGenerator::new(GeneratorConfig {
            customers: 8,
            ..GeneratorConfig::default()
        })
        .generate()
    }

    #[test]
    fn test_dataset_survives_csv() {
        let temp_dir = TempDir::new().unwrap();
        let layout = DataLayout::new(temp_dir.path().join("data"));
        let data = small();

        layout.write_dataset(&data).unwrap();
        assert_eq!(layout.read_dataset().unwrap(), data);
    }

    #[test]
    fn test_missing_customers_file() {
        let temp_dir = TempDir::new().unwrap();
        let layout = DataLayout::new(temp_dir.path());
        match layout.read_dataset() {
            Err(PersistenceError::MissingFile(path)) => assert!(path.ends_with(CUSTOMERS_FILE)),
            other => panic!("expected MissingFile, got {other:?}"),
        }
    }

    #[test]
    fn test_feature_requests_are_optional() {
        let temp_dir = TempDir::new().unwrap();
        let layout = DataLayout::new(temp_dir.path());
        let data = small();
        layout.write_dataset(&data).unwrap();
        std::fs::remove_file(layout.path(FEATURE_REQUESTS_FILE)).unwrap();

        let read = layout.read_dataset().unwrap();
        assert!(read.feature_requests.is_empty());
        assert_eq!(read.customers, data.customers);
    }

    #[test]
    fn test_narratives_survive_csv() {
        let temp_dir = TempDir::new().unwrap();
        let layout = DataLayout::new(temp_dir.path());
        let narratives = NarrativeGenerator::new(7).generate_all(&small());

        layout.write_narratives(&narratives).unwrap();
        assert_eq!(layout.read_narratives().unwrap(), narratives);
    }

    #[test]
    fn test_narrative_samples_hold_first_rows() {
        let temp_dir = TempDir::new().unwrap();
        let layout = DataLayout::new(temp_dir.path());
        let data = SyntheticGenerator::new(GeneratorConfig {
            customers: 40,
            ..GeneratorConfig::default()
        })
        .generate();
        let narratives = NarrativeGenerator::new(7).generate_all(&data);
        layout.write_narratives(&narratives).unwrap();

        let transcript = std::fs::read_to_string(layout.path(SAMPLE_TRANSCRIPT_FILE)).unwrap();
        assert_eq!(transcript, narratives.transcripts[0].transcript);
        let thread = std::fs::read_to_string(layout.path(SAMPLE_EMAIL_FILE)).unwrap();
        assert_eq!(thread, narratives.emails[0].thread_content);
    }

    #[test]
    fn test_empty_narratives_skip_samples() {
        let temp_dir = TempDir::new().unwrap();
        let layout = DataLayout::new(temp_dir.path());
        layout.write_narratives(&NarrativeDataset::default()).unwrap();

        assert!(layout.path(TRANSCRIPTS_FILE).exists());
        assert!(!layout.path(SAMPLE_TRANSCRIPT_FILE).exists());
        assert!(!layout.path(SAMPLE_EMAIL_FILE).exists());
    }
}
