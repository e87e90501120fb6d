//! JSONL context documents

use super::{DataLayout, PersistenceError, PersistenceResult, SAMPLE_DOCUMENTS};
use crate::model::ContextDocument;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// One document per line, in order
pub fn write_documents(path: &Path, docs: &[ContextDocument]) -> PersistenceResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for (idx, doc) in docs.iter().enumerate() {
        serde_json::to_writer(&mut writer, doc).map_err(|source| PersistenceError::Json {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    info!(path = %path.display(), documents = docs.len(), "Wrote context documents");
    Ok(())
}

/// Blank lines are skipped
pub fn read_documents(path: &Path) -> PersistenceResult<Vec<ContextDocument>> {
    if !path.exists() {
        return Err(PersistenceError::MissingFile(path.to_path_buf()));
    }
    let reader = BufReader::new(File::open(path)?);
    let mut docs = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc = serde_json::from_str(&line).map_err(|source| PersistenceError::Json {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        docs.push(doc);
    }
    Ok(docs)
}

/// Raw content of the first few documents as `sample_rag_doc_<n>.txt`
pub fn write_samples(layout: &DataLayout, docs: &[ContextDocument]) -> PersistenceResult<usize> {
    let mut written = 0;
    for (idx, doc) in docs.iter().take(SAMPLE_DOCUMENTS).enumerate() {
        std::fs::write(layout.sample(idx + 1), &doc.content)?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};
    use tempfile::TempDir;

    fn docs(n: usize) -> Vec<ContextDocument> {
        (0..n)
            .map(|i| {
                let mut metadata = Map::new();
                metadata.insert("health_score".to_string(), json!(50 + i));
                ContextDocument::for_customer(format!("HC-{}", 1000 + i), format!("profile {i}\n\"quoted\""), metadata)
            })
            .collect()
    }

    #[test]
    fn test_one_document_per_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("docs.jsonl");
        let written = docs(4);

        write_documents(&path, &written).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 4);
        assert_eq!(read_documents(&path).unwrap(), written);
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("docs.jsonl");
        write_documents(&path, &docs(1)).unwrap();
        let mut raw = std::fs::read_to_string(&path).unwrap();
        raw.push_str("\n{not json\n");
        std::fs::write(&path, raw).unwrap();

        match read_documents(&path) {
            Err(PersistenceError::Json { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected Json error, got {other:?}"),
        }
    }

    #[test]
    fn test_samples_cover_first_three() {
        let temp_dir = TempDir::new().unwrap();
        let layout = DataLayout::new(temp_dir.path());
        let written = docs(5);

        assert_eq!(write_samples(&layout, &written).unwrap(), 3);
        assert_eq!(std::fs::read_to_string(layout.sample(1)).unwrap(), written[0].content);
        assert!(layout.sample(3).exists());
        assert!(!layout.sample(4).exists());
    }
}
