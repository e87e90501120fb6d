//! Context documents handed to the language model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

categorical! {
    DocType("doc_type") {
        ComprehensiveProfile => "comprehensive_profile",
        ThematicInsight => "thematic_insight",
    }
}

/// One line of the JSONL context file.
///
/// Exactly one of `customer_id` / `theme` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub doc_type: DocType,
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ContextDocument {
    pub fn for_customer(customer_id: impl Into<String>, content: String, metadata: Map<String, Value>) -> Self {
        Self {
            customer_id: Some(customer_id.into()),
            theme: None,
            doc_type: DocType::ComprehensiveProfile,
            content,
            metadata,
        }
    }

    pub fn for_theme(theme: impl Into<String>, content: String, metadata: Map<String, Value>) -> Self {
        Self {
            customer_id: None,
            theme: Some(theme.into()),
            doc_type: DocType::ThematicInsight,
            content,
            metadata,
        }
    }

    /// Customer id or theme, whichever keys this document
    pub fn key(&self) -> &str {
        self.customer_id
            .as_deref()
            .or(self.theme.as_deref())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_customer_document_json_shape() {
        let mut metadata = Map::new();
        metadata.insert("risk_level".to_string(), json!("low"));
        let doc = ContextDocument::for_customer("HC-1000", "profile".to_string(), metadata);

        let line = serde_json::to_string(&doc).unwrap();
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["customer_id"], "HC-1000");
        assert_eq!(value["doc_type"], "comprehensive_profile");
        assert!(value.get("theme").is_none());
        assert_eq!(value["metadata"]["risk_level"], "low");
        assert_eq!(doc.key(), "HC-1000");
    }

    #[test]
    fn test_theme_document_key() {
        let doc = ContextDocument::for_theme("ehr_integration", "insight".to_string(), Map::new());
        assert_eq!(doc.key(), "ehr_integration");
        assert_eq!(doc.doc_type, DocType::ThematicInsight);
    }
}
