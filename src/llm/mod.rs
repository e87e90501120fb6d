//! Language model boundary
//!
//! Prompt in, completion text out. The provider, model and credential come
//! from the environment (a `.env` file is honoured); generation settings are
//! fixed.

pub mod client;

pub use client::LlmClient;

use async_trait::async_trait;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    #[error("LLM API error: {0}")]
    Api(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Missing credential: set {0}")]
    MissingCredential(&'static str),
}

pub type LlmResult<T> = Result<T, LlmError>;

pub const PROVIDER_VAR: &str = "CAREINSIGHT_LLM_PROVIDER";
pub const MODEL_VAR: &str = "CAREINSIGHT_LLM_MODEL";
pub const BASE_URL_VAR: &str = "CAREINSIGHT_LLM_BASE_URL";

/// Instruction sent with every request
pub const SYSTEM_INSTRUCTION: &str = "You are an elite Customer Success Intelligence AI specializing in Healthcare SaaS products.

Your expertise includes:
- Healthcare workflows (scheduling, billing, EHR integration, patient engagement)
- Compliance requirements (HIPAA, HITECH, state privacy laws)
- Provider pain points and challenges
- Financial pressures in healthcare organizations
- Key stakeholders (Practice Managers, CMOs, CFOs, IT Directors)

When analyzing customers, you:
1. Understand context from multiple data sources
2. Identify specific, actionable insights
3. Prioritize based on business impact
4. Provide clear recommendations with reasoning
5. Consider patient care impact and compliance risks

Communication style:
- Concise but thorough
- Evidence-based (cite specific data points)
- Action-oriented (always include next steps)
- Healthcare terminology when appropriate
- Empathetic to customer challenges";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    #[default]
    Gemini,
    OpenAI,
    Ollama,
}

impl LlmProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini-2.5-flash-lite-preview-06-17",
            LlmProvider::OpenAI => "gpt-4o-mini",
            LlmProvider::Ollama => "llama3",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            LlmProvider::OpenAI => "https://api.openai.com/v1",
            LlmProvider::Ollama => "http://localhost:11434",
        }
    }

    /// Environment variable holding the API key; Ollama needs none
    pub fn credential_var(&self) -> Option<&'static str> {
        match self {
            LlmProvider::Gemini => Some("GEMINI_API_KEY"),
            LlmProvider::OpenAI => Some("OPENAI_API_KEY"),
            LlmProvider::Ollama => None,
        }
    }
}

impl FromStr for LlmProvider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "" => Ok(LlmProvider::Gemini),
            "openai" => Ok(LlmProvider::OpenAI),
            "ollama" => Ok(LlmProvider::Ollama),
            other => Err(LlmError::Config(format!("Unknown provider: {other}"))),
        }
    }
}

/// Sampling settings; constant for every request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_k: 20,
            top_p: 0.95,
            max_output_tokens: 4096,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub system_instruction: String,
    pub settings: GenerationSettings,
}

impl LlmConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> LlmResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; fails when the provider needs a credential that is absent
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LlmResult<Self> {
        let provider: LlmProvider = lookup(PROVIDER_VAR).unwrap_or_default().parse()?;
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = match provider.credential_var() {
            Some(var) => Some(non_empty(var).ok_or(LlmError::MissingCredential(var))?),
            None => None,
        };

        Ok(Self {
            provider,
            model: non_empty(MODEL_VAR).unwrap_or_else(|| provider.default_model().to_string()),
            api_key,
            api_base_url: non_empty(BASE_URL_VAR),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            settings: GenerationSettings::default(),
        })
    }
}

/// Anything that turns a prompt into completion text
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> LlmResult<String>;

    /// Short label for status lines
    fn describe(&self) -> String {
        "model".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_gemini_is_default() {
        let config = LlmConfig::from_lookup(env(&[("GEMINI_API_KEY", "abc")])).unwrap();
        assert_eq!(config.provider, LlmProvider::Gemini);
        assert_eq!(config.model, "gemini-2.5-flash-lite-preview-06-17");
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.settings.max_output_tokens, 4096);
        assert_eq!(config.settings.top_k, 20);
    }

    #[test]
    fn test_missing_credential() {
        assert_eq!(
            LlmConfig::from_lookup(env(&[])).unwrap_err(),
            LlmError::MissingCredential("GEMINI_API_KEY")
        );
        assert_eq!(
            LlmConfig::from_lookup(env(&[(PROVIDER_VAR, "openai"), ("OPENAI_API_KEY", "  ")])).unwrap_err(),
            LlmError::MissingCredential("OPENAI_API_KEY")
        );
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = LlmConfig::from_lookup(env(&[
            (PROVIDER_VAR, "Ollama"),
            (MODEL_VAR, "mistral"),
            (BASE_URL_VAR, "http://gpu-box:11434"),
        ]))
        .unwrap();
        assert_eq!(config.provider, LlmProvider::Ollama);
        assert_eq!(config.model, "mistral");
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_base_url.as_deref(), Some("http://gpu-box:11434"));
    }

    #[test]
    fn test_unknown_provider() {
        assert!(matches!(
            LlmConfig::from_lookup(env(&[(PROVIDER_VAR, "watson")])),
            Err(LlmError::Config(_))
        ));
    }
}
