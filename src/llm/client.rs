//! HTTP completion client for Gemini, OpenAI and Ollama

use super::{CompletionModel, GenerationSettings, LlmConfig, LlmError, LlmProvider, LlmResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct LlmClient {
    client: Client,
    config: LlmConfig,
    api_base_url: String,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> LlmResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;

        let api_base_url = config
            .api_base_url
            .clone()
            .unwrap_or_else(|| config.provider.default_base_url().to_string());

        info!(provider = ?config.provider, model = %config.model, "LLM client ready");
        Ok(Self {
            client,
            config: config.clone(),
            api_base_url,
        })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn api_key(&self) -> LlmResult<&str> {
        match (self.config.api_key.as_deref(), self.config.provider.credential_var()) {
            (Some(key), _) => Ok(key),
            (None, Some(var)) => Err(LlmError::MissingCredential(var)),
            (None, None) => Ok(""),
        }
    }

    async fn openai_chat(&self, prompt: &str) -> LlmResult<String> {
        #[derive(Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            messages: Vec<Message<'a>>,
            temperature: f32,
            top_p: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct Response {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MessageContent,
        }

        #[derive(Deserialize)]
        struct MessageContent {
            content: Option<String>,
        }

        let api_key = self.api_key()?;
        let settings = self.config.settings;
        let url = format!("{}/chat/completions", self.api_base_url);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&Request {
                model: &self.config.model,
                messages: vec![
                    Message {
                        role: "system",
                        content: &self.config.system_instruction,
                    },
                    Message {
                        role: "user",
                        content: prompt,
                    },
                ],
                temperature: settings.temperature,
                top_p: settings.top_p,
                max_tokens: settings.max_output_tokens,
            })
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LlmError::Api(format!("OpenAI error: {}", resp.status())));
        }

        let result: Response = resp.json().await.map_err(|e| LlmError::Serialization(e.to_string()))?;
        Ok(result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    async fn ollama_chat(&self, prompt: &str) -> LlmResult<String> {
        #[derive(Serialize)]
        struct Options {
            temperature: f32,
            top_k: u32,
            top_p: f32,
            num_predict: u32,
        }

        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            prompt: &'a str,
            system: &'a str,
            stream: bool,
            options: Options,
        }

        #[derive(Deserialize)]
        struct Response {
            response: String,
        }

        let settings = self.config.settings;
        let url = format!("{}/api/generate", self.api_base_url);
        let resp = self
            .client
            .post(&url)
            .json(&Request {
                model: &self.config.model,
                prompt,
                system: &self.config.system_instruction,
                stream: false,
                options: Options {
                    temperature: settings.temperature,
                    top_k: settings.top_k,
                    top_p: settings.top_p,
                    num_predict: settings.max_output_tokens,
                },
            })
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LlmError::Api(format!("Ollama error: {}", resp.status())));
        }

        let result: Response = resp.json().await.map_err(|e| LlmError::Serialization(e.to_string()))?;
        Ok(result.response)
    }

    async fn gemini_chat(&self, prompt: &str) -> LlmResult<String> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base_url, self.config.model, api_key
        );

        let resp = self
            .client
            .post(&url)
            .json(&gemini::Request::new(
                &self.config.system_instruction,
                prompt,
                self.config.settings,
            ))
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("Gemini error {}: {}", status, text)));
        }

        let result: gemini::Response = resp.json().await.map_err(|e| LlmError::Serialization(e.to_string()))?;
        result.text()
    }
}

#[async_trait]
impl CompletionModel for LlmClient {
    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        debug!(chars = prompt.len(), "Sending prompt");
        match self.config.provider {
            LlmProvider::Gemini => self.gemini_chat(prompt).await,
            LlmProvider::OpenAI => self.openai_chat(prompt).await,
            LlmProvider::Ollama => self.ollama_chat(prompt).await,
        }
    }

    fn describe(&self) -> String {
        format!("{:?} ({})", self.config.provider, self.config.model)
    }
}

/// Gemini `generateContent` wire types
mod gemini {
    use super::{GenerationSettings, LlmError, LlmResult};
    use serde::{Deserialize, Serialize};

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Request<'a> {
        system_instruction: Content<'a>,
        contents: Vec<Content<'a>>,
        generation_config: GenerationConfig,
    }

    #[derive(Serialize)]
    struct Content<'a> {
        #[serde(skip_serializing_if = "Option::is_none")]
        role: Option<&'a str>,
        parts: Vec<Part<'a>>,
    }

    #[derive(Serialize)]
    struct Part<'a> {
        text: &'a str,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct GenerationConfig {
        temperature: f32,
        top_k: u32,
        top_p: f32,
        max_output_tokens: u32,
    }

    impl<'a> Request<'a> {
        pub fn new(system: &'a str, prompt: &'a str, settings: GenerationSettings) -> Self {
            Self {
                system_instruction: Content {
                    role: None,
                    parts: vec![Part { text: system }],
                },
                contents: vec![Content {
                    role: Some("user"),
                    parts: vec![Part { text: prompt }],
                }],
                generation_config: GenerationConfig {
                    temperature: settings.temperature,
                    top_k: settings.top_k,
                    top_p: settings.top_p,
                    max_output_tokens: settings.max_output_tokens,
                },
            }
        }
    }

    #[derive(Deserialize)]
    pub struct Response {
        candidates: Option<Vec<Candidate>>,
    }

    #[derive(Deserialize)]
    struct Candidate {
        content: Option<ResponseContent>,
    }

    #[derive(Deserialize)]
    struct ResponseContent {
        #[serde(default)]
        parts: Vec<ResponsePart>,
    }

    #[derive(Deserialize)]
    struct ResponsePart {
        #[serde(default)]
        text: String,
    }

    impl Response {
        /// Concatenated text of the first candidate; a blocked prompt has none
        pub fn text(self) -> LlmResult<String> {
            let content = self
                .candidates
                .and_then(|c| c.into_iter().next())
                .and_then(|c| c.content)
                .ok_or_else(|| LlmError::Api("Gemini returned no candidates".to_string()))?;
            Ok(content.parts.into_iter().map(|p| p.text).collect())
        }
    }

}
