//! Chat session state
//!
//! A session holds the ordered transcript, the current context scope and
//! the alerts raised by failed turns. A failed turn leaves the transcript
//! untouched and records exactly one alert.

use super::DashboardData;
use crate::context::{ContextError, PortfolioSummary};
use crate::llm::{CompletionModel, LlmError};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    #[error("AI not configured: {0}")]
    Disabled(String),
    #[error("Data not loaded")]
    NoData,
    #[error("Context error: {0}")]
    Context(#[from] ContextError),
    #[error("Model error: {0}")]
    Model(#[from] LlmError),
}

pub type ChatResult<T> = Result<T, ChatError>;

/// What the next question is about
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContextScope {
    #[default]
    Portfolio,
    Customer(String),
}

impl fmt::Display for ContextScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextScope::Portfolio => write!(f, "portfolio"),
            ContextScope::Customer(id) => write!(f, "customer {id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Full prompt for one question
pub fn prompt(context: &str, question: &str) -> String {
    format!("{context}\n\nUser Question: {question}\n\nProvide a detailed, actionable answer.")
}

#[derive(Debug, Default)]
pub struct ChatSession {
    transcript: Vec<Turn>,
    scope: ContextScope,
    alerts: Vec<String>,
    unavailable: Option<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn scope(&self) -> &ContextScope {
        &self.scope
    }

    pub fn set_scope(&mut self, scope: ContextScope) {
        info!(%scope, "Chat scope changed");
        self.scope = scope;
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Alerts raised since the last call
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    /// Record why no model is available, reported by every later turn
    pub fn set_model_error(&mut self, error: &LlmError) {
        self.unavailable = Some(error.to_string());
    }

    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Context block for the current scope
    pub fn context(&self, data: &DashboardData) -> ChatResult<String> {
        match &self.scope {
            ContextScope::Portfolio => {
                Ok(PortfolioSummary::compute(&data.tables.customers, &data.tables.interactions).render())
            }
            ContextScope::Customer(id) => Ok(data.context().customer_chat_context(id, &data.documents)?),
        }
    }

    /// Ask one question. On success the user turn and the reply are appended
    /// and the reply is returned.
    pub async fn submit(
        &mut self,
        question: &str,
        data: Option<&DashboardData>,
        model: Option<&dyn CompletionModel>,
    ) -> ChatResult<&Turn> {
        match self.answer(question, data, model).await {
            Ok(reply) => {
                self.transcript.push(Turn {
                    role: Role::User,
                    content: question.to_string(),
                });
                self.transcript.push(Turn {
                    role: Role::Assistant,
                    content: reply,
                });
                Ok(&self.transcript[self.transcript.len() - 1])
            }
            Err(e) => {
                // The alert is the user-facing report
                debug!(error = %e, scope = %self.scope, "Chat turn failed");
                self.alerts.push(e.to_string());
                Err(e)
            }
        }
    }

    async fn answer(
        &self,
        question: &str,
        data: Option<&DashboardData>,
        model: Option<&dyn CompletionModel>,
    ) -> ChatResult<String> {
        let model = model.ok_or_else(|| {
            ChatError::Disabled(
                self.unavailable
                    .clone()
                    .unwrap_or_else(|| "no model credential configured".to_string()),
            )
        })?;
        let data = data.ok_or(ChatError::NoData)?;
        let context = self.context(data)?;
        let reply = model.complete(&prompt(&context, question)).await?;
        info!(scope = %self.scope, chars = reply.len(), "Chat turn answered");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::SyntheticDataset;
    use crate::llm::LlmResult;
    use crate::model::customer::fixtures::customer;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct Echo {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionModel for Echo {
        async fn complete(&self, prompt: &str) -> LlmResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("answer".to_string())
        }
    }

    struct Broken;

    /// Log sink shared with the subscriber
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[async_trait]
    impl CompletionModel for Broken {
        async fn complete(&self, _prompt: &str) -> LlmResult<String> {
            Err(LlmError::Network("connection refused".to_string()))
        }
    }

    fn data() -> DashboardData {
        DashboardData {
            tables: SyntheticDataset {
                customers: vec![customer("HC-1000")],
                ..SyntheticDataset::default()
            },
            documents: Vec::new(),
        }
    }

    #[test]
    fn test_prompt_format() {
        assert_eq!(
            prompt("CTX", "Why?"),
            "CTX\n\nUser Question: Why?\n\nProvide a detailed, actionable answer."
        );
    }

    #[tokio::test]
    async fn test_successful_turn_appends_both_messages() {
        let model = Echo {
            prompts: Mutex::new(Vec::new()),
        };
        let d = data();
        let mut session = ChatSession::new();
        let reply = session.submit("Who is at risk?", Some(&d), Some(&model)).await.unwrap();
        assert_eq!(reply.content, "answer");

        let roles: Vec<Role> = session.transcript().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        let sent = model.prompts.lock().unwrap();
        assert!(sent[0].contains("PORTFOLIO OVERVIEW:"));
        assert!(sent[0].ends_with("User Question: Who is at risk?\n\nProvide a detailed, actionable answer."));
    }

    #[tokio::test]
    async fn test_customer_scope_uses_customer_context() {
        let model = Echo {
            prompts: Mutex::new(Vec::new()),
        };
        let d = data();
        let mut session = ChatSession::new();
        session.set_scope(ContextScope::Customer("HC-1000".to_string()));
        session.submit("Status?", Some(&d), Some(&model)).await.unwrap();
        assert!(model.prompts.lock().unwrap()[0].contains("CUSTOMER PROFILE: Regional Health Center HC-1000"));
    }

    #[tokio::test]
    async fn test_failures_leave_transcript_and_raise_one_alert() {
        let d = data();
        let mut session = ChatSession::new();

        let err = session.submit("q", Some(&d), Some(&Broken)).await.unwrap_err();
        assert!(matches!(err, ChatError::Model(_)));
        assert!(session.transcript().is_empty());
        assert_eq!(session.alerts().len(), 1);

        assert!(matches!(
            session.submit("q", Some(&d), None).await,
            Err(ChatError::Disabled(_))
        ));
        assert!(matches!(session.submit("q", None, Some(&Broken)).await, Err(ChatError::NoData)));

        session.set_scope(ContextScope::Customer("HC-9999".to_string()));
        assert!(matches!(
            session.submit("q", Some(&d), Some(&Broken)).await,
            Err(ChatError::Context(ContextError::UnknownCustomer(_)))
        ));
        assert!(session.transcript().is_empty());
        assert_eq!(session.take_alerts().len(), 4);
        assert!(session.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_turn_reports_model_error() {
        let d = data();
        let mut session = ChatSession::new();
        session.set_model_error(&LlmError::MissingCredential("GEMINI_API_KEY"));

        let err = session.submit("q", Some(&d), None).await.unwrap_err();
        assert_eq!(err, ChatError::Disabled("Missing credential: set GEMINI_API_KEY".to_string()));
        assert_eq!(
            session.take_alerts(),
            vec!["AI not configured: Missing credential: set GEMINI_API_KEY".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failed_turn_logs_nothing_at_warn() {
        let logs = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let d = data();
        let mut session = ChatSession::new();
        assert!(session.submit("q", Some(&d), Some(&Broken)).await.is_err());
        assert!(session.submit("q", Some(&d), None).await.is_err());

        assert_eq!(session.alerts().len(), 2);
        assert_eq!(logs.contents(), "");
    }

    #[tokio::test]
    async fn test_clear_empties_transcript() {
        let model = Echo {
            prompts: Mutex::new(Vec::new()),
        };
        let d = data();
        let mut session = ChatSession::new();
        session.submit("one", Some(&d), Some(&model)).await.unwrap();
        session.clear();
        assert!(session.transcript().is_empty());
        assert_eq!(*session.scope(), ContextScope::Portfolio);
    }
}
