//! One call per backend operation, each wrapped in the retry policy.

pub mod retry;

use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::consts::GENERIC_API_ERROR;
use crate::error::ApiError;
use crate::events::{Event, EventBus};
use crate::operation::Operation;
use crate::transport::{Body, FormField, Request, Response, Transport};

pub use retry::RetryPolicy;

/// A video clip attached to feedback.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedbackPayload {
    pub rating: u8,
    pub text: Option<String>,
    pub video: Option<Attachment>,
}

impl FeedbackPayload {
    /// Multipart fields. Blank text is left out; other text is trimmed.
    pub fn to_form(&self) -> Vec<FormField> {
        let mut fields = vec![FormField::Text {
            name: "rating".to_string(),
            value: self.rating.to_string(),
        }];
        if let Some(text) = self.text.as_deref().map(str::trim)
            && !text.is_empty()
        {
            fields.push(FormField::Text {
                name: "text".to_string(),
                value: text.to_string(),
            });
        }
        if let Some(video) = &self.video {
            fields.push(FormField::File {
                name: "video".to_string(),
                filename: video.filename.clone(),
                bytes: video.bytes.clone(),
            });
        }
        fields
    }
}

/// Pull the caller-facing message out of a failed response.
fn failure_message(response: &Response) -> String {
    response
        .parse()
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| GENERIC_API_ERROR.to_string())
}

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    events: Arc<EventBus>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
            events: Arc::new(EventBus::default()),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    /// Where retry notifications are published.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Issue `operation` with `body` and return the parsed JSON result.
    pub async fn call(&self, operation: Operation, body: Body) -> Result<Value, ApiError> {
        let request = Request::new(operation.method(), operation.full_path(), body);
        let response = self.send_with_retry(operation, &request).await?;
        Ok(response.parse()?)
    }

    async fn attempt(&self, request: &Request) -> Result<Response, ApiError> {
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                message: failure_message(&response),
            });
        }
        Ok(response)
    }

    async fn send_with_retry(
        &self,
        operation: Operation,
        request: &Request,
    ) -> Result<Response, ApiError> {
        let mut attempt = 1;
        loop {
            debug!(%operation, attempt, "sending");
            match self.attempt(request).await {
                Ok(response) => return Ok(response),
                Err(e) if self.policy.should_retry(attempt) => {
                    let delay = self.policy.delay_after(attempt);
                    let remaining = self.policy.remaining_after(attempt);
                    warn!(%operation, attempt, remaining, ?delay, error = %e, "request failed, retrying");
                    self.events.emit(Event::Retrying {
                        operation,
                        attempt,
                        remaining,
                        delay,
                        reason: e.to_string(),
                    });
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn call_with_text(&self, operation: Operation, text: &str) -> Result<Value, ApiError> {
        self.call(operation, Body::Json(json!({ "text": text }))).await
    }

    pub async fn humanize(&self, text: &str) -> Result<Value, ApiError> {
        self.call_with_text(Operation::Humanize, text).await
    }

    pub async fn check_ai(&self, text: &str) -> Result<Value, ApiError> {
        self.call_with_text(Operation::Detect, text).await
    }

    pub async fn check_grammar(&self, text: &str) -> Result<Value, ApiError> {
        self.call_with_text(Operation::GrammarCheck, text).await
    }

    pub async fn check_plagiarism(&self, text: &str) -> Result<Value, ApiError> {
        self.call_with_text(Operation::PlagiarismCheck, text).await
    }

    pub async fn translate_text(&self, text: &str) -> Result<Value, ApiError> {
        self.call_with_text(Operation::Translate, text).await
    }

    pub async fn chat_respond(&self) -> Result<Value, ApiError> {
        self.call(Operation::ChatRespond, Body::Json(json!({}))).await
    }

    pub async fn loyalty_summary(&self) -> Result<Value, ApiError> {
        self.call(Operation::LoyaltySummary, Body::Empty).await
    }

    pub async fn history(&self) -> Result<Value, ApiError> {
        self.call(Operation::History, Body::Empty).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        self.call(
            Operation::Login,
            Body::Json(json!({ "email": email, "password": password })),
        )
        .await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        self.call(
            Operation::Register,
            Body::Json(json!({ "email": email, "password": password })),
        )
        .await
    }

    pub async fn verify_email(&self) -> Result<Value, ApiError> {
        self.call(Operation::VerifyEmail, Body::Json(json!({}))).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Value, ApiError> {
        self.call(Operation::ForgotPassword, Body::Json(json!({ "email": email }))).await
    }

    pub async fn reset_password(&self, password: &str) -> Result<Value, ApiError> {
        self.call(
            Operation::ResetPassword,
            Body::Json(json!({ "password": password })),
        )
        .await
    }

    pub async fn enable_two_factor(&self, code: &str) -> Result<Value, ApiError> {
        self.call(Operation::TwoFactor, Body::Json(json!({ "code": code }))).await
    }

    pub async fn send_magic_link(&self, email: &str) -> Result<Value, ApiError> {
        self.call(Operation::MagicLink, Body::Json(json!({ "email": email }))).await
    }

    pub async fn send_feedback(&self, payload: &FeedbackPayload) -> Result<Value, ApiError> {
        self.call(Operation::Feedback, Body::Form(payload.to_form())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_prefers_error_field() {
        let resp = Response::new(400, r#"{"error": "text is required"}"#);
        assert_eq!(failure_message(&resp), "text is required");
    }

    #[test]
    fn failure_message_falls_back_to_generic() {
        assert_eq!(failure_message(&Response::new(502, "Bad Gateway")), "API call failed");
        assert_eq!(failure_message(&Response::new(500, r#"{"detail": "x"}"#)), "API call failed");
        assert_eq!(failure_message(&Response::new(500, r#"{"error": 42}"#)), "API call failed");
    }

    #[test]
    fn feedback_form_skips_blank_text() {
        let payload = FeedbackPayload {
            rating: 4,
            text: Some("   ".to_string()),
            video: None,
        };
        assert_eq!(
            payload.to_form(),
            vec![FormField::Text {
                name: "rating".to_string(),
                value: "4".to_string(),
            }]
        );
    }

    #[test]
    fn feedback_form_trims_text_and_attaches_video() {
        let payload = FeedbackPayload {
            rating: 5,
            text: Some("  love it  ".to_string()),
            video: Some(Attachment {
                filename: "clip.webm".to_string(),
                bytes: vec![1, 2, 3],
            }),
        };
        let form = payload.to_form();
        assert_eq!(form.len(), 3);
        assert_eq!(
            form[1],
            FormField::Text {
                name: "text".to_string(),
                value: "love it".to_string(),
            }
        );
        assert!(matches!(&form[2], FormField::File { filename, .. } if filename == "clip.webm"));
    }
}
