use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use super::{Body, FormField, Method, Request, Response, Transport};
use crate::error::TransportError;

/// Sends requests to a real backend over HTTP.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// `base_url` is the origin (scheme, host, port); request paths are appended to it.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn build_form(fields: &[FormField]) -> Form {
    fields.iter().fold(Form::new(), |form, field| match field {
        FormField::Text { name, value } => form.text(name.clone(), value.clone()),
        FormField::File {
            name,
            filename,
            bytes,
        } => form.part(
            name.clone(),
            Part::bytes(bytes.clone()).file_name(filename.clone()),
        ),
    })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &Request) -> Result<Response, TransportError> {
        let url = self.url(&request.path);
        debug!(method = %request.method, %url, "sending request");

        let mut req = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        req = match &request.body {
            Body::Empty => req,
            Body::Json(value) => req.json(value),
            Body::Form(fields) => req.multipart(build_form(fields)),
        };

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(Response { status, body })
    }
}
