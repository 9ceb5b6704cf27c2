use futures::StreamExt;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc::UnboundedSender;

use async_trait::async_trait;
use palaver_protocol::Assistant;
use palaver_protocol::Model;
use palaver_protocol::PromptTemplate;
use palaver_protocol::Provider;
use palaver_protocol::UploadedFile;

use crate::backend::Backend;
use crate::backend::BackendError;
use crate::backend::FileUpload;
use crate::backend::TranslateRequest;
use crate::backend::TranslationEvent;

#[derive(Clone, Debug)]
pub struct Client {
    base_url: String,
    http: reqwest::Client,
    bearer_token: Option<String>,
    user_agent: Option<HeaderValue>,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let mut base_url = base_url.into();
        // Trim trailing slashes for consistent URL building.
        while base_url.ends_with('/') {
            base_url.pop();
        }
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url,
            http,
            bearer_token: None,
            user_agent: None,
        })
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        if let Ok(hv) = HeaderValue::from_str(&ua.into()) {
            self.user_agent = Some(hv);
        }
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut h = HeaderMap::new();
        if let Some(ua) = &self.user_agent {
            h.insert(USER_AGENT, ua.clone());
        } else {
            h.insert(USER_AGENT, HeaderValue::from_static("palaver-client"));
        }
        if let Some(token) = &self.bearer_token {
            let value = format!("Bearer {token}");
            if let Ok(hv) = HeaderValue::from_str(&value) {
                h.insert(AUTHORIZATION, hv);
            }
        }
        h
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self
            .http
            .get(self.url(path))
            .headers(self.headers())
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl Backend for Client {
    async fn list_models(&self) -> Result<Vec<Model>, BackendError> {
        self.get_json("/api/models").await
    }

    async fn list_providers(&self) -> Result<Vec<Provider>, BackendError> {
        self.get_json("/api/providers").await
    }

    async fn get_assistant(&self, id: &str) -> Result<Assistant, BackendError> {
        self.get_json(&format!("/api/assistants/{id}")).await
    }

    async fn list_prompt_templates(&self) -> Result<Vec<PromptTemplate>, BackendError> {
        self.get_json("/api/prompt-templates").await
    }

    async fn upload_file(
        &self,
        session_id: &str,
        upload: FileUpload,
    ) -> Result<UploadedFile, BackendError> {
        let mut part =
            reqwest::multipart::Part::bytes(upload.bytes).file_name(upload.filename);
        if let Some(mime) = &upload.mime_type {
            part = part.mime_str(mime)?;
        }
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self
            .http
            .post(self.url(&format!("/api/sessions/{session_id}/files")))
            .headers(self.headers())
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn translate_text(
        &self,
        request: TranslateRequest,
        events: UnboundedSender<TranslationEvent>,
    ) -> Result<(), BackendError> {
        let response = self
            .http
            .post(self.url("/api/translate"))
            .headers(self.headers())
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // The endpoint streams newline-delimited JSON events (optionally with
        // an SSE-style `data:` prefix). Lines may be split across network
        // chunks, so buffer until a newline arrives.
        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut terminated = false;
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    let _ = events.send(TranslationEvent::Failed {
                        message: err.to_string(),
                    });
                    return Ok(());
                }
            };
            buffer.push_str(&String::from_utf8_lossy(&chunk));
            while let Some(newline) = buffer.find('\n') {
                let line: String = buffer.drain(..=newline).collect();
                let line = line.trim();
                let line = line.strip_prefix("data:").map_or(line, str::trim);
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<TranslationEvent>(line) {
                    Ok(event) => {
                        terminated = matches!(
                            event,
                            TranslationEvent::Done | TranslationEvent::Failed { .. }
                        );
                        let _ = events.send(event);
                        if terminated {
                            return Ok(());
                        }
                    }
                    Err(err) => {
                        tracing::warn!("skipping undecodable translation line: {err}");
                    }
                }
            }
        }
        if !terminated {
            // Treat a clean EOF without a terminal event as completion.
            let _ = events.send(TranslationEvent::Done);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_url_is_normalized() {
        let client = Client::new("https://api.palaver.dev///").unwrap();
        assert_eq!(client.url("/api/models"), "https://api.palaver.dev/api/models");
    }

    #[test]
    fn bearer_token_is_attached_to_headers() {
        let client = Client::new("https://api.palaver.dev")
            .unwrap()
            .with_bearer_token("secret");
        let headers = client.headers();
        assert_eq!(
            headers.get(AUTHORIZATION).map(|v| v.to_str().unwrap()),
            Some("Bearer secret")
        );
    }
}
