//! Gemini font identifier.
//!
//! Implements [`FontIdentifier`] for [`GeminiClient`]: one call builds the
//! wire request, sends it once and parses the answer text.

use fontscope_core::{AnalysisRequest, FontAnalysisResponse, FontIdentifier, parse_analysis};

use crate::api::GenerateContentRequest;
use crate::error::Error;
use crate::{GeminiClient, TRACING_TARGET_PROVIDER};

#[async_trait::async_trait]
impl FontIdentifier for GeminiClient {
    async fn identify(
        &self,
        request: &AnalysisRequest,
    ) -> fontscope_core::Result<FontAnalysisResponse> {
        tracing::debug!(
            target: TRACING_TARGET_PROVIDER,
            request_id = %request.request_id(),
            mime_type = request.mime_type(),
            model = %self.config().model,
            "Identifying font via Gemini"
        );

        let response = self
            .generate_content(&GenerateContentRequest::from(request))
            .await?;

        let Some(text) = response.text() else {
            let reason = match (response.block_reason(), response.finish_reason()) {
                (Some(block), _) => format!("prompt blocked: {block}"),
                (None, Some(finish)) => format!("no text in candidate (finish reason {finish})"),
                (None, None) => "no candidates returned".to_owned(),
            };
            return Err(Error::empty_response(reason).into());
        };

        let analysis = parse_analysis(&text)?;

        tracing::debug!(
            target: TRACING_TARGET_PROVIDER,
            request_id = %request.request_id(),
            primary_font = %analysis.primary_font_name,
            confidence = analysis.confidence_level,
            "Font identified"
        );

        Ok(analysis)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use fontscope_core::{ErrorKind, ImageFormat, RetryPolicy, RetryingIdentifier};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use super::*;
    use crate::{GeminiConfig, GeminiCredentials};

    #[derive(Default)]
    struct Recorded {
        calls: Vec<(String, Option<String>, Value)>,
    }

    #[derive(Clone)]
    struct Fixture {
        status: StatusCode,
        body: Value,
        recorded: Arc<Mutex<Recorded>>,
    }

    async fn generate(
        State(fixture): State<Fixture>,
        Path(call): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let key = headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        fixture.recorded.lock().unwrap().calls.push((call, key, body));
        (fixture.status, Json(fixture.body.clone()))
    }

    async fn serve(status: StatusCode, body: Value) -> (GeminiClient, Arc<Mutex<Recorded>>) {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let fixture = Fixture {
            status,
            body,
            recorded: recorded.clone(),
        };

        let app = Router::new()
            .route("/v1beta/models/{call}", post(generate))
            .with_state(fixture);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        let config = GeminiConfig::builder()
            .with_base_url(&format!("http://{addr}/v1beta"))
            .unwrap()
            .build()
            .unwrap();
        let client = GeminiClient::new(config, GeminiCredentials::api_key("test-key")).unwrap();
        (client, recorded)
    }

    fn answer(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("iVBORw0KGgo=", ImageFormat::Png)
    }

    const PAYLOAD: &str = r#"{
        "primary_font_name": "Helvetica Neue",
        "confidence_level": 0.865,
        "matches": [
            { "name": "Helvetica", "description": "Neo-grotesque sans serif." },
            { "name": "Arial", "description": "Metric-compatible alternative." },
            { "name": "Inter", "description": "Open-source screen face." }
        ]
    }"#;

    #[tokio::test]
    async fn identifies_font_end_to_end() {
        let (client, recorded) = serve(StatusCode::OK, answer(PAYLOAD)).await;

        let analysis = client.identify(&request()).await.unwrap();
        assert_eq!(analysis.primary_font_name, "Helvetica Neue");
        assert_eq!(analysis.confidence_label(), "87%");
        assert_eq!(analysis.matches.len(), 3);

        let recorded = recorded.lock().unwrap();
        let (call, key, body) = &recorded.calls[0];
        assert_eq!(call, "gemini-2.5-flash:generateContent");
        assert_eq!(key.as_deref(), Some("test-key"));
        assert_eq!(
            body["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[tokio::test]
    async fn fenced_answer_is_accepted() {
        let fenced = format!("```json\n{PAYLOAD}\n```");
        let (client, _) = serve(StatusCode::OK, answer(&fenced)).await;

        let analysis = client.identify(&request()).await.unwrap();
        assert_eq!(analysis.primary_font_name, "Helvetica Neue");
    }

    #[tokio::test]
    async fn rejected_key_is_authentication_error() {
        let body = json!({
            "error": { "code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED" }
        });
        let (client, _) = serve(StatusCode::FORBIDDEN, body).await;

        let error = client.identify(&request()).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn server_error_is_service_unavailable() {
        let body = json!({ "error": { "code": 503, "message": "overloaded", "status": "UNAVAILABLE" } });
        let (client, _) = serve(StatusCode::SERVICE_UNAVAILABLE, body).await;

        let error = client.identify(&request()).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::ServiceUnavailable);
        assert!(error.is_transient());
    }

    #[tokio::test]
    async fn blocked_prompt_is_parse_error() {
        let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let (client, _) = serve(StatusCode::OK, body).await;

        let error = client.identify(&request()).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::Parse);
        assert!(error.user_message().contains("SAFETY"));
    }

    #[tokio::test]
    async fn prose_answer_is_parse_error() {
        let (client, _) = serve(StatusCode::OK, answer("I think it is Helvetica.")).await;

        let error = client.identify(&request()).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::Parse);
    }

    #[tokio::test]
    async fn retrying_client_exhausts_on_persistent_failure() {
        let (client, recorded) = serve(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;
        let policy = RetryPolicy {
            base_delay: std::time::Duration::from_millis(1),
            max_jitter: std::time::Duration::ZERO,
            ..RetryPolicy::default()
        };
        let identifier = RetryingIdentifier::with_policy(client, policy);

        let error = identifier.identify(&request()).await.unwrap_err();
        assert_eq!(
            error.user_message(),
            "Failed to identify font after multiple attempts."
        );
        assert_eq!(recorded.lock().unwrap().calls.len(), 3);
    }
}
