use crate::error::Result;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Push transport settings. Both fields must be present for delivery to be
/// attempted; otherwise the service is in its explicit disabled state and
/// every send is a no-op.
#[derive(Debug, Clone, Default)]
pub struct PushConfig {
    pub api_url: Option<String>,
    pub server_key: Option<String>,
}

impl PushConfig {
    pub fn from_app_config(config: &crate::config::Config) -> Self {
        Self {
            api_url: config.push_api_url.clone(),
            server_key: config.push_server_key.clone(),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.api_url.is_some() && self.server_key.is_some()
    }
}

/// Per-token delivery outcome of one send. Partial failures are reported
/// here, never raised.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PushOutcome {
    pub success: u64,
    pub failure: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub data: JsonValue,
}

#[derive(Clone)]
pub struct PushService {
    client: Client,
    config: PushConfig,
}

impl PushService {
    pub fn new(config: PushConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub async fn send_to_token(&self, token: &str, message: &PushMessage) -> Result<PushOutcome> {
        let payload = serde_json::json!({
            "to": token,
            "notification": { "title": message.title, "body": message.body },
            "data": message.data,
        });
        self.post(payload, 1).await
    }

    pub async fn send_to_tokens(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<PushOutcome> {
        if tokens.is_empty() {
            return Ok(PushOutcome::default());
        }
        let payload = serde_json::json!({
            "registration_ids": tokens,
            "notification": { "title": message.title, "body": message.body },
            "data": message.data,
        });
        self.post(payload, tokens.len() as u64).await
    }

    async fn post(&self, payload: JsonValue, token_count: u64) -> Result<PushOutcome> {
        let (Some(api_url), Some(server_key)) = (&self.config.api_url, &self.config.server_key)
        else {
            tracing::debug!("Push transport disabled; skipping delivery");
            return Ok(PushOutcome::default());
        };

        let response = self
            .client
            .post(api_url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("key={}", server_key),
            )
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        let body: JsonValue = response.json().await.unwrap_or(JsonValue::Null);
        Ok(Self::parse_outcome(&body, token_count))
    }

    // The transport reports `success`/`failure` totals; older responses only
    // carry a per-token `results` array.
    fn parse_outcome(body: &JsonValue, token_count: u64) -> PushOutcome {
        if let (Some(success), Some(failure)) =
            (body["success"].as_u64(), body["failure"].as_u64())
        {
            return PushOutcome { success, failure };
        }
        if let Some(results) = body["results"].as_array() {
            let failure = results
                .iter()
                .filter(|entry| entry.get("error").is_some())
                .count() as u64;
            return PushOutcome {
                success: results.len() as u64 - failure,
                failure,
            };
        }
        PushOutcome {
            success: token_count,
            failure: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_without_both_settings() {
        assert!(!PushConfig::disabled().is_enabled());
        assert!(!PushConfig {
            api_url: Some("http://push.local/send".into()),
            server_key: None,
        }
        .is_enabled());
        assert!(PushConfig {
            api_url: Some("http://push.local/send".into()),
            server_key: Some("key".into()),
        }
        .is_enabled());
    }

    #[test]
    fn outcome_prefers_summary_counts() {
        let body = serde_json::json!({ "success": 2, "failure": 1 });
        let outcome = PushService::parse_outcome(&body, 3);
        assert_eq!(outcome.success, 2);
        assert_eq!(outcome.failure, 1);
    }

    #[test]
    fn outcome_falls_back_to_results_array() {
        let body = serde_json::json!({
            "results": [
                { "message_id": "1" },
                { "error": "NotRegistered" },
                { "message_id": "2" },
            ]
        });
        let outcome = PushService::parse_outcome(&body, 3);
        assert_eq!(outcome.success, 2);
        assert_eq!(outcome.failure, 1);
    }

    #[test]
    fn disabled_send_is_a_noop() {
        let service = PushService::new(PushConfig::disabled());
        let message = PushMessage {
            title: "t".into(),
            body: "b".into(),
            data: serde_json::json!({}),
        };
        let outcome = tokio_test::block_on(
            service.send_to_tokens(&["token-1".to_string()], &message),
        )
        .expect("disabled send");
        assert_eq!(outcome.success, 0);
        assert_eq!(outcome.failure, 0);
    }
}
