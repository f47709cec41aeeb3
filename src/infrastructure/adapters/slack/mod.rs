//! Slack adapter
//!
//! Identity and posting go through the Web API (`auth.test`, `chat.postMessage`);
//! events arrive over the RTM websocket opened by `rtm.connect`.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::application::errors::BotError;
use crate::domain::entities::{BotIdentity, IncomingMessage, RtmEvent};
use crate::domain::traits::{Bot, EventSource};

/// Slack error codes that mean the token itself is bad
const AUTH_ERRORS: &[&str] = &[
    "not_authed",
    "invalid_auth",
    "account_inactive",
    "token_revoked",
    "token_expired",
];

/// Slack bot adapter
pub struct SlackAdapter {
    token: String,
    api_base: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct AuthTestResponse {
    user_id: String,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    team: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RtmConnectResponse {
    url: String,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    #[serde(default)]
    ts: Option<String>,
}

impl SlackAdapter {
    pub fn new(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: Value) -> Result<T, BotError> {
        let response = self
            .client
            .post(self.api_url(method))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Slack API {} error: {}", method, response.status())));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        parse_envelope(method, data)
    }

    pub async fn auth_test(&self) -> Result<BotIdentity, BotError> {
        let data: AuthTestResponse = self.call("auth.test", json!({})).await?;
        tracing::debug!(
            "auth.test: user={:?} team={:?}",
            data.user.as_deref().unwrap_or_default(),
            data.team.as_deref().unwrap_or_default()
        );
        Ok(BotIdentity::new(data.user_id))
    }

    pub async fn rtm_connect(&self) -> Result<String, BotError> {
        let data: RtmConnectResponse = self.call("rtm.connect", json!({})).await?;
        Ok(data.url)
    }
}

/// Unwrap Slack's `{ "ok": ..., "error": ... }` envelope
fn parse_envelope<T: DeserializeOwned>(method: &str, data: Value) -> Result<T, BotError> {
    if !data.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        let error = data
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown_error")
            .to_string();
        return Err(if AUTH_ERRORS.contains(&error.as_str()) {
            BotError::Auth(format!("{}: {}", method, error))
        } else {
            BotError::Network(format!("{}: {}", method, error))
        });
    }

    serde_json::from_value(data).map_err(|e| BotError::Parse(format!("{}: {}", method, e)))
}

/// Decode one RTM frame
pub fn parse_rtm_frame(text: &str) -> Result<RtmEvent, BotError> {
    let value: Value = serde_json::from_str(text).map_err(|e| BotError::Parse(e.to_string()))?;

    let Some(kind) = value.get("type").and_then(Value::as_str) else {
        // acks for our own sends carry `reply_to` and no type
        return Ok(RtmEvent::Other("reply".to_string()));
    };

    let event = match kind {
        "hello" => RtmEvent::Connected,
        "goodbye" => RtmEvent::Disconnecting,
        "message" => {
            let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
            let mut msg = IncomingMessage::new(
                field("channel").unwrap_or_default(),
                field("text").unwrap_or_default(),
            );
            msg.user = field("user");
            msg.subtype = field("subtype");
            RtmEvent::Message(msg.with_raw(value.clone()))
        }
        other => RtmEvent::Other(other.to_string()),
    };
    Ok(event)
}

#[async_trait]
impl Bot for SlackAdapter {
    async fn identify(&self) -> Result<BotIdentity, BotError> {
        self.auth_test().await
    }

    async fn connect(&self) -> Result<Box<dyn EventSource>, BotError> {
        let url = self.rtm_connect().await?;
        let (ws, _) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| BotError::Network(format!("RTM connect failed: {}", e)))?;
        tracing::info!("Connected to Slack RTM");
        Ok(Box::new(RtmConnection { ws }))
    }

    async fn send_message(&self, channel: &str, text: &str) -> Result<String, BotError> {
        let data: PostMessageResponse = self
            .call("chat.postMessage", json!({ "channel": channel, "text": text }))
            .await?;
        Ok(data.ts.unwrap_or_default())
    }

    fn platform(&self) -> &'static str {
        "slack"
    }
}

/// Live RTM websocket
pub struct RtmConnection {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl EventSource for RtmConnection {
    async fn next_event(&mut self) -> Option<Result<RtmEvent, BotError>> {
        loop {
            match self.ws.next().await? {
                Ok(WsMessage::Text(text)) => return Some(parse_rtm_frame(&text)),
                Ok(WsMessage::Close(frame)) => {
                    tracing::debug!("RTM closed: {:?}", frame);
                    return None;
                }
                Ok(_) => continue,
                Err(e) => return Some(Err(BotError::Network(e.to_string()))),
            }
        }
    }

    async fn close(&mut self) -> Result<(), BotError> {
        use tokio_tungstenite::tungstenite::Error as WsError;
        match self.ws.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(BotError::Network(e.to_string())),
        }
    }
}
