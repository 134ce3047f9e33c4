//! Bot-messaging API client.
//!
//! # Responsibilities
//! - Long-poll the bot API for incoming updates
//! - Send replies and notifications to chats
//! - Authenticate with a token loaded ONLY from the environment
//!
//! # Design Decisions
//! - The API root is configurable; deployments run against the test network
//!   root by default
//! - The token becomes part of request URLs, so URLs are never logged
//! - No update is ever acknowledged implicitly; the caller advances the
//!   offset after handling a batch

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::config::schema::BotConfig;

/// Environment variable name for the bot token.
pub const BOT_TOKEN_ENV_VAR: &str = "TELEGRAM_BOT_TOKEN";

/// Errors from the bot API boundary.
#[derive(Debug, Error)]
pub enum BotError {
    /// The bot token environment variable is not set.
    #[error("Bot token missing: set {0}")]
    MissingToken(&'static str),

    /// The configured API root could not be combined into a request URL.
    #[error("Invalid bot API root: {0}")]
    InvalidRoot(String),

    /// Transport-level failure talking to the API.
    #[error("Bot API transport error: {0}")]
    Transport(reqwest::Error),

    /// The API answered but refused the request.
    #[error("Bot API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL embeds the bot token; drop it before the error can
        // be displayed or logged.
        BotError::Transport(err.without_url())
    }
}

/// One incoming update from the API.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

/// A chat message inside an update.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

/// The chat a message belongs to.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Who the token authenticates as, per `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotIdentity {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Standard response envelope of the bot API.
///
/// The option fields stay bare so the derive does not demand `T: Default`;
/// serde already fills missing options with `None`.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// HTTP client for one bot token against one API root.
pub struct BotClient {
    http: reqwest::Client,
    base: Url,
    api_root: String,
    poll_timeout_secs: u64,
}

impl BotClient {
    /// Build a client, reading the bot token from the environment.
    pub fn from_env(config: &BotConfig) -> Result<Self, BotError> {
        let token =
            std::env::var(BOT_TOKEN_ENV_VAR).map_err(|_| BotError::MissingToken(BOT_TOKEN_ENV_VAR))?;
        Self::with_token(config, &token)
    }

    /// Build a client with an explicit token.
    pub fn with_token(config: &BotConfig, token: &str) -> Result<Self, BotError> {
        let root = Url::parse(&config.api_root).map_err(|e| BotError::InvalidRoot(e.to_string()))?;
        // Tokens contain a colon, so a relative-reference join would read
        // `bot123456:...` as an absolute URI; splice the path textually.
        let base = Url::parse(&format!(
            "{}/bot{}/",
            root.as_str().trim_end_matches('/'),
            token
        ))
        .map_err(|e| BotError::InvalidRoot(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base,
            api_root: config.api_root.clone(),
            poll_timeout_secs: config.poll_timeout_secs,
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<T, BotError> {
        let url = self
            .base
            .join(method)
            .map_err(|e| BotError::InvalidRoot(e.to_string()))?;

        let envelope: ApiEnvelope<T> = self.http.post(url).json(&body).send().await?.json().await?;

        if !envelope.ok {
            return Err(BotError::Api(
                envelope
                    .description
                    .unwrap_or_else(|| format!("{} refused without description", method)),
            ));
        }
        envelope
            .result
            .ok_or_else(|| BotError::Api(format!("{} returned no result", method)))
    }

    /// Identify the bot behind the token. Used as the startup probe.
    pub async fn get_me(&self) -> Result<BotIdentity, BotError> {
        self.call("getMe", json!({})).await
    }

    /// Long-poll for updates past `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, BotError> {
        self.call(
            "getUpdates",
            json!({
                "offset": offset,
                "timeout": self.poll_timeout_secs,
                "allowed_updates": ["message"],
            }),
        )
        .await
    }

    /// Send a text message to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        let _: serde_json::Value = self
            .call("sendMessage", json!({ "chat_id": chat_id, "text": text }))
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for BotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The base URL embeds the token; expose the root only.
        f.debug_struct("BotClient")
            .field("api_root", &self.api_root)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}
