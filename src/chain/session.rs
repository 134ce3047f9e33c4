//! Delegated session account.
//!
//! # Security
//! - The wallet-session service owns the signing key; this process never
//!   holds private key material
//! - The opaque session token is loaded ONLY from an environment variable
//! - The token is never logged or serialized
//!
//! # Design Decisions
//! - `SessionAccount` is the seam between the submitter and whoever signs;
//!   production uses the HTTP-backed `DelegatedSession`, tests use mocks
//! - HTTP status codes map onto the submission failure taxonomy: 401 means
//!   the session lapsed, 403 means the service refused to sign, transport
//!   errors mean unreachable

use std::collections::BTreeSet;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::chain::call::PopulatedCall;
use crate::chain::fees::ExecutionFees;
use crate::chain::types::SessionError;
use crate::config::schema::SessionConfig;

/// Environment variable name for the session token.
pub const SESSION_TOKEN_ENV_VAR: &str = "PET_SESSION_TOKEN";

/// The contract methods a session is pre-authorized to invoke.
///
/// Fixed at construction; consulted before any call leaves the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodAllowlist {
    methods: BTreeSet<String>,
}

impl MethodAllowlist {
    pub fn new<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the session may invoke `method`.
    pub fn permits(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl From<&SessionConfig> for MethodAllowlist {
    fn from(config: &SessionConfig) -> Self {
        Self::new(config.allowed_methods.iter().cloned())
    }
}

/// What the session service tells us about an established session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    /// Address of the delegated account the service signs for.
    pub account_address: Address,
    /// Methods the session key was authorized for.
    pub allowed_methods: Vec<String>,
    /// Unix timestamp (seconds) after which the session is invalid.
    pub valid_until: u64,
}

impl SessionDescriptor {
    /// Whether the validity window has lapsed at `now`.
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        match now.duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_secs() >= self.valid_until,
            // Clock before the epoch; treat the session as live and let the
            // service be the judge.
            Err(_) => false,
        }
    }
}

/// An account whose key lives elsewhere and signs on our behalf.
#[async_trait]
pub trait SessionAccount: Send + Sync {
    /// Address of the delegated account.
    fn account_address(&self) -> Address;

    /// Sign and broadcast one call, returning the transaction hash the
    /// network assigned. Resolves when the network has accepted the
    /// transaction, not when it is final. Never retries.
    async fn execute(
        &self,
        call: &PopulatedCall,
        fees: &ExecutionFees,
    ) -> Result<TxHash, SessionError>;
}

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    call: &'a PopulatedCall,
    fee: &'a ExecutionFees,
}

#[derive(Deserialize)]
struct ExecuteResponse {
    transaction_hash: TxHash,
}

/// HTTP client for the wallet-session service.
pub struct DelegatedSession {
    http: reqwest::Client,
    service_url: Url,
    token: String,
    descriptor: SessionDescriptor,
}

impl DelegatedSession {
    /// Connect to the session service, reading the session token from the
    /// environment, and fetch the session descriptor.
    pub async fn connect(config: &SessionConfig) -> Result<Self, SessionError> {
        let token = std::env::var(SESSION_TOKEN_ENV_VAR)
            .map_err(|_| SessionError::MissingToken(SESSION_TOKEN_ENV_VAR))?;
        Self::connect_with_token(config, token).await
    }

    /// Connect with an explicit token. Kept separate so embedders that manage
    /// their own secrets can bypass the environment lookup.
    pub async fn connect_with_token(
        config: &SessionConfig,
        token: String,
    ) -> Result<Self, SessionError> {
        let service_url = Url::parse(&config.service_url)
            .map_err(|e| SessionError::Unreachable(format!("invalid service URL: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SessionError::Unreachable(e.to_string()))?;

        let session = Self {
            http,
            service_url,
            token,
            descriptor: SessionDescriptor {
                account_address: Address::ZERO,
                allowed_methods: Vec::new(),
                valid_until: 0,
            },
        };

        let descriptor = session.fetch_descriptor().await?;
        tracing::info!(
            account = %descriptor.account_address,
            methods = descriptor.allowed_methods.len(),
            valid_until = descriptor.valid_until,
            "Session established"
        );

        Ok(Self {
            descriptor,
            ..session
        })
    }

    /// The descriptor fetched at connect time.
    pub fn descriptor(&self) -> &SessionDescriptor {
        &self.descriptor
    }

    fn endpoint(&self, suffix: &str) -> Result<Url, SessionError> {
        let path = format!("session/{}{}", self.token, suffix);
        self.service_url
            .join(&path)
            .map_err(|e| SessionError::Unreachable(format!("invalid endpoint: {}", e)))
    }

    async fn fetch_descriptor(&self) -> Result<SessionDescriptor, SessionError> {
        let url = self.endpoint("")?;
        let response = self.http.get(url).send().await.map_err(map_transport_error)?;
        let response = check_status(response).await?;

        response
            .json::<SessionDescriptor>()
            .await
            .map_err(|e| SessionError::Service {
                status: 200,
                message: format!("malformed descriptor: {}", e.without_url()),
            })
    }
}

#[async_trait]
impl SessionAccount for DelegatedSession {
    fn account_address(&self) -> Address {
        self.descriptor.account_address
    }

    async fn execute(
        &self,
        call: &PopulatedCall,
        fees: &ExecutionFees,
    ) -> Result<TxHash, SessionError> {
        // Cheap local check; the service re-validates authoritatively.
        if self.descriptor.is_expired_at(SystemTime::now()) {
            return Err(SessionError::Expired);
        }

        let url = self.endpoint("/execute")?;
        let body = ExecuteRequest { call, fee: fees };

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;
        let response = check_status(response).await?;

        let parsed = response
            .json::<ExecuteResponse>()
            .await
            .map_err(|e| SessionError::Service {
                status: 200,
                message: format!("malformed execute response: {}", e.without_url()),
            })?;

        Ok(parsed.transaction_hash)
    }
}

impl std::fmt::Debug for DelegatedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatedSession")
            .field("service_url", &self.service_url.as_str())
            .field("account", &self.descriptor.account_address)
            .finish()
    }
}

fn map_transport_error(err: reqwest::Error) -> SessionError {
    // The request URL embeds the session token; drop it before the error can
    // be displayed or logged.
    SessionError::Unreachable(err.without_url().to_string())
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SessionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    match status.as_u16() {
        401 => Err(SessionError::Expired),
        403 => Err(SessionError::SigningRejected(message)),
        code => Err(SessionError::Service {
            status: code,
            message,
        }),
    }
}
