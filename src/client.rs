//! External Content Client - Remote Content Enriches, Never Gates
//!
//! Manages the optional trust relationship with the remote
//! generative-content service. Every failure on this path is reduced to a
//! recoverable outcome; the local pipeline never depends on it.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::GameGenre;
use crate::config::GameSpec;

pub const DEFAULT_BASE_URL: &str = "https://content.gameforge.dev";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Transient transport errors only; never retried on HTTP or body errors.
const ENRICH_TRANSPORT_RETRIES: u32 = 1;

/// Capability value proving a successful authentication. Enrichment is
/// only expressible while one of these exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Authenticated(AuthenticatedSession),
    Unauthenticated { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrichmentFragment {
    pub section: String,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Enrichment service unavailable: {0}")]
    Unavailable(String),
}

/// Seam between the orchestrator and the remote service, so generation
/// can be exercised against an in-memory provider.
pub trait ContentProvider {
    fn authenticate(&mut self, credential: &str) -> AuthOutcome;
    fn enrich(
        &self,
        spec: &GameSpec,
        session: &AuthenticatedSession,
    ) -> Result<Vec<EnrichmentFragment>, EnrichmentError>;
}

/// Partial account-info response body.
#[derive(Debug, Deserialize)]
struct AccountInfo {
    name: String,
}

#[derive(Debug, Serialize)]
struct EnrichRequest<'a> {
    genre: GameGenre,
    details: &'a HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct EnrichResponse {
    fragments: Vec<EnrichmentFragment>,
}

/// HTTP client for the remote generative-content service.
pub struct ExternalContentClient {
    base_url: String,
    http: Option<reqwest::blocking::Client>,
    session: Option<AuthenticatedSession>,
    credential: Option<String>,
}

impl ExternalContentClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("gameforge-core/", env!("CARGO_PKG_VERSION")))
            .build();
        let http = match http {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "Failed to build HTTP client; remote content disabled");
                None
            }
        };
        Self {
            base_url: base_url.into(),
            http,
            session: None,
            credential: None,
        }
    }

    /// Single synchronous attempt against the account-info endpoint. Any
    /// transport failure, non-2xx status, or malformed body yields
    /// `Unauthenticated`; the caller may retry by calling again.
    pub fn authenticate(&mut self, credential: &str) -> AuthOutcome {
        let outcome = self.request_account(credential);
        match &outcome {
            AuthOutcome::Authenticated(session) => {
                info!(display_name = %session.display_name, "Welcome");
                self.session = Some(session.clone());
                self.credential = Some(credential.to_string());
            }
            AuthOutcome::Unauthenticated { reason } => {
                warn!(%reason, "Authentication failed");
                self.session = None;
                self.credential = None;
            }
        }
        outcome
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&AuthenticatedSession> {
        self.session.as_ref()
    }

    fn request_account(&self, credential: &str) -> AuthOutcome {
        let Some(http) = &self.http else {
            return AuthOutcome::Unauthenticated {
                reason: "HTTP client unavailable".to_string(),
            };
        };

        let url = format!("{}/v1/account", self.base_url);
        let response = match http.get(&url).bearer_auth(credential).send() {
            Ok(response) => response,
            Err(e) => {
                return AuthOutcome::Unauthenticated {
                    reason: format!("transport error: {e}"),
                }
            }
        };

        if !response.status().is_success() {
            return AuthOutcome::Unauthenticated {
                reason: format!("account endpoint returned {}", response.status()),
            };
        }

        match response.json::<AccountInfo>() {
            Ok(account) => AuthOutcome::Authenticated(AuthenticatedSession {
                display_name: account.name,
            }),
            Err(e) => AuthOutcome::Unauthenticated {
                reason: format!("malformed account response: {e}"),
            },
        }
    }

    /// Requests additional generated content for the spec. Retries once on
    /// transport errors; HTTP and body failures are terminal.
    pub fn enrich(
        &self,
        spec: &GameSpec,
        session: &AuthenticatedSession,
    ) -> Result<Vec<EnrichmentFragment>, EnrichmentError> {
        let Some(http) = &self.http else {
            return Err(EnrichmentError::Unavailable(
                "HTTP client unavailable".to_string(),
            ));
        };
        let Some(credential) = &self.credential else {
            return Err(EnrichmentError::Unavailable(
                "no credential on record for the session".to_string(),
            ));
        };

        let url = format!("{}/v1/enrich", self.base_url);
        let body = EnrichRequest {
            genre: spec.genre,
            details: &spec.details,
        };

        let mut attempt = 0;
        loop {
            match http.post(&url).bearer_auth(credential).json(&body).send() {
                Ok(response) => {
                    if !response.status().is_success() {
                        return Err(EnrichmentError::Unavailable(format!(
                            "enrichment endpoint returned {}",
                            response.status()
                        )));
                    }
                    return match response.json::<EnrichResponse>() {
                        Ok(enrichment) => {
                            debug!(
                                display_name = %session.display_name,
                                fragments = enrichment.fragments.len(),
                                "Enrichment received"
                            );
                            Ok(enrichment.fragments)
                        }
                        Err(e) => Err(EnrichmentError::Unavailable(format!(
                            "malformed enrichment response: {e}"
                        ))),
                    };
                }
                Err(e) => {
                    if attempt >= ENRICH_TRANSPORT_RETRIES {
                        return Err(EnrichmentError::Unavailable(format!(
                            "transport error: {e}"
                        )));
                    }
                    attempt += 1;
                    debug!(attempt, error = %e, "Enrichment transport error; retrying");
                }
            }
        }
    }
}

impl Default for ExternalContentClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentProvider for ExternalContentClient {
    fn authenticate(&mut self, credential: &str) -> AuthOutcome {
        ExternalContentClient::authenticate(self, credential)
    }

    fn enrich(
        &self,
        spec: &GameSpec,
        session: &AuthenticatedSession,
    ) -> Result<Vec<EnrichmentFragment>, EnrichmentError> {
        ExternalContentClient::enrich(self, spec, session)
    }
}
