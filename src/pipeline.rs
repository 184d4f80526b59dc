//! Generation Pipeline - Single Entry Point
//!
//! CRITICAL: create_game MUST validate internally. No bypass.
//!
//! Authentication happens at most once, at construction; its failure is
//! never fatal. Each create_game call is independent and the orchestrator
//! stays usable after any rejection or fault.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogError, GenreCatalog};
use crate::client::{
    AuthOutcome, AuthenticatedSession, ContentProvider, EnrichmentFragment, ExternalContentClient,
};
use crate::config::GameSpec;
use crate::generator::{CodeGenerator, GeneratedArtifact, GeneratorError};
use crate::validation::{ValidationReport, Validator};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    UnknownGenre(CatalogError),

    #[error("Validation failed: {}", .report.summary())]
    ValidationFailed { report: ValidationReport },

    #[error("Unsupported engine: {engine} (supported: {})", .supported.join(", "))]
    UnsupportedEngine {
        engine: String,
        supported: Vec<String>,
    },

    #[error("Generation failed: {0}")]
    Generation(GeneratorError),
}

/// Lifecycle phase of the orchestrator, observable by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Created,
    Authenticating,
    Authenticated,
    Unauthenticated,
    Ready,
    Validating,
    Validated,
    Rejected,
    Generating,
    Completed,
    Failed,
}

/// The orchestrator - sequences authentication, validation, enrichment,
/// and generation into one lifecycle per request.
pub struct GameGenerator {
    catalog: GenreCatalog,
    validator: Validator,
    generator: CodeGenerator,
    provider: Box<dyn ContentProvider>,
    session: Option<AuthenticatedSession>,
    phase: Phase,
}

impl GameGenerator {
    /// Local-only generation; no credential, nothing remote is attempted.
    pub fn new(catalog: GenreCatalog) -> Self {
        Self::with_provider(catalog, Box::new(ExternalContentClient::new()), None)
    }

    /// Authenticates the credential once against the remote content
    /// service. Failure is logged and surfaced via `is_authenticated`;
    /// generation proceeds unauthenticated.
    pub fn with_credential(catalog: GenreCatalog, credential: &str) -> Self {
        Self::with_provider(
            catalog,
            Box::new(ExternalContentClient::new()),
            Some(credential),
        )
    }

    pub fn with_provider(
        catalog: GenreCatalog,
        mut provider: Box<dyn ContentProvider>,
        credential: Option<&str>,
    ) -> Self {
        let (phase, session) = match credential {
            Some(credential) => match provider.authenticate(credential) {
                AuthOutcome::Authenticated(session) => (Phase::Authenticated, Some(session)),
                AuthOutcome::Unauthenticated { reason } => {
                    warn!(%reason, "Continuing without remote enrichment");
                    (Phase::Unauthenticated, None)
                }
            },
            None => (Phase::Unauthenticated, None),
        };
        debug!(?phase, "Orchestrator ready");

        Self {
            catalog,
            validator: Validator::new(),
            generator: CodeGenerator::new(),
            provider,
            session,
            phase: Phase::Ready,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&AuthenticatedSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn catalog(&self) -> &GenreCatalog {
        &self.catalog
    }

    /// Validate a specification against the genre catalog.
    ///
    /// This is the ONLY validation entry point.
    pub fn validate(&self, spec: &GameSpec) -> Result<ValidationReport, PipelineError> {
        let schema = self
            .catalog
            .schema_for(spec.genre)
            .map_err(PipelineError::UnknownGenre)?;
        Ok(self.validator.validate(spec, schema))
    }

    /// Run the full lifecycle for one specification.
    ///
    /// CRITICAL: This ALWAYS calls validate internally. No bypass possible.
    pub fn create_game(&mut self, spec: &GameSpec) -> Result<GeneratedArtifact, PipelineError> {
        self.phase = Phase::Validating;
        let report = match self.validate(spec) {
            Ok(report) => report,
            Err(e) => {
                self.phase = Phase::Rejected;
                return Err(e);
            }
        };
        if !report.valid {
            warn!(
                genre = %spec.genre,
                violations = report.violations.len(),
                "Specification rejected"
            );
            self.phase = Phase::Rejected;
            return Err(PipelineError::ValidationFailed { report });
        }
        self.phase = Phase::Validated;
        debug!(phase = ?self.phase, genre = %spec.genre, "Specification validated");

        self.phase = Phase::Generating;
        let enrichment = self.collect_enrichment(spec);

        match self.generator.generate(spec, enrichment) {
            Ok(artifact) => {
                info!(
                    genre = %spec.genre,
                    engine = %spec.engine,
                    artifact_id = %artifact.id,
                    "Game generated"
                );
                self.phase = Phase::Completed;
                Ok(artifact)
            }
            Err(GeneratorError::UnsupportedEngine { engine, supported }) => {
                self.phase = Phase::Failed;
                Err(PipelineError::UnsupportedEngine { engine, supported })
            }
            Err(e) => {
                self.phase = Phase::Failed;
                Err(PipelineError::Generation(e))
            }
        }
    }

    /// Enrichment is attempted only while a session exists, and any
    /// failure degrades to an empty list without touching state.
    fn collect_enrichment(&self, spec: &GameSpec) -> Vec<EnrichmentFragment> {
        let Some(session) = &self.session else {
            return vec![];
        };
        match self.provider.enrich(spec, session) {
            Ok(fragments) => {
                debug!(fragments = fragments.len(), "Enrichment merged");
                fragments
            }
            Err(e) => {
                warn!(error = %e, "Enrichment unavailable; generating without it");
                vec![]
            }
        }
    }
}
