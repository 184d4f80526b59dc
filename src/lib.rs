//! GameForge Core - Game Scaffold Compiler
//!
//! # The Five Laws (Non-Negotiable)
//! 1. Genre Schemas Are Contracts
//! 2. Validation Is Protective
//! 3. Deterministic Output
//! 4. Remote Content Enriches, Never Gates
//! 5. The Generator Shapes, Never Invents

pub mod catalog;
pub mod client;
pub mod config;
pub mod generator;
pub mod hashing;
pub mod pipeline;
pub mod validation;

pub use catalog::{
    CatalogError, FieldShape, FieldSpec, GameGenre, GenreCatalog, GenreSchema, InputScheme,
    TargetPlatform,
};
pub use client::{
    AuthOutcome, AuthenticatedSession, ContentProvider, EnrichmentError, EnrichmentFragment,
    ExternalContentClient,
};
pub use config::{GameSpec, Resolution, SpecLoadError};
pub use generator::{
    CodeGenerator, Entity, EntityRole, GeneratedArtifact, GeneratorError, Scaffold, Stage,
};
pub use hashing::{canonical_json, compute_job_hash, compute_scaffold_hash};
pub use pipeline::{GameGenerator, Phase, PipelineError};
pub use validation::{ValidationReport, Validator, Violation};

pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");
