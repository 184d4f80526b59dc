//! Code Generator - The Generator Shapes, Never Invents
//!
//! Deterministic, genre-driven scaffold assembly plus pluggable per-engine
//! code emission. Every value in a scaffold comes from the validated
//! specification; a required detail that is absent here means validation
//! was bypassed and is reported as a fault, never papered over.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::catalog::{GameGenre, InputScheme, TargetPlatform};
use crate::client::EnrichmentFragment;
use crate::config::GameSpec;
use crate::hashing::{compute_job_hash, compute_scaffold_hash};
use crate::GENERATOR_VERSION;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Unsupported engine: {engine} (supported: {})", .supported.join(", "))]
    UnsupportedEngine {
        engine: String,
        supported: Vec<String>,
    },

    #[error("Required detail '{field}' absent or malformed at generation time")]
    MissingDetail { field: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntityRole {
    Fighter,
    Vehicle,
    Enemy,
    PartyClass,
    Piece,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity {
    pub id: String,
    pub role: EntityRole,
}

/// Where play happens, per genre.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Stage {
    Arena(String),
    Circuit(Vec<String>),
    World(String),
    Board(String),
    Battlefield(String),
}

/// Skeletal structure of a playable prototype, prior to engine-specific
/// code emission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scaffold {
    pub entities: Vec<Entity>,
    pub stage: Stage,
    pub parameters: BTreeMap<String, u64>,
    pub hooks: Vec<String>,
    /// Remotely generated narrative text, merged additively.
    pub narrative: Vec<String>,
    pub input_scheme: InputScheme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub id: String,
    pub genre: GameGenre,
    pub engine: String,
    pub platform: TargetPlatform,
    pub generator_version: String,
    pub created_at: DateTime<Utc>,
    pub scaffold: Scaffold,
    pub enrichment: Vec<EnrichmentFragment>,
    pub code: String,
    pub scaffold_hash: String,
    pub job_hash: String,
}

/// Engine-specific code emission strategy, selected by `spec.engine`.
pub trait EngineBackend {
    fn name(&self) -> &'static str;
    fn emit(&self, spec: &GameSpec, scaffold: &Scaffold) -> String;
}

/// Engine-neutral headless target: a plain tick-loop skeleton.
pub struct SimBackend;

impl EngineBackend for SimBackend {
    fn name(&self) -> &'static str {
        "sim"
    }

    fn emit(&self, spec: &GameSpec, scaffold: &Scaffold) -> String {
        let entity_ids: Vec<&str> = scaffold.entities.iter().map(|e| e.id.as_str()).collect();
        let mut code = String::new();
        code.push_str(&format!(
            "// {} prototype, headless simulation target\n",
            spec.genre
        ));
        code.push_str(&format!(
            "// {}x{} @ {} fps, input: {:?}\n\n",
            spec.resolution.width, spec.resolution.height, spec.target_fps, scaffold.input_scheme
        ));
        code.push_str("fn main() {\n");
        code.push_str(&format!(
            "    let mut world = World::new(&{entity_ids:?});\n"
        ));
        code.push_str(&format!("    world.set_stage({:?});\n", stage_label(&scaffold.stage)));
        for (name, value) in &scaffold.parameters {
            code.push_str(&format!("    world.set_parameter({name:?}, {value});\n"));
        }
        for hook in &scaffold.hooks {
            code.push_str(&format!("    world.register_hook({hook:?});\n"));
        }
        code.push_str(&format!(
            "    let mut clock = FixedStep::per_second({});\n",
            spec.target_fps
        ));
        code.push_str("    while world.running() {\n");
        code.push_str("        clock.wait();\n");
        code.push_str("        world.tick();\n");
        code.push_str("    }\n");
        code.push_str("}\n");
        code
    }
}

/// Bevy application skeleton.
pub struct BevyBackend;

impl EngineBackend for BevyBackend {
    fn name(&self) -> &'static str {
        "bevy"
    }

    fn emit(&self, spec: &GameSpec, scaffold: &Scaffold) -> String {
        let mut code = String::new();
        code.push_str(&format!("// {} prototype, Bevy target\n\n", spec.genre));
        code.push_str("use bevy::prelude::*;\n\n");
        code.push_str("fn main() {\n");
        code.push_str("    App::new()\n");
        code.push_str("        .add_plugins(DefaultPlugins.set(WindowPlugin {\n");
        code.push_str("            primary_window: Some(Window {\n");
        code.push_str(&format!(
            "                resolution: ({}., {}.).into(),\n",
            spec.resolution.width, spec.resolution.height
        ));
        code.push_str("                ..default()\n");
        code.push_str("            }),\n");
        code.push_str("            ..default()\n");
        code.push_str("        }))\n");
        code.push_str("        .add_systems(Startup, spawn_entities)\n");
        code.push_str("        .add_systems(Update, tick)\n");
        code.push_str("        .run();\n");
        code.push_str("}\n\n");
        code.push_str("fn spawn_entities(mut commands: Commands) {\n");
        for entity in &scaffold.entities {
            code.push_str(&format!(
                "    commands.spawn(Name::new({:?}));\n",
                entity.id
            ));
        }
        code.push_str("}\n\n");
        code.push_str("fn tick() {}\n");
        code
    }
}

fn stage_label(stage: &Stage) -> String {
    match stage {
        Stage::Arena(id) => format!("arena:{id}"),
        Stage::Circuit(tracks) => format!("circuit:{}", tracks.join("+")),
        Stage::World(theme) => format!("world:{theme}"),
        Stage::Board(layout) => format!("board:{layout}"),
        Stage::Battlefield(id) => format!("battlefield:{id}"),
    }
}

/// The code generator - turns a validated specification (and optional
/// enrichment) into a generated-game artifact.
pub struct CodeGenerator {
    backends: Vec<Box<dyn EngineBackend>>,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            backends: vec![Box::new(SimBackend), Box::new(BevyBackend)],
        }
    }

    pub fn supported_engines(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.name().to_string()).collect()
    }

    fn backend_for(&self, engine: &str) -> Result<&dyn EngineBackend, GeneratorError> {
        self.backends
            .iter()
            .find(|backend| backend.name() == engine)
            .map(|backend| backend.as_ref())
            .ok_or_else(|| GeneratorError::UnsupportedEngine {
                engine: engine.to_string(),
                supported: self.supported_engines(),
            })
    }

    pub fn generate(
        &self,
        spec: &GameSpec,
        enrichment: Vec<EnrichmentFragment>,
    ) -> Result<GeneratedArtifact, GeneratorError> {
        let backend = self.backend_for(&spec.engine)?;
        let mut scaffold = assemble_scaffold(spec)?;
        let merged = apply_enrichment(&mut scaffold, enrichment);
        let code = backend.emit(spec, &scaffold);

        let scaffold_hash = compute_scaffold_hash(&scaffold)?;
        let job_hash = compute_job_hash(
            spec.genre.as_str(),
            &spec.engine,
            spec,
            GENERATOR_VERSION,
        )?;
        debug!(genre = %spec.genre, engine = backend.name(), %job_hash, "Scaffold assembled");

        Ok(GeneratedArtifact {
            id: Uuid::new_v4().to_string(),
            genre: spec.genre,
            engine: spec.engine.clone(),
            platform: spec.platform,
            generator_version: GENERATOR_VERSION.to_string(),
            created_at: Utc::now(),
            scaffold,
            enrichment: merged,
            code,
            scaffold_hash,
            job_hash,
        })
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Genre-keyed mapping from validated details to scaffold structure.
fn assemble_scaffold(spec: &GameSpec) -> Result<Scaffold, GeneratorError> {
    let details = &spec.details;
    let (entities, stage, parameter, hooks) = match spec.genre {
        GameGenre::Fighting => (
            entities(details, "characters", EntityRole::Fighter)?,
            Stage::Arena(identifier(details, "environment")?),
            ("moves_per_character", count(details, "moves_per_character")?),
            identifier_list(details, "special_effects")?,
        ),
        GameGenre::Racing => (
            entities(details, "vehicles", EntityRole::Vehicle)?,
            Stage::Circuit(identifier_list(details, "tracks")?),
            ("laps", count(details, "laps")?),
            identifier_list(details, "hazards")?,
        ),
        GameGenre::Platformer => (
            entities(details, "enemies", EntityRole::Enemy)?,
            Stage::World(identifier(details, "world_theme")?),
            ("level_count", count(details, "level_count")?),
            identifier_list(details, "powerups")?,
        ),
        GameGenre::Rpg => (
            entities(details, "party_classes", EntityRole::PartyClass)?,
            Stage::World(identifier(details, "setting")?),
            ("quest_count", count(details, "quest_count")?),
            identifier_list(details, "magic_schools")?,
        ),
        GameGenre::Puzzle => (
            entities(details, "piece_types", EntityRole::Piece)?,
            Stage::Board(identifier(details, "board_layout")?),
            ("difficulty_levels", count(details, "difficulty_levels")?),
            identifier_list(details, "mechanics")?,
        ),
        GameGenre::Shooter => (
            entities(details, "enemy_types", EntityRole::Enemy)?,
            Stage::Battlefield(identifier(details, "battlefield")?),
            ("weapon_slots", count(details, "weapon_slots")?),
            identifier_list(details, "pickups")?,
        ),
    };

    Ok(Scaffold {
        entities,
        stage,
        parameters: BTreeMap::from([(parameter.0.to_string(), parameter.1)]),
        hooks,
        narrative: vec![],
        input_scheme: spec.platform.input_scheme(),
    })
}

/// Appends fragments to the scaffold and returns the merged list for the
/// artifact record. Fragments never replace caller-supplied content.
fn apply_enrichment(
    scaffold: &mut Scaffold,
    fragments: Vec<EnrichmentFragment>,
) -> Vec<EnrichmentFragment> {
    for fragment in &fragments {
        match fragment.section.as_str() {
            "hooks" => scaffold.hooks.push(fragment.content.clone()),
            _ => scaffold
                .narrative
                .push(format!("[{}] {}", fragment.section, fragment.content)),
        }
    }
    fragments
}

// --- Detail extraction ---
//
// Validation has already confirmed presence and shape; a miss here is a
// pipeline fault, reported as MissingDetail.

fn identifier_list(
    details: &HashMap<String, Value>,
    key: &str,
) -> Result<Vec<String>, GeneratorError> {
    details
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .ok_or_else(|| GeneratorError::MissingDetail {
            field: key.to_string(),
        })
}

fn identifier(
    details: &HashMap<String, Value>,
    key: &str,
) -> Result<String, GeneratorError> {
    details
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| GeneratorError::MissingDetail {
            field: key.to_string(),
        })
}

fn count(
    details: &HashMap<String, Value>,
    key: &str,
) -> Result<u64, GeneratorError> {
    details
        .get(key)
        .and_then(Value::as_u64)
        .ok_or_else(|| GeneratorError::MissingDetail {
            field: key.to_string(),
        })
}

fn entities(
    details: &HashMap<String, Value>,
    key: &str,
    role: EntityRole,
) -> Result<Vec<Entity>, GeneratorError> {
    Ok(identifier_list(details, key)?
        .into_iter()
        .map(|id| Entity { id, role })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighting_spec() -> GameSpec {
        GameSpec::from_json(
            r#"{
                "genre": "fighting",
                "details": {
                    "characters": ["robot_warrior", "cyborg_ninja"],
                    "environment": "futuristic_arena",
                    "moves_per_character": 8,
                    "special_effects": ["laser_trails"]
                },
                "engine": "sim",
                "resolution": {"width": 1280, "height": 720},
                "target_fps": 60
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn fighting_scaffold_maps_details() {
        let artifact = CodeGenerator::new().generate(&fighting_spec(), vec![]).unwrap();

        assert_eq!(artifact.scaffold.entities.len(), 2);
        assert_eq!(artifact.scaffold.entities[0].role, EntityRole::Fighter);
        assert_eq!(
            artifact.scaffold.stage,
            Stage::Arena("futuristic_arena".to_string())
        );
        assert_eq!(artifact.scaffold.parameters["moves_per_character"], 8);
        assert_eq!(artifact.scaffold.hooks, vec!["laser_trails".to_string()]);
        assert!(artifact.code.contains("fn main()"));
    }

    #[test]
    fn unsupported_engine_names_supported_set() {
        let mut spec = fighting_spec();
        spec.engine = "unreal".to_string();

        let err = CodeGenerator::new().generate(&spec, vec![]).unwrap_err();
        match err {
            GeneratorError::UnsupportedEngine { engine, supported } => {
                assert_eq!(engine, "unreal");
                assert_eq!(supported, vec!["sim".to_string(), "bevy".to_string()]);
            }
            other => panic!("expected UnsupportedEngine, got {other:?}"),
        }
    }

    #[test]
    fn bevy_backend_emits_app_skeleton() {
        let mut spec = fighting_spec();
        spec.engine = "bevy".to_string();

        let artifact = CodeGenerator::new().generate(&spec, vec![]).unwrap();
        assert!(artifact.code.contains("App::new()"));
        assert!(artifact.code.contains("robot_warrior"));
    }

    #[test]
    fn enrichment_appends_never_replaces() {
        let fragments = vec![
            EnrichmentFragment {
                section: "hooks".to_string(),
                content: "slow_motion_finish".to_string(),
            },
            EnrichmentFragment {
                section: "lore".to_string(),
                content: "Two rivals meet in the arena.".to_string(),
            },
        ];

        let artifact = CodeGenerator::new()
            .generate(&fighting_spec(), fragments)
            .unwrap();

        assert_eq!(
            artifact.scaffold.hooks,
            vec!["laser_trails".to_string(), "slow_motion_finish".to_string()]
        );
        assert_eq!(artifact.scaffold.narrative.len(), 1);
        assert_eq!(artifact.enrichment.len(), 2);
        // Caller-supplied structure untouched.
        assert_eq!(artifact.scaffold.entities.len(), 2);
    }

    #[test]
    fn generation_is_deterministic_per_inputs() {
        let generator = CodeGenerator::new();
        let spec = fighting_spec();

        let first = generator.generate(&spec, vec![]).unwrap();
        let second = generator.generate(&spec, vec![]).unwrap();

        assert_eq!(first.job_hash, second.job_hash);
        assert_eq!(first.scaffold_hash, second.scaffold_hash);
        assert_eq!(first.scaffold, second.scaffold);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn missing_detail_is_a_fault_not_a_panic() {
        let mut spec = fighting_spec();
        spec.details.remove("environment");

        let err = CodeGenerator::new().generate(&spec, vec![]).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::MissingDetail { ref field } if field == "environment"
        ));
    }

    #[test]
    fn touch_platforms_get_touch_input_scheme() {
        let mut spec = fighting_spec();
        spec.platform = TargetPlatform::Android;

        let artifact = CodeGenerator::new().generate(&spec, vec![]).unwrap();
        assert_eq!(artifact.scaffold.input_scheme, InputScheme::Touch);
    }
}
