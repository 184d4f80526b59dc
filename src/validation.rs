//! Validation System - Validation Is Protective
//!
//! Rules produce structured violations. Every rule always runs, so a
//! rejected specification reports the complete violation list, not just
//! the first problem.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{FieldShape, FieldSpec, GameGenre, GenreSchema};
use crate::config::GameSpec;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub genre: GameGenre,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn success(genre: GameGenre) -> Self {
        Self {
            valid: true,
            genre,
            violations: vec![],
        }
    }

    pub fn failure(genre: GameGenre, violations: Vec<Violation>) -> Self {
        Self {
            valid: false,
            genre,
            violations,
        }
    }

    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn check(&self, spec: &GameSpec, schema: &GenreSchema) -> Vec<Violation>;
}

// --- Concrete Rules ---

pub struct ResolutionRule;

impl ValidationRule for ResolutionRule {
    fn name(&self) -> &'static str {
        "resolution"
    }

    fn check(&self, spec: &GameSpec, _schema: &GenreSchema) -> Vec<Violation> {
        let res = spec.resolution;
        if res.width == 0 || res.height == 0 {
            vec![Violation {
                field: "resolution".to_string(),
                message: "Resolution dimensions must be positive".to_string(),
                expected: Some("width > 0 and height > 0".to_string()),
                actual: Some(format!("{}x{}", res.width, res.height)),
                remediation: vec!["Set both width and height to positive pixel counts".to_string()],
            }]
        } else {
            vec![]
        }
    }
}

pub struct FrameRateRule;

impl ValidationRule for FrameRateRule {
    fn name(&self) -> &'static str {
        "frame_rate"
    }

    fn check(&self, spec: &GameSpec, _schema: &GenreSchema) -> Vec<Violation> {
        if spec.target_fps == 0 {
            vec![Violation {
                field: "target_fps".to_string(),
                message: "Target frame rate must be positive".to_string(),
                expected: Some("target_fps > 0".to_string()),
                actual: Some("0".to_string()),
                remediation: vec!["Pick a positive frame-rate target, e.g. 60".to_string()],
            }]
        } else {
            vec![]
        }
    }
}

/// Checks every schema-required field for presence and shape. Extra keys
/// in the details payload are not violations.
pub struct GenreFieldsRule;

impl ValidationRule for GenreFieldsRule {
    fn name(&self) -> &'static str {
        "genre_fields"
    }

    fn check(&self, spec: &GameSpec, schema: &GenreSchema) -> Vec<Violation> {
        let mut violations = vec![];

        for field in &schema.fields {
            match spec.details.get(&field.name) {
                None => violations.push(missing_field(field)),
                Some(value) => {
                    if let Some(actual) = shape_mismatch(field.shape, value) {
                        violations.push(malformed_field(field, actual));
                    }
                }
            }
        }

        violations
    }
}

fn missing_field(field: &FieldSpec) -> Violation {
    Violation {
        field: field.name.clone(),
        message: "Required detail field is missing".to_string(),
        expected: Some(field.shape.describe().to_string()),
        actual: None,
        remediation: vec![format!("Add '{}' to the spec details", field.name)],
    }
}

fn malformed_field(field: &FieldSpec, actual: String) -> Violation {
    Violation {
        field: field.name.clone(),
        message: "Detail field does not satisfy its declared shape".to_string(),
        expected: Some(field.shape.describe().to_string()),
        actual: Some(actual),
        remediation: vec![format!(
            "Provide '{}' as a {}",
            field.name,
            field.shape.describe()
        )],
    }
}

/// Returns a description of the offending value when it fails the shape,
/// None when it conforms.
fn shape_mismatch(shape: FieldShape, value: &Value) -> Option<String> {
    match shape {
        FieldShape::IdentifierList => match value.as_array() {
            Some(items) if items.is_empty() => Some("empty list".to_string()),
            Some(items) => {
                let all_identifiers = items
                    .iter()
                    .all(|item| item.as_str().is_some_and(|s| !s.is_empty()));
                if all_identifiers {
                    None
                } else {
                    Some("list with non-identifier entries".to_string())
                }
            }
            None => Some(json_type_name(value).to_string()),
        },
        FieldShape::Identifier => match value.as_str() {
            Some("") => Some("empty string".to_string()),
            Some(_) => None,
            None => Some(json_type_name(value).to_string()),
        },
        FieldShape::Count => match value.as_u64() {
            Some(0) => Some("0".to_string()),
            Some(_) => None,
            None => Some(json_type_name(value).to_string()),
        },
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validator runs every rule and aggregates the violations
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(ResolutionRule),
                Box::new(FrameRateRule),
                Box::new(GenreFieldsRule),
            ],
        }
    }

    /// Pure and idempotent: identical input yields an identical report.
    pub fn validate(&self, spec: &GameSpec, schema: &GenreSchema) -> ValidationReport {
        let mut all_violations = vec![];

        for rule in &self.rules {
            all_violations.extend(rule.check(spec, schema));
        }

        if all_violations.is_empty() {
            ValidationReport::success(spec.genre)
        } else {
            ValidationReport::failure(spec.genre, all_violations)
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
