use std::fmt;

use serde_json::Value;

use crate::foundation::core::AspectRatio;
use crate::scene::model::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaPathElem {
    Field(&'static str),
    Key(String),
}

#[derive(Debug, Clone)]
pub struct SchemaError {
    pub path: Vec<SchemaPathElem>,
    pub message: String,
}

impl SchemaError {
    fn at(path: &[SchemaPathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

fn format_path(path: &[SchemaPathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match p {
            SchemaPathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            SchemaPathElem::Key(key) => {
                s.push_str("[\"");
                s.push_str(key);
                s.push_str("\"]");
            }
        }
    }
    s
}

#[derive(Debug, Clone)]
pub struct SchemaErrors {
    pub errors: Vec<SchemaError>,
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

/// Why a persisted document was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidKind {
    /// Not parseable as JSON at all.
    Corrupt,
    /// Parseable, but not the current document shape.
    SchemaMismatch,
}

/// Outcome of validating a persisted settings document. Validation never fails past this
/// boundary: anything that is not a usable [`AppState`] is reported as `Invalid`.
#[derive(Debug, Clone)]
pub enum PersistedDocument {
    Valid(AppState),
    Invalid {
        kind: InvalidKind,
        errors: SchemaErrors,
    },
}

impl PersistedDocument {
    pub fn into_state(self) -> Option<AppState> {
        match self {
            Self::Valid(state) => Some(state),
            Self::Invalid { .. } => None,
        }
    }
}

/// Validate a raw settings document.
///
/// Shape checks run first so a mismatched document reports every structural problem (missing
/// formats, missing content) rather than the first serde error.
pub fn validate_document(raw: &str) -> PersistedDocument {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            return PersistedDocument::Invalid {
                kind: InvalidKind::Corrupt,
                errors: SchemaErrors {
                    errors: vec![SchemaError::at(&[], format!("not valid JSON: {e}"))],
                },
            };
        }
    };

    let mut errors = Vec::new();
    validate_shape(&value, &mut errors);
    if !errors.is_empty() {
        return mismatch(errors);
    }

    let state: AppState = match serde_json::from_value(value) {
        Ok(s) => s,
        Err(e) => return mismatch(vec![SchemaError::at(&[], e.to_string())]),
    };

    for ratio in AspectRatio::ALL {
        let tagged = state.format(ratio).aspect_ratio;
        if tagged != ratio {
            errors.push(SchemaError::at(
                &[
                    SchemaPathElem::Field("flyerStates"),
                    SchemaPathElem::Key(ratio.to_string()),
                    SchemaPathElem::Field("aspectRatio"),
                ],
                format!("format stored under \"{ratio}\" is tagged \"{tagged}\""),
            ));
        }
    }
    if !errors.is_empty() {
        return mismatch(errors);
    }

    PersistedDocument::Valid(state)
}

fn mismatch(errors: Vec<SchemaError>) -> PersistedDocument {
    PersistedDocument::Invalid {
        kind: InvalidKind::SchemaMismatch,
        errors: SchemaErrors { errors },
    }
}

fn validate_shape(value: &Value, errors: &mut Vec<SchemaError>) {
    let Some(root) = value.as_object() else {
        errors.push(SchemaError::at(&[], "document must be an object"));
        return;
    };

    match root.get("activeAspectRatio").and_then(Value::as_str) {
        Some(s) if s.parse::<AspectRatio>().is_ok() => {}
        Some(s) => errors.push(SchemaError::at(
            &[SchemaPathElem::Field("activeAspectRatio")],
            format!("unknown aspect ratio \"{s}\""),
        )),
        None => errors.push(SchemaError::at(
            &[SchemaPathElem::Field("activeAspectRatio")],
            "missing or not a string",
        )),
    }

    let states_path = [SchemaPathElem::Field("flyerStates")];
    let Some(states) = root.get("flyerStates").and_then(Value::as_object) else {
        errors.push(SchemaError::at(&states_path, "missing or not an object"));
        return;
    };

    for ratio in AspectRatio::ALL {
        let path = [
            SchemaPathElem::Field("flyerStates"),
            SchemaPathElem::Key(ratio.to_string()),
        ];
        let Some(slot) = states.get(ratio.as_str()) else {
            errors.push(SchemaError::at(&path, "format slot is missing"));
            continue;
        };
        if !slot.get("flyerContent").is_some_and(Value::is_object) {
            let mut p = path.to_vec();
            p.push(SchemaPathElem::Field("flyerContent"));
            errors.push(SchemaError::at(&p, "missing or not an object"));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/validate.rs"]
mod tests;
