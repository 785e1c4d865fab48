//! Hospital document model.
//!
//! Hospitals are stored in the [`HOSPITALS`] collection. Appointments live in
//! [`APPOINTMENTS`] and point at their hospital through the
//! [`APPOINTMENT_HOSPITAL_FIELD`] field, which is how list responses embed
//! them and how deletes find the appointments to remove.
//!
//! | Field | Rules |
//! |-------|-------|
//! | `name` | required, unique, trimmed, at most 50 characters |
//! | `address` | required |
//! | `district` | required |
//! | `province` | required |
//! | `postalcode` | required, at most 5 characters |
//! | `tel` | optional |
//! | `region` | required |
//!
//! Fields outside this table are dropped.

use serde_json::{Map, Value};
use vacq_persistence::core::{DependentRelation, DocumentStorage};
use vacq_persistence::error::ValidationError;
use vacq_persistence::types::{FilterExpression, FindQuery};

use crate::error::RestResult;

/// Collection holding hospital documents.
pub const HOSPITALS: &str = "hospitals";

/// Collection holding appointment documents.
pub const APPOINTMENTS: &str = "appointments";

/// Appointment field referencing the hospital's `_id`.
pub const APPOINTMENT_HOSPITAL_FIELD: &str = "hospital";

/// Field under which a listed hospital carries its appointments.
pub const APPOINTMENTS_FIELD: &str = "appointments";

/// Returns the relations removed together with a hospital.
pub fn hospital_dependents() -> [DependentRelation; 1] {
    [DependentRelation::new(APPOINTMENTS, APPOINTMENT_HOSPITAL_FIELD)]
}

struct FieldRule {
    name: &'static str,
    required: bool,
    trim: bool,
    max_len: Option<usize>,
}

const HOSPITAL_FIELDS: [FieldRule; 7] = [
    FieldRule {
        name: "name",
        required: true,
        trim: true,
        max_len: Some(50),
    },
    FieldRule {
        name: "address",
        required: true,
        trim: false,
        max_len: None,
    },
    FieldRule {
        name: "district",
        required: true,
        trim: false,
        max_len: None,
    },
    FieldRule {
        name: "province",
        required: true,
        trim: false,
        max_len: None,
    },
    FieldRule {
        name: "postalcode",
        required: true,
        trim: false,
        max_len: Some(5),
    },
    FieldRule {
        name: "tel",
        required: false,
        trim: false,
        max_len: None,
    },
    FieldRule {
        name: "region",
        required: true,
        trim: false,
        max_len: None,
    },
];

/// Validation of hospital request bodies.
pub struct HospitalSchema;

impl HospitalSchema {
    /// Validates a complete hospital for creation.
    ///
    /// Returns the accepted fields; every required field must be present.
    pub fn validate_new(body: Value) -> Result<Map<String, Value>, ValidationError> {
        let mut input = into_object(body)?;
        let mut accepted = Map::new();

        for rule in &HOSPITAL_FIELDS {
            match input.remove(rule.name) {
                Some(value) => {
                    if let Some(value) = rule.check(value)? {
                        accepted.insert(rule.name.to_string(), value);
                    }
                }
                None if rule.required => {
                    return Err(ValidationError::MissingRequiredField {
                        field: rule.name.to_string(),
                    });
                }
                None => {}
            }
        }

        Ok(accepted)
    }

    /// Validates a partial update; only the provided fields are checked.
    pub fn validate_changes(body: Value) -> Result<Map<String, Value>, ValidationError> {
        let mut input = into_object(body)?;
        let mut accepted = Map::new();

        for rule in &HOSPITAL_FIELDS {
            if let Some(value) = input.remove(rule.name) {
                let value = rule.check(value)?.unwrap_or(Value::Null);
                accepted.insert(rule.name.to_string(), value);
            }
        }

        Ok(accepted)
    }
}

impl FieldRule {
    /// Checks one provided value; `None` means an explicit null on an
    /// optional field.
    fn check(&self, value: Value) -> Result<Option<Value>, ValidationError> {
        let text = match value {
            Value::Null if !self.required => return Ok(None),
            Value::Null => {
                return Err(ValidationError::MissingRequiredField {
                    field: self.name.to_string(),
                });
            }
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(ValidationError::InvalidField {
                    field: self.name.to_string(),
                    message: "expected a string".to_string(),
                });
            }
        };

        let text = if self.trim {
            text.trim().to_string()
        } else {
            text
        };

        if self.required && text.is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field: self.name.to_string(),
            });
        }

        match self.max_len {
            Some(max) if text.chars().count() > max => {
                return Err(ValidationError::InvalidField {
                    field: self.name.to_string(),
                    message: format!("can not be more than {} characters", max),
                });
            }
            _ => {}
        }

        Ok(Some(Value::String(text)))
    }
}

fn into_object(body: Value) -> Result<Map<String, Value>, ValidationError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ValidationError::InvalidDocument {
            message: "request body must be a JSON object".to_string(),
        }),
    }
}

/// Fails if another hospital already uses `name`.
///
/// `except` names the hospital being updated, which may keep its own name.
pub async fn ensure_unique_name<S>(storage: &S, name: &str, except: Option<&str>) -> RestResult<()>
where
    S: DocumentStorage + ?Sized,
{
    let query = FindQuery::new()
        .with_filter(FilterExpression::new().eq("name", name))
        .with_limit(2);
    let taken = storage
        .find(HOSPITALS, &query)
        .await?
        .iter()
        .any(|existing| Some(existing.id()) != except);

    if taken {
        return Err(ValidationError::DuplicateValue {
            field: "name".to_string(),
            value: name.to_string(),
        }
        .into());
    }
    Ok(())
}
