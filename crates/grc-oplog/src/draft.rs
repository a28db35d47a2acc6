//! Caller-side operation forms.
//!
//! A draft mirrors what an editor collects from the user: every field is
//! optional until the user fills it in. [`OperationDraft::validate`] turns a
//! complete draft into an [`OperationPayload`] ready for
//! [`OperationLog::append`](crate::OperationLog::append), and rejects
//! anything incomplete before it reaches the log.

use grc_types::{
    AddRelation, AddTriple, OperationKind, OperationPayload, RemoveRelation, RemoveTriple, Value,
    ValueType,
};
use serde::{Deserialize, Serialize};

use crate::error::{DraftError, DraftResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum OperationDraft {
    #[serde(rename_all = "camelCase")]
    AddTriple {
        #[serde(default)]
        entity_id: Option<String>,
        #[serde(default)]
        attribute_id: Option<String>,
        /// Defaults to `TEXT` when omitted.
        #[serde(default)]
        value_type: Option<String>,
        #[serde(default)]
        raw_value: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    RemoveTriple {
        #[serde(default)]
        entity_id: Option<String>,
        #[serde(default)]
        attribute_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    AddRelation {
        #[serde(default)]
        from_entity_id: Option<String>,
        #[serde(default)]
        relation_type_id: Option<String>,
        #[serde(default)]
        to_entity_id: Option<String>,
        #[serde(default)]
        relation_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    RemoveRelation {
        #[serde(default)]
        relation_id: Option<String>,
    },
}

impl OperationDraft {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::AddTriple { .. } => OperationKind::AddTriple,
            Self::RemoveTriple { .. } => OperationKind::RemoveTriple,
            Self::AddRelation { .. } => OperationKind::AddRelation,
            Self::RemoveRelation { .. } => OperationKind::RemoveRelation,
        }
    }

    /// Check required fields and value syntax, producing a payload.
    pub fn validate(&self) -> DraftResult<OperationPayload> {
        let kind = self.kind();
        let payload = match self {
            Self::AddTriple {
                entity_id,
                attribute_id,
                value_type,
                raw_value,
            } => {
                let entity_id = required(kind, "entityId", entity_id)?;
                let attribute_id = required(kind, "attributeId", attribute_id)?;
                let value_type = match value_type.as_deref().map(str::trim) {
                    None | Some("") => ValueType::Text,
                    Some(t) => t
                        .parse::<ValueType>()
                        .map_err(|source| DraftError::InvalidValue { kind, source })?,
                };
                let raw_value = raw_value.as_ref().ok_or(DraftError::MissingField {
                    kind,
                    field: "rawValue",
                })?;
                let value = Value::new(value_type, raw_value.clone());
                value
                    .validate()
                    .map_err(|source| DraftError::InvalidValue { kind, source })?;
                OperationPayload::AddTriple(AddTriple {
                    entity_id: entity_id.into(),
                    attribute_id: attribute_id.into(),
                    value,
                })
            }
            Self::RemoveTriple {
                entity_id,
                attribute_id,
            } => OperationPayload::RemoveTriple(RemoveTriple {
                entity_id: required(kind, "entityId", entity_id)?.into(),
                attribute_id: required(kind, "attributeId", attribute_id)?.into(),
            }),
            Self::AddRelation {
                from_entity_id,
                relation_type_id,
                to_entity_id,
                relation_id,
            } => OperationPayload::AddRelation(AddRelation {
                from_entity_id: required(kind, "fromEntityId", from_entity_id)?.into(),
                relation_type_id: required(kind, "relationTypeId", relation_type_id)?.into(),
                to_entity_id: required(kind, "toEntityId", to_entity_id)?.into(),
                relation_id: relation_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(Into::into),
            }),
            Self::RemoveRelation { relation_id } => {
                OperationPayload::RemoveRelation(RemoveRelation {
                    relation_id: required(kind, "relationId", relation_id)?.into(),
                })
            }
        };
        Ok(payload)
    }
}

/// A present, non-blank field, trimmed.
fn required<'a>(
    kind: OperationKind,
    field: &'static str,
    value: &'a Option<String>,
) -> DraftResult<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DraftError::MissingField { kind, field }),
    }
}
