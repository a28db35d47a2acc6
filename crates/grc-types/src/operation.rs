use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{AttributeId, EntityId, OperationId, RelationId, RelationTypeId};
use crate::value::Value;

/// The four kinds of edit a user can author.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    AddTriple,
    RemoveTriple,
    AddRelation,
    RemoveRelation,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddTriple => "AddTriple",
            Self::RemoveTriple => "RemoveTriple",
            Self::AddRelation => "AddRelation",
            Self::RemoveRelation => "RemoveRelation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set an attribute of an entity to a value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTriple {
    pub entity_id: EntityId,
    pub attribute_id: AttributeId,
    pub value: Value,
}

/// Delete an attribute from an entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveTriple {
    pub entity_id: EntityId,
    pub attribute_id: AttributeId,
}

/// Connect two entities with a typed, directed edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRelation {
    pub from_entity_id: EntityId,
    pub relation_type_id: RelationTypeId,
    pub to_entity_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_id: Option<RelationId>,
}

/// Delete a relation edge by its id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRelation {
    pub relation_id: RelationId,
}

/// Kind-specific body of an [`Operation`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum OperationPayload {
    AddTriple(AddTriple),
    RemoveTriple(RemoveTriple),
    AddRelation(AddRelation),
    RemoveRelation(RemoveRelation),
}

impl OperationPayload {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::AddTriple(_) => OperationKind::AddTriple,
            Self::RemoveTriple(_) => OperationKind::RemoveTriple,
            Self::AddRelation(_) => OperationKind::AddRelation,
            Self::RemoveRelation(_) => OperationKind::RemoveRelation,
        }
    }

    /// One-line human summary, e.g. `E1.A1 = TEXT "Alice"`.
    pub fn summary(&self) -> String {
        match self {
            Self::AddTriple(t) => format!(
                "{}.{} = {} {:?}",
                t.entity_id, t.attribute_id, t.value.value_type, t.value.raw_value
            ),
            Self::RemoveTriple(t) => format!("{}.{} removed", t.entity_id, t.attribute_id),
            Self::AddRelation(r) => format!(
                "{} -[{}]-> {}",
                r.from_entity_id, r.relation_type_id, r.to_entity_id
            ),
            Self::RemoveRelation(r) => format!("relation {} removed", r.relation_id),
        }
    }
}

impl From<AddTriple> for OperationPayload {
    fn from(op: AddTriple) -> Self {
        Self::AddTriple(op)
    }
}

impl From<RemoveTriple> for OperationPayload {
    fn from(op: RemoveTriple) -> Self {
        Self::RemoveTriple(op)
    }
}

impl From<AddRelation> for OperationPayload {
    fn from(op: AddRelation) -> Self {
        Self::AddRelation(op)
    }
}

impl From<RemoveRelation> for OperationPayload {
    fn from(op: RemoveRelation) -> Self {
        Self::RemoveRelation(op)
    }
}

/// One user-authored edit intent, as recorded in the operation log.
///
/// Operations are immutable once created. `created_at` is for display
/// ordering only; publish order is the log's insertion order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: OperationId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: OperationPayload,
}

impl Operation {
    /// Stamp a payload with a fresh id and the current time.
    pub fn new(payload: impl Into<OperationPayload>) -> Self {
        Self {
            id: OperationId::generate(),
            created_at: Utc::now(),
            payload: payload.into(),
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.payload.kind()
    }
}
