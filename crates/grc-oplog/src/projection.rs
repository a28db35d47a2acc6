use std::collections::BTreeMap;

use grc_types::{
    AttributeId, EntityId, Operation, OperationId, OperationPayload, RelationId, RelationTypeId,
    Value,
};
use serde::Serialize;

/// Read-back view of one entity: the latest value of each attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    pub id: EntityId,
    pub attributes: BTreeMap<AttributeId, Value>,
}

/// Read-back view of one relation edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationRecord {
    /// The explicit relation id, if the operation carried one.
    pub relation_id: Option<RelationId>,
    /// Operation that created the edge. Also accepted as a removal key for
    /// relations added without an explicit id.
    pub operation_id: OperationId,
    pub from_entity_id: EntityId,
    pub relation_type_id: RelationTypeId,
    pub to_entity_id: EntityId,
}

impl RelationRecord {
    fn matches(&self, key: &RelationId) -> bool {
        self.relation_id.as_ref() == Some(key) || self.operation_id.as_str() == key.as_str()
    }
}

/// Entities and relations folded from an operation snapshot.
///
/// This is a display cache with no authority; rebuild it from
/// [`OperationLog::operations`](crate::OperationLog::operations) whenever the
/// log changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GraphProjection {
    pub entities: BTreeMap<EntityId, EntityRecord>,
    pub relations: Vec<RelationRecord>,
}

impl GraphProjection {
    /// Replay `operations` in order. Later writes to the same attribute win.
    pub fn from_operations(operations: &[Operation]) -> Self {
        let mut projection = Self::default();
        for op in operations {
            projection.apply(op);
        }
        projection
    }

    fn apply(&mut self, op: &Operation) {
        match &op.payload {
            OperationPayload::AddTriple(t) => {
                let entity = self
                    .entities
                    .entry(t.entity_id.clone())
                    .or_insert_with(|| EntityRecord {
                        id: t.entity_id.clone(),
                        attributes: BTreeMap::new(),
                    });
                entity.attributes.insert(t.attribute_id.clone(), t.value.clone());
            }
            OperationPayload::RemoveTriple(t) => {
                if let Some(entity) = self.entities.get_mut(&t.entity_id) {
                    entity.attributes.remove(&t.attribute_id);
                    if entity.attributes.is_empty() {
                        self.entities.remove(&t.entity_id);
                    }
                }
            }
            OperationPayload::AddRelation(r) => self.relations.push(RelationRecord {
                relation_id: r.relation_id.clone(),
                operation_id: op.id.clone(),
                from_entity_id: r.from_entity_id.clone(),
                relation_type_id: r.relation_type_id.clone(),
                to_entity_id: r.to_entity_id.clone(),
            }),
            OperationPayload::RemoveRelation(r) => {
                self.relations.retain(|rel| !rel.matches(&r.relation_id));
            }
        }
    }

    pub fn entity(&self, id: &EntityId) -> Option<&EntityRecord> {
        self.entities.get(id)
    }

    /// Relations leaving `from`.
    pub fn relations_from<'a>(
        &'a self,
        from: &'a EntityId,
    ) -> impl Iterator<Item = &'a RelationRecord> + 'a {
        self.relations.iter().filter(move |r| &r.from_entity_id == from)
    }
}

#[cfg(test)]
mod tests {
    use grc_types::{AddRelation, AddTriple, RemoveRelation, RemoveTriple, ValueType};

    use super::*;
    use crate::OperationLog;

    fn set(log: &mut OperationLog, entity: &str, attr: &str, value: &str) {
        log.append(AddTriple {
            entity_id: entity.into(),
            attribute_id: attr.into(),
            value: Value::text(value),
        });
    }

    fn link(log: &mut OperationLog, from: &str, to: &str, id: Option<&str>) -> Operation {
        log.append(AddRelation {
            from_entity_id: from.into(),
            relation_type_id: "R1".into(),
            to_entity_id: to.into(),
            relation_id: id.map(RelationId::from),
        })
    }

    #[test]
    fn last_write_wins() {
        let mut log = OperationLog::new();
        set(&mut log, "E1", "name", "Alice");
        set(&mut log, "E1", "name", "Alicia");
        let p = GraphProjection::from_operations(log.operations());
        let entity = p.entity(&"E1".into()).unwrap();
        assert_eq!(entity.attributes[&AttributeId::from("name")].raw_value, "Alicia");
    }

    #[test]
    fn remove_triple_drops_attribute_and_empty_entity() {
        let mut log = OperationLog::new();
        set(&mut log, "E1", "name", "Alice");
        set(&mut log, "E1", "age", "30");
        log.append(RemoveTriple { entity_id: "E1".into(), attribute_id: "name".into() });
        let p = GraphProjection::from_operations(log.operations());
        assert_eq!(p.entity(&"E1".into()).unwrap().attributes.len(), 1);

        log.append(RemoveTriple { entity_id: "E1".into(), attribute_id: "age".into() });
        let p = GraphProjection::from_operations(log.operations());
        assert!(p.entity(&"E1".into()).is_none());
    }

    #[test]
    fn remove_relation_by_explicit_id() {
        let mut log = OperationLog::new();
        link(&mut log, "E1", "E2", Some("rel-1"));
        link(&mut log, "E1", "E3", Some("rel-2"));
        log.append(RemoveRelation { relation_id: "rel-1".into() });
        let p = GraphProjection::from_operations(log.operations());
        assert_eq!(p.relations.len(), 1);
        assert_eq!(p.relations[0].to_entity_id.as_str(), "E3");
    }

    #[test]
    fn remove_relation_by_operation_id() {
        let mut log = OperationLog::new();
        let op = link(&mut log, "E1", "E2", None);
        log.append(RemoveRelation { relation_id: op.id.as_str().into() });
        let p = GraphProjection::from_operations(log.operations());
        assert!(p.relations.is_empty());
    }

    #[test]
    fn relations_from_filters_by_source() {
        let mut log = OperationLog::new();
        link(&mut log, "E1", "E2", None);
        link(&mut log, "E2", "E3", None);
        let p = GraphProjection::from_operations(log.operations());
        let e1 = EntityId::from("E1");
        let from_e1: Vec<_> = p.relations_from(&e1).collect();
        assert_eq!(from_e1.len(), 1);
        assert_eq!(from_e1[0].to_entity_id.as_str(), "E2");
        let e3 = EntityId::from("E3");
        assert_eq!(p.relations_from(&e3).count(), 0);
    }

    #[test]
    fn typed_values_are_kept() {
        let mut log = OperationLog::new();
        log.append(AddTriple {
            entity_id: "E1".into(),
            attribute_id: "age".into(),
            value: Value::new(ValueType::Number, "30"),
        });
        let p = GraphProjection::from_operations(log.operations());
        let value = &p.entity(&"E1".into()).unwrap().attributes[&AttributeId::from("age")];
        assert_eq!(value.value_type, ValueType::Number);
    }
}
