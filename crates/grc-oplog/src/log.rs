use grc_types::{Operation, OperationId, OperationPayload};

/// Ordered, append-only log of edit operations awaiting publication.
///
/// The log is the single source of truth for what will be published.
/// Operations are never mutated in place; the only ways to shrink the log
/// are [`remove_by_id`](Self::remove_by_id) and [`clear`](Self::clear).
/// Insertion order is publish order: later operations on the same
/// entity/attribute supersede earlier ones downstream.
///
/// The log performs no validation. Callers validate with
/// [`OperationDraft::validate`](crate::OperationDraft::validate) first.
#[derive(Clone, Debug, Default)]
pub struct OperationLog {
    operations: Vec<Operation>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `payload` with a fresh id and the current time, append it, and
    /// return the created record. Logically redundant operations are kept.
    pub fn append(&mut self, payload: impl Into<OperationPayload>) -> Operation {
        let operation = Operation::new(payload);
        tracing::debug!(
            id = %operation.id,
            kind = %operation.kind(),
            len = self.operations.len() + 1,
            "operation appended"
        );
        self.operations.push(operation.clone());
        operation
    }

    /// Remove the first operation with `id`. Returns whether one was removed.
    pub fn remove_by_id(&mut self, id: &OperationId) -> bool {
        match self.operations.iter().position(|op| &op.id == id) {
            Some(index) => {
                self.operations.remove(index);
                tracing::debug!(%id, len = self.operations.len(), "operation removed");
                true
            }
            None => false,
        }
    }

    /// Drop every operation. Irreversible.
    pub fn clear(&mut self) {
        tracing::debug!(dropped = self.operations.len(), "operation log cleared");
        self.operations.clear();
    }

    /// Current contents in insertion order.
    pub fn snapshot(&self) -> Vec<Operation> {
        self.operations.clone()
    }

    /// Borrowing view of the current contents.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn get(&self, id: &OperationId) -> Option<&Operation> {
        self.operations.iter().find(|op| &op.id == id)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
