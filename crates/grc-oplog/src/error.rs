use grc_types::{OperationKind, TypeError};

/// Errors produced while validating an operation draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("{kind}: missing required field `{field}`")]
    MissingField {
        kind: OperationKind,
        field: &'static str,
    },

    #[error("{kind}: {source}")]
    InvalidValue {
        kind: OperationKind,
        #[source]
        source: TypeError,
    },
}

pub type DraftResult<T> = Result<T, DraftError>;
