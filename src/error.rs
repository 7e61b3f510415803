use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompositionError {
    #[error("empty composition: no mixins added")]
    Empty,

    #[error("invalid target '{0}': not a pure capability set")]
    InvalidTarget(String),

    #[error("duplicate mixin id: '{0}'")]
    DuplicateId(String),

    #[error("export hint for '{method}' references unknown id '{target_id}'")]
    InvalidLinkReference { method: String, target_id: String },

    #[error("export hint for '{method}' points to '{target_id}', which does not implement it")]
    ExportHintInvalid { method: String, target_id: String },

    #[error("ambiguous method '{method}': multiple providers {candidates:?}, add an export hint")]
    AmbiguousExport {
        method: String,
        candidates: Vec<String>,
    },

    #[error("no mixin implements '{signature}' required by capability '{capability}'")]
    MissingImplementation { capability: String, signature: String },

    #[error("method not found: '{0}'")]
    FuncNotFound(String),

    #[error("signature mismatch for '{method}': called as {found}, available {available:?}")]
    SignatureMismatch {
        method: String,
        found: String,
        available: Vec<String>,
    },
}
