//! Errors raised while turning a draft into a network

/// Every failure is a deterministic input problem, so nothing here is retried
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    /// A numeric field cannot be used as given
    #[error("malformed quantity for `{field}`: got {value}, expected {expected}")]
    MalformedQuantity {
        field: String,
        value: String,
        expected: String,
    },

    /// Two sources disagree about the same attribute of the same target
    #[error("conflicting values for `{field}` on `{target}`: {first} vs {second}")]
    ConflictingAttribute {
        target: String,
        field: String,
        first: String,
        second: String,
    },

    /// A structural field needed to pick or build a topology is missing
    #[error("network is underspecified: `{field}` is required {context}")]
    UnderspecifiedNetwork { field: String, context: String },

    /// The fields are well formed but describe an impossible network
    #[error("invalid topology: `{field}` = {value}, {constraint}")]
    InvalidTopology {
        field: String,
        value: String,
        constraint: String,
    },
}

impl GenerationError {
    pub fn malformed(field: impl Into<String>, value: impl ToString, expected: impl Into<String>) -> Self {
        GenerationError::MalformedQuantity {
            field: field.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    pub fn underspecified(field: impl Into<String>, context: impl Into<String>) -> Self {
        GenerationError::UnderspecifiedNetwork {
            field: field.into(),
            context: context.into(),
        }
    }

    pub fn invalid_topology(
        field: impl Into<String>,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        GenerationError::InvalidTopology {
            field: field.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Name of the field the error is about
    pub fn field(&self) -> &str {
        match self {
            GenerationError::MalformedQuantity { field, .. }
            | GenerationError::ConflictingAttribute { field, .. }
            | GenerationError::UnderspecifiedNetwork { field, .. }
            | GenerationError::InvalidTopology { field, .. } => field,
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
