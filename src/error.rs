//! Custom error types for sysdiff.

/// Errors raised by the data model during construction and decoding.
///
/// These are fatal by design: unknown or malformed data must never silently
/// enter a system description.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Unknown attributes for kind '{kind}': {names}")]
    UnknownAttributes { kind: String, names: String },

    #[error("Expected an object for kind '{kind}', got {found}")]
    ExpectedObject { kind: String, found: String },

    #[error("Expected an array or an '_elements' object for kind '{kind}', got {found}")]
    ExpectedElements { kind: String, found: String },
}

/// Errors raised by the diff engine.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("Attribute '{name}' of kind '{kind}' is not known to the comparison logic")]
    UnknownAttribute { kind: String, name: String },

    #[error("Cannot compare kind '{left}' with kind '{right}'")]
    KindMismatch { left: String, right: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors raised while building filters.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid matcher argument: expected a string or a list of strings, got {found}")]
    InvalidMatcher { found: String },

    #[error("Invalid filter definition: '{definition}'")]
    InvalidDefinition { definition: String },
}

/// Errors raised while loading system description files.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid system description in {path}: {source}")]
    InvalidDescription {
        path: String,
        #[source]
        source: ModelError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to serialize to JSON: {source}")]
    JsonSerializationError {
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SysdiffError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Compare(#[from] CompareError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl ModelError {
    pub fn unknown_attributes(kind: impl Into<String>, names: &[String]) -> Self {
        Self::UnknownAttributes {
            kind: kind.into(),
            names: names.join(","),
        }
    }

    pub fn expected_object(kind: impl Into<String>, raw: &serde_json::Value) -> Self {
        Self::ExpectedObject {
            kind: kind.into(),
            found: crate::schema::raw_type_name(raw).to_string(),
        }
    }

    pub fn expected_elements(kind: impl Into<String>, raw: &serde_json::Value) -> Self {
        Self::ExpectedElements {
            kind: kind.into(),
            found: crate::schema::raw_type_name(raw).to_string(),
        }
    }
}

impl ParseError {
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn read_error(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn json_error(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonError {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_description(path: impl Into<String>, source: ModelError) -> Self {
        Self::InvalidDescription {
            path: path.into(),
            source,
        }
    }
}
