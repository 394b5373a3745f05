use thiserror::Error;

/// Result type alias using HoardError
pub type Result<T> = std::result::Result<T, HoardError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Callers branch on the kind, never on message text. `NotFound` and
/// `Conflict` are expected outcomes of normal control flow; every other
/// kind is an engine-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HxErrorKind {
    /// An id, module or key segment is malformed (empty, or contains `/`)
    InvalidInput,
    NotFound,
    /// Uniqueness violation (duplicate email, primary key already present)
    Conflict,
    Serialization,
    Persistence,
    /// The engine refused the transaction because of a concurrent writer
    Concurrency,
    Io,
    /// A schema migration failed or the registry is malformed
    Migration,
    Config,
    Internal,
}

impl HxErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            HxErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            HxErrorKind::NotFound => "ERR_NOT_FOUND",
            HxErrorKind::Conflict => "ERR_CONFLICT",
            HxErrorKind::Serialization => "ERR_SERIALIZATION",
            HxErrorKind::Persistence => "ERR_PERSISTENCE",
            HxErrorKind::Concurrency => "ERR_CONCURRENCY",
            HxErrorKind::Io => "ERR_IO",
            HxErrorKind::Migration => "ERR_MIGRATION",
            HxErrorKind::Config => "ERR_CONFIG",
            HxErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for kinds that represent normal control flow rather than failures
    pub fn is_expected(&self) -> bool {
        matches!(self, HxErrorKind::NotFound | HxErrorKind::Conflict)
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, entity id, raw key) for debugging.
#[derive(Debug, Clone)]
pub struct HxError {
    kind: HxErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    key: Option<String>,
    message: String,
}

impl HxError {
    /// Create a new error with the specified kind
    pub fn new(kind: HxErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            key: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add the raw store key involved, rendered lossily as UTF-8
    pub fn with_key(mut self, key: &[u8]) -> Self {
        self.key = Some(String::from_utf8_lossy(key).into_owned());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> HxErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Shorthand for `self.kind().is_expected()`
    pub fn is_expected(&self) -> bool {
        self.kind.is_expected()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == HxErrorKind::NotFound
    }

    pub fn is_conflict(&self) -> bool {
        self.kind == HxErrorKind::Conflict
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the raw key context, if any
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for HxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        Ok(())
    }
}

impl std::error::Error for HxError {}

// ========== End Error Facility ==========

/// Semantic failures raised by the persistence layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HoardError {
    /// Referenced entity is absent
    #[error("{entity} not found: {id}")]
    EntityNotFound { entity: &'static str, id: String },

    /// Another user already owns this email
    #[error("Email already registered: {email}")]
    EmailTaken { email: String },

    /// Primary key already present on create
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// A key segment is empty or contains the separator
    #[error("Invalid {what} segment {value:?}: must be non-empty and must not contain '/'")]
    InvalidSegment { what: &'static str, value: String },

    /// The persisted schema version marker has the wrong width
    #[error("Invalid schema version marker: expected 8 bytes, got {len}")]
    SchemaVersionCorrupt { len: usize },

    /// A migration transform failed
    #[error("Migration {version} ({description}) failed: {reason}")]
    MigrationFailed {
        version: u64,
        description: String,
        reason: String,
    },

    /// The migration registry is not strictly ascending
    #[error("Migration registry out of order: version {version} follows {previous}")]
    MigrationOrder { version: u64, previous: u64 },

    /// JSON encode/decode failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<HoardError> for HxError {
    fn from(err: HoardError) -> Self {
        let message = err.to_string();
        match err {
            HoardError::EntityNotFound { id, .. } => HxError::new(HxErrorKind::NotFound)
                .with_entity_id(id)
                .with_message(message),

            HoardError::EmailTaken { .. } => {
                HxError::new(HxErrorKind::Conflict).with_message(message)
            }

            HoardError::AlreadyExists { id, .. } => HxError::new(HxErrorKind::Conflict)
                .with_entity_id(id)
                .with_message(message),

            HoardError::InvalidSegment { .. } => {
                HxError::new(HxErrorKind::InvalidInput).with_message(message)
            }

            HoardError::SchemaVersionCorrupt { .. } => HxError::new(HxErrorKind::Persistence)
                .with_op("read_schema_version")
                .with_message(message),

            HoardError::MigrationFailed { .. } | HoardError::MigrationOrder { .. } => {
                HxError::new(HxErrorKind::Migration)
                    .with_op("migration")
                    .with_message(message)
            }

            HoardError::Serialization { .. } => {
                HxError::new(HxErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for HxError {
    fn from(err: serde_json::Error) -> Self {
        HoardError::Serialization {
            message: err.to_string(),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_kinds() {
        assert!(HxErrorKind::NotFound.is_expected());
        assert!(HxErrorKind::Conflict.is_expected());
        assert!(!HxErrorKind::Persistence.is_expected());
        assert!(!HxErrorKind::Migration.is_expected());
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let err = HxError::new(HxErrorKind::NotFound)
            .with_op("get_contract")
            .with_entity_id("c1")
            .with_message("contract not found: c1");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_NOT_FOUND]"));
        assert!(text.contains("get_contract"));
        assert!(text.contains("(entity_id: c1)"));
    }

    #[test]
    fn test_with_key_is_lossy() {
        let err = HxError::new(HxErrorKind::Persistence).with_key(b"u/alice/con/\xff");
        assert!(err.key().unwrap().starts_with("u/alice/con/"));
    }
}
