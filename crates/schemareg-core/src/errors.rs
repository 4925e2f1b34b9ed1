use crate::model::{ModuleId, QName, SchemaPath};
use thiserror::Error;

/// Result type alias using SchemaError
pub type Result<T> = std::result::Result<T, SchemaError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable by the protocol layer and
/// by log consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Composition
    Parse,
    DuplicatePath,
    DuplicateModule,

    // Component bookkeeping
    DuplicateComponent,
    UnknownComponent,
    MissingSupportedFeatures,

    // Verification
    Verification,
    CircularDependency,
    UnresolvedUniqueTag,

    // Queries
    NotFound,

    // Configuration
    InvalidConfig,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::DuplicatePath => "ERR_DUPLICATE_PATH",
            ExErrorKind::DuplicateModule => "ERR_DUPLICATE_MODULE",
            ExErrorKind::DuplicateComponent => "ERR_DUPLICATE_COMPONENT",
            ExErrorKind::UnknownComponent => "ERR_UNKNOWN_COMPONENT",
            ExErrorKind::MissingSupportedFeatures => "ERR_MISSING_SUPPORTED_FEATURES",
            ExErrorKind::Verification => "ERR_VERIFICATION",
            ExErrorKind::CircularDependency => "ERR_CIRCULAR_DEPENDENCY",
            ExErrorKind::UnresolvedUniqueTag => "ERR_UNRESOLVED_UNIQUE_TAG",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and the
/// entity the error is about (a schema path, component or module).
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    message: String,
    details: Vec<String>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            message: String::new(),
            details: Vec::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the entity the error is about
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach one line per accumulated problem
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " ({})", entity)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// One problem found by the consistency verifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// A leaf-reference can reach back to itself through the impact graph
    #[error("Circular leafref dependency on {leaf} via {via}")]
    CircularDependency { leaf: SchemaPath, via: SchemaPath },

    /// A `unique` tag does not resolve below its list
    #[error("Unique tag {tag} of list {list} does not resolve to a schema node (namespace mismatch?)")]
    UnresolvedUniqueTag { list: SchemaPath, tag: String },
}

impl VerificationError {
    pub fn kind(&self) -> ExErrorKind {
        match self {
            VerificationError::CircularDependency { .. } => ExErrorKind::CircularDependency,
            VerificationError::UnresolvedUniqueTag { .. } => ExErrorKind::UnresolvedUniqueTag,
        }
    }
}

/// Error taxonomy for schema registry operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    // ===== Composition Errors =====
    /// The schema-source parser rejected the source set
    #[error("Schema source parse failed: {message}")]
    Parse { message: String },

    /// Two nodes were composed onto the same schema path
    #[error("Duplicate schema path: {path}")]
    DuplicatePath { path: SchemaPath },

    /// Two modules share a name and revision
    #[error("Duplicate module: {module}")]
    DuplicateModule { module: ModuleId },

    /// Consistency verification failed; every problem is listed
    #[error("Schema verification failed with {} error(s)", .errors.len())]
    Verification { errors: Vec<VerificationError> },

    // ===== Component Errors =====
    /// A component with this id is already loaded
    #[error("Component already loaded: {component_id}")]
    DuplicateComponent { component_id: String },

    /// No component with this id is loaded
    #[error("Component not loaded: {component_id}")]
    UnknownComponent { component_id: String },

    /// Load or unload was called without a feature or deviation set
    #[error("Supported {what} must be provided for component {component_id}")]
    MissingSupportedFeatures {
        component_id: String,
        what: &'static str,
    },

    // ===== Lookup Errors =====
    /// A path that must exist is not in the schema index
    #[error("Schema node not found: {path}")]
    NodeNotFound { path: SchemaPath },

    /// A child name was looked up under a parent that is not indexed
    #[error("Schema node not found: {parent} has no entry for child lookup {child}")]
    ParentNotFound { parent: SchemaPath, child: QName },

    // ===== Generic Errors =====
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SchemaError {
    /// True for errors raised while producing a new generation
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            SchemaError::Parse { .. }
                | SchemaError::DuplicatePath { .. }
                | SchemaError::DuplicateModule { .. }
                | SchemaError::Verification { .. }
        )
    }
}

/// Conversion from SchemaError to the structured facility
impl From<SchemaError> for ExError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Parse { message } => ExError::new(ExErrorKind::Parse)
                .with_op("parse")
                .with_message(message),

            SchemaError::DuplicatePath { path } => ExError::new(ExErrorKind::DuplicatePath)
                .with_entity(path.to_string())
                .with_message("Schema path composed twice"),

            SchemaError::DuplicateModule { module } => {
                ExError::new(ExErrorKind::DuplicateModule)
                    .with_entity(module.to_string())
                    .with_message("Module composed twice")
            }

            SchemaError::Verification { errors } => {
                let details = errors.iter().map(|e| e.to_string()).collect();
                ExError::new(ExErrorKind::Verification)
                    .with_op("verify")
                    .with_message(format!("{} verification error(s)", errors.len()))
                    .with_details(details)
            }

            SchemaError::DuplicateComponent { component_id } => {
                ExError::new(ExErrorKind::DuplicateComponent)
                    .with_entity(component_id)
                    .with_message("Component already loaded")
            }

            SchemaError::UnknownComponent { component_id } => {
                ExError::new(ExErrorKind::UnknownComponent)
                    .with_entity(component_id)
                    .with_message("Component not loaded")
            }

            SchemaError::MissingSupportedFeatures { component_id, what } => {
                ExError::new(ExErrorKind::MissingSupportedFeatures)
                    .with_entity(component_id)
                    .with_message(format!("Supported {} not provided", what))
            }

            SchemaError::NodeNotFound { path } => ExError::new(ExErrorKind::NotFound)
                .with_entity(path.to_string())
                .with_message("Schema node not found"),

            SchemaError::ParentNotFound { parent, child } => ExError::new(ExErrorKind::NotFound)
                .with_entity(parent.to_string())
                .with_message(format!("Parent not indexed while looking up {}", child)),

            SchemaError::InvalidConfig { message } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }

            SchemaError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<toml::de::Error> for SchemaError {
    fn from(err: toml::de::Error) -> Self {
        SchemaError::InvalidConfig {
            message: err.to_string(),
        }
    }
}
