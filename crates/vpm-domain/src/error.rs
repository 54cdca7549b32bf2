//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Vector Provider Manager
#[derive(Error, Debug)]
pub enum Error {
    /// Requested backend type is not registered
    #[error("Unknown provider type '{provider_type}'. Available providers: {available:?}")]
    UnknownType {
        /// The requested type identifier
        provider_type: String,
        /// Type identifiers currently registered
        available: Vec<String>,
    },

    /// Backend type registered twice
    #[error("Provider type '{provider_type}' is already registered")]
    DuplicateType {
        /// The conflicting type identifier
        provider_type: String,
    },

    /// Backend configuration rejected at the factory boundary
    #[error("Invalid configuration for provider type '{provider_type}': {message}")]
    ConfigurationInvalid {
        /// Type identifier the configuration was meant for
        provider_type: String,
        /// Description of the violation
        message: String,
    },

    /// Manager has no active provider to serve the request
    #[error("No active provider")]
    NoActiveProvider,

    /// Named provider instance is not managed
    #[error("Provider '{name}' not found")]
    ProviderNotFound {
        /// Instance name
        name: String,
    },

    /// Provider failed its health check at switch time
    #[error("Provider '{name}' is unhealthy: {reason}")]
    ProviderUnhealthy {
        /// Instance name
        name: String,
        /// Health error or reported status
        reason: String,
    },

    /// Every candidate of a chain or router failed
    #[error("All providers exhausted for '{operation}': {}", format_attempts(.errors))]
    AllProvidersExhausted {
        /// Operation that was attempted
        operation: String,
        /// `(provider, error)` pairs in attempt order
        errors: Vec<(String, String)>,
    },

    /// Error returned by a backend, tagged with the failing instance
    #[error("Provider '{provider}' failed: {source}")]
    Backend {
        /// Instance name
        provider: String,
        /// The untouched backend error
        #[source]
        source: Box<Error>,
    },

    /// A factory stage failed
    #[error("Factory {stage} stage failed for provider type '{provider_type}': {source}")]
    FactoryStage {
        /// Stage identifier (`type_lookup`, `validation`, `construction`)
        stage: &'static str,
        /// Type identifier being built
        provider_type: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Manager lifecycle misuse (e.g. initialize twice)
    #[error("Lifecycle error: {message}")]
    Lifecycle {
        /// Description of the lifecycle violation
        message: String,
    },

    /// Operation context was cancelled before the call completed
    #[error("Operation '{operation}' cancelled")]
    Cancelled {
        /// Operation that observed the cancellation
        operation: String,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Vector storage operation error
    #[error("Vector database error: {message}")]
    VectorDb {
        /// Description of the vector database error
        message: String,
    },

    /// Configuration-related error (simple form)
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// Configuration-related error (with source)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O operation error (simple form)
    #[error("I/O error: {source}")]
    IoSimple {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// I/O operation error (with context)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

fn format_attempts(errors: &[(String, String)]) -> String {
    if errors.is_empty() {
        return "no candidates".to_string();
    }
    errors
        .iter()
        .map(|(provider, error)| format!("{provider}: {error}"))
        .collect::<Vec<_>>()
        .join("; ")
}

// Registry error creation methods
impl Error {
    /// Create an unknown type error
    pub fn unknown_type<S: Into<String>>(provider_type: S, available: Vec<String>) -> Self {
        Self::UnknownType {
            provider_type: provider_type.into(),
            available,
        }
    }

    /// Create a duplicate type error
    pub fn duplicate_type<S: Into<String>>(provider_type: S) -> Self {
        Self::DuplicateType {
            provider_type: provider_type.into(),
        }
    }

    /// Create an invalid backend configuration error
    pub fn configuration_invalid<T: Into<String>, S: Into<String>>(
        provider_type: T,
        message: S,
    ) -> Self {
        Self::ConfigurationInvalid {
            provider_type: provider_type.into(),
            message: message.into(),
        }
    }

    /// Wrap an error with the factory stage that produced it
    pub fn factory_stage<S: Into<String>>(stage: &'static str, provider_type: S, source: Self) -> Self {
        Self::FactoryStage {
            stage,
            provider_type: provider_type.into(),
            source: Box::new(source),
        }
    }
}

// Manager error creation methods
impl Error {
    /// Create a provider not found error
    pub fn provider_not_found<S: Into<String>>(name: S) -> Self {
        Self::ProviderNotFound { name: name.into() }
    }

    /// Create a provider unhealthy error
    pub fn provider_unhealthy<N: Into<String>, S: Into<String>>(name: N, reason: S) -> Self {
        Self::ProviderUnhealthy {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an exhaustion error from the collected attempts
    pub fn all_providers_exhausted<S: Into<String>>(
        operation: S,
        errors: Vec<(String, String)>,
    ) -> Self {
        Self::AllProvidersExhausted {
            operation: operation.into(),
            errors,
        }
    }

    /// Tag a backend error with the instance that returned it
    ///
    /// Errors already tagged are returned unchanged.
    pub fn backend<S: Into<String>>(provider: S, source: Self) -> Self {
        match source {
            tagged @ Self::Backend { .. } => tagged,
            other => Self::Backend {
                provider: provider.into(),
                source: Box::new(other),
            },
        }
    }

    /// Create a lifecycle error
    pub fn lifecycle<S: Into<String>>(message: S) -> Self {
        Self::Lifecycle {
            message: message.into(),
        }
    }

    /// Create a cancellation error
    pub fn cancelled<S: Into<String>>(operation: S) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }
}

// Backend error creation methods
impl Error {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a vector database error
    pub fn vector_db<S: Into<String>>(message: S) -> Self {
        Self::VectorDb {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Configuration and I/O error creation methods
impl Error {
    /// Create a configuration error (simple)
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a configuration error (with source)
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Inspection helpers
impl Error {
    /// Innermost error beneath `Backend` and `FactoryStage` wrappers
    pub fn root(&self) -> &Self {
        match self {
            Self::Backend { source, .. } | Self::FactoryStage { source, .. } => source.root(),
            other => other,
        }
    }

    /// Name of the instance a backend error is tagged with
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Backend { provider, .. } => Some(provider),
            _ => None,
        }
    }
}
