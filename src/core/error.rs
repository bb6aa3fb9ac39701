//! Error types for the logging facade

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// No factory is registered under the requested provider type
    #[error("unsupported provider type: {0}")]
    UnsupportedProvider(String),

    /// Level text matched none of the level names
    #[error("Invalid log level: '{0}'")]
    InvalidLevel(String),

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Provider options payload could not be parsed
    #[error("Invalid options for provider '{provider}': {source}")]
    InvalidOptions {
        provider: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Logger already stopped
    #[error("Logger already stopped")]
    LoggerStopped,

    /// Provider was used after close
    #[error("Provider '{0}' is closed")]
    ProviderClosed(String),

    /// One child of a composite provider failed
    #[error("Provider #{index} ({name}) failed: {source}")]
    ChildProvider {
        index: usize,
        name: String,
        #[source]
        source: Box<LoggerError>,
    },

    /// Several children of a composite provider failed during one operation
    #[error("{} of {total} providers failed: {}", .failures.len(), join_errors(.failures))]
    MixProvider {
        total: usize,
        failures: Vec<LoggerError>,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

fn join_errors(errors: &[LoggerError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl LoggerError {
    /// Create an unsupported provider type error
    pub fn unsupported_provider(name: impl Into<String>) -> Self {
        LoggerError::UnsupportedProvider(name.into())
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid options error for a provider factory
    pub fn options(provider: impl Into<String>, source: serde_json::Error) -> Self {
        LoggerError::InvalidOptions {
            provider: provider.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn child(index: usize, name: impl Into<String>, source: LoggerError) -> Self {
        LoggerError::ChildProvider {
            index,
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
