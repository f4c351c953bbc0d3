use oxog_value::ErrorValue;
use thiserror::Error;

/// Failures a kernel implementation reports while managing plugins and events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("plugin '{0}' is already registered")]
    DuplicatePlugin(String),
    #[error("plugin '{plugin}' depends on missing plugin '{dependency}'")]
    MissingDependency { plugin: String, dependency: String },
    #[error("plugin '{0}' is not registered")]
    UnknownPlugin(String),
    #[error("plugin '{plugin}' failed to install: {source}")]
    Install { plugin: String, source: ErrorValue },
    #[error("unknown event '{0}'")]
    UnknownEvent(String),
}
