//! Workflow error types
//!
//! Only construction can fail with a typed error; run-time failures are
//! contained inside the run and surfaced through the summary's error list.

use thiserror::Error;

/// Errors that can occur constructing the maintenance workflow
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Required configuration missing or invalid
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A collaborator could not be constructed
    #[error("failed to initialize {component}: {source}")]
    Initialization {
        /// Which collaborator failed to come up
        component: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl WorkflowError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn initialization(component: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Initialization {
            component,
            source: source.into(),
        }
    }
}
