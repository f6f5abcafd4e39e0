use thiserror::Error;

type Source = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    /// The routing configuration could not be decoded into a typed table.
    /// Callers degrade to the default route; this is never fatal at runtime.
    #[error("invalid routing configuration: {reason}")]
    Configuration { reason: String },

    /// The acting identity does not hold the staff role for this ticket.
    #[error("actor lacks the staff role required to manage tickets")]
    Unauthorized,

    /// A channel-directory operation failed while provisioning or closing a
    /// ticket. No compensating cleanup is attempted.
    #[error("{step} failed: {source}")]
    Provisioning {
        step: &'static str,
        #[source]
        source: Source,
    },

    /// The standing panel could not be published.
    #[error("panel publish failed: {source}")]
    Presentation {
        #[source]
        source: Source,
    },
}

impl Error {
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn provisioning(step: &'static str, source: anyhow::Error) -> Self {
        Self::Provisioning {
            step,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn presentation(source: anyhow::Error) -> Self {
        Self::Presentation {
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
