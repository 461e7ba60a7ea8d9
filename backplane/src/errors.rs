use std::fmt;

use backplane_config::ConfigLoadError;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Backend a connection step talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Database,
    Cache,
    Broker,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Database => "database",
            Stage::Cache => "cache",
            Stage::Broker => "broker",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("invalid {stage} endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        stage: Stage,
        endpoint: String,
        reason: String,
    },
    #[error("failed to connect to {stage}")]
    Open {
        stage: Stage,
        #[source]
        source: BoxError,
    },
    #[error("{stage} liveness probe failed")]
    Probe {
        stage: Stage,
        #[source]
        source: BoxError,
    },
}

impl ConnectionError {
    pub fn invalid_endpoint(
        stage: Stage,
        endpoint: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidEndpoint {
            stage,
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    pub fn open(stage: Stage, source: impl Into<BoxError>) -> Self {
        Self::Open {
            stage,
            source: source.into(),
        }
    }

    pub fn probe(stage: Stage, source: impl Into<BoxError>) -> Self {
        Self::Probe {
            stage,
            source: source.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidEndpoint { stage, .. }
            | Self::Open { stage, .. }
            | Self::Probe { stage, .. } => *stage,
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to release {stage} connection")]
pub struct ReleaseError {
    pub stage: Stage,
    #[source]
    pub source: BoxError,
}

impl ReleaseError {
    pub fn new(stage: Stage, source: impl Into<BoxError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("configuration error")]
    Config(#[from] ConfigLoadError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error("failed to release {}", describe_release(.0))]
    Release(Vec<ReleaseError>),
}

impl BootstrapError {
    /// Stage that failed, when the failure belongs to a backend.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Config(_) => None,
            Self::Connection(err) => Some(err.stage()),
            Self::Release(failures) => failures.first().map(|err| err.stage),
        }
    }
}

fn describe_release(failures: &[ReleaseError]) -> String {
    failures
        .iter()
        .map(|err| format!("{} ({})", err.stage, err.source))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_is_carried_through() {
        let err = BootstrapError::from(ConnectionError::open(
            Stage::Cache,
            "connection refused",
        ));
        assert_eq!(err.stage(), Some(Stage::Cache));
        assert_eq!(err.to_string(), "failed to connect to cache");

        let config = BootstrapError::from(ConfigLoadError::MissingKey {
            key: "database.dsn".into(),
        });
        assert_eq!(config.stage(), None);
    }

    #[test]
    fn release_failures_are_listed() {
        let err = BootstrapError::Release(vec![
            ReleaseError::new(Stage::Broker, "channel closed"),
            ReleaseError::new(Stage::Database, "socket reset"),
        ]);
        assert_eq!(
            err.to_string(),
            "failed to release broker (channel closed), database (socket reset)"
        );
        assert_eq!(err.stage(), Some(Stage::Broker));
    }
}
