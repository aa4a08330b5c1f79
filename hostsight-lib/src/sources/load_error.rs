use super::Dimension;
use core::fmt;
use std::sync::Arc;

/// Why a dimension's payload could not be turned into metrics.
///
/// Either variant fails the whole refresh tick. The wrapped error is shared so
/// the published dashboard state can be cloned cheaply.
#[derive(Debug, Clone)]
pub enum LoadError {
    /// The request failed outright: network failure, timeout, or a non-2xx status.
    Transport {
        dimension: Dimension,
        error: Arc<ohno::AppError>,
    },

    /// A body arrived but did not match the dimension's structural contract.
    Shape {
        dimension: Dimension,
        error: Arc<ohno::AppError>,
    },
}

impl LoadError {
    #[must_use]
    pub fn transport(dimension: Dimension, error: ohno::AppError) -> Self {
        Self::Transport {
            dimension,
            error: Arc::new(error),
        }
    }

    #[must_use]
    pub fn shape(dimension: Dimension, error: ohno::AppError) -> Self {
        Self::Shape {
            dimension,
            error: Arc::new(error),
        }
    }

    /// The dimension whose load failed.
    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        match self {
            Self::Transport { dimension, .. } | Self::Shape { dimension, .. } => *dimension,
        }
    }

    /// Short name of the failure class, as used in reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Shape { .. } => "shape",
        }
    }

    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { dimension, error } => write!(f, "could not load {dimension} visibility: {error:#}"),
            Self::Shape { dimension, error } => write!(f, "{dimension} visibility payload has an unexpected shape: {error:#}"),
        }
    }
}

impl core::error::Error for LoadError {}
