use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

/// Stable error identifiers.
///
/// Host applications branch on these instead of matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    InvalidType,
    InvalidAxisType,
    InvalidFormatType,
    InvalidTicks,
    NoBindTo,
    UniqueKeyNotProvided,
    UniqueLabelNotProvided,
    NoDataPoints,
    NoContentLoaded,
    InvalidAxisReference,
    RegionInvalidAxisProvided,
    RegionStartMoreThanEnd,
    RegionEmpty,
    InvalidDateline,
    InvalidObjectProvided,
    ContentAlreadyLoaded,
    ContentDisposed,
    GraphNotGenerated,
    GraphAlreadyGenerated,
    InvalidCanvas,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidType => "invalid_type",
            Self::InvalidAxisType => "invalid_axis_type",
            Self::InvalidFormatType => "invalid_format_type",
            Self::InvalidTicks => "invalid_ticks",
            Self::NoBindTo => "no_bind_to",
            Self::UniqueKeyNotProvided => "unique_key_not_provided",
            Self::UniqueLabelNotProvided => "unique_label_not_provided",
            Self::NoDataPoints => "no_data_points",
            Self::NoContentLoaded => "no_content_loaded",
            Self::InvalidAxisReference => "invalid_axis_reference",
            Self::RegionInvalidAxisProvided => "region_invalid_axis_provided",
            Self::RegionStartMoreThanEnd => "region_start_more_than_end",
            Self::RegionEmpty => "region_empty",
            Self::InvalidDateline => "invalid_dateline",
            Self::InvalidObjectProvided => "invalid_object_provided",
            Self::ContentAlreadyLoaded => "content_already_loaded",
            Self::ContentDisposed => "content_disposed",
            Self::GraphNotGenerated => "graph_not_generated",
            Self::GraphAlreadyGenerated => "graph_already_generated",
            Self::InvalidCanvas => "invalid_canvas",
        }
    }

    /// Configuration errors are raised while validating input, before any
    /// scene mutation. Everything else is a usage error.
    #[must_use]
    pub const fn is_configuration(self) -> bool {
        !matches!(
            self,
            Self::InvalidObjectProvided
                | Self::ContentAlreadyLoaded
                | Self::ContentDisposed
                | Self::GraphNotGenerated
                | Self::GraphAlreadyGenerated
                | Self::NoContentLoaded
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid canvas size: width={width}, height={height}")]
    InvalidCanvas { width: f64, height: f64 },

    #[error("{kind}: {detail}")]
    Config { kind: ErrorKind, detail: String },

    #[error("{kind}: {detail}")]
    Usage { kind: ErrorKind, detail: String },

    #[error("invalid input: {0}")]
    Json(#[from] serde_json::Error),
}

impl GraphError {
    pub fn config(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self::Config {
            kind,
            detail: detail.into(),
        }
    }

    pub fn usage(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self::Usage {
            kind,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCanvas { .. } => ErrorKind::InvalidCanvas,
            Self::Config { kind, .. } | Self::Usage { kind, .. } => *kind,
            Self::Json(_) => ErrorKind::InvalidInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, GraphError};

    #[test]
    fn json_errors_map_to_invalid_input() {
        let err = serde_json::from_str::<u32>("nope").map_err(GraphError::from);
        assert_eq!(err.unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn display_starts_with_stable_identifier() {
        let err = GraphError::usage(ErrorKind::InvalidObjectProvided, "content id 7");
        assert_eq!(err.to_string(), "invalid_object_provided: content id 7");
        assert!(!err.kind().is_configuration());
    }
}
