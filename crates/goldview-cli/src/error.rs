use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] goldview_core::ValidationError),

    #[error(transparent)]
    Config(#[from] goldview_core::ConfigError),

    #[error("usage error: {0}")]
    Usage(String),

    #[error("upstream error ({kind}): {source}", kind = .source.kind())]
    Upstream {
        #[from]
        source: goldview_core::SourceError,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 2,
            Self::Usage(_) => 2,
            Self::Upstream { .. } => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use goldview_core::{SourceError, ValidationError};

    use super::*;

    #[test]
    fn exit_codes_follow_the_error_class() {
        let validation = CliError::from(ValidationError::InvalidRange {
            value: String::from("2y"),
        });
        let upstream = CliError::from(SourceError::unavailable("chart upstream returned status 503"));
        let io = CliError::from(std::io::Error::other("broken pipe"));

        assert_eq!(validation.exit_code(), 2);
        assert_eq!(upstream.exit_code(), 3);
        assert_eq!(io.exit_code(), 10);
    }

    #[test]
    fn upstream_message_names_the_kind() {
        let error = CliError::from(SourceError::malformed("no chart result for GC=F"));
        assert_eq!(
            error.to_string(),
            "upstream error (malformed_upstream_data): no chart result for GC=F"
        );
    }
}
