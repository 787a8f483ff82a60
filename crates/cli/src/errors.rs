//! CLI error types and exit codes

use miette::Diagnostic;
use thiserror::Error;

/// Exit code for analysis failures such as a dependency cycle.
pub const EXIT_ANALYSIS_FAILURE: u8 = 1;

/// Exit code for bad arguments or configuration.
pub const EXIT_USAGE: u8 = 2;

/// CLI-specific error types with diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Configuration could not be loaded")]
    #[diagnostic(
        code(buildwise::cli::config),
        help("Check the file passed with --config or BUILDWISE_CONFIG")
    )]
    Config {
        #[source]
        #[diagnostic_source]
        source: buildwise_core::Error,
    },

    #[error("Invalid command line argument")]
    #[diagnostic(
        code(buildwise::cli::invalid_argument),
        help("Run 'buildwise --help' to see available options")
    )]
    InvalidArgument {
        #[source]
        #[diagnostic_source]
        source: buildwise_core::Error,
    },

    #[error("Analysis failed")]
    #[diagnostic(code(buildwise::cli::analysis_failed))]
    Analysis {
        #[source]
        #[diagnostic_source]
        source: buildwise_core::Error,
    },

    #[error("Could not render {format} output: {message}")]
    #[diagnostic(code(buildwise::cli::output))]
    Output {
        format: &'static str,
        message: String,
    },
}

impl CliError {
    pub fn output(format: &'static str, error: impl std::fmt::Display) -> Self {
        Self::Output {
            format,
            message: error.to_string(),
        }
    }

    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config { .. } | Self::InvalidArgument { .. } => EXIT_USAGE,
            Self::Analysis { .. } | Self::Output { .. } => EXIT_ANALYSIS_FAILURE,
        }
    }
}

impl From<buildwise_core::Error> for CliError {
    fn from(source: buildwise_core::Error) -> Self {
        use buildwise_core::Error as Core;
        match source {
            Core::InvalidInput { .. } => Self::InvalidArgument { source },
            Core::Configuration { .. } | Core::Io { .. } => Self::Config { source },
            Core::CycleDetected { .. }
            | Core::MissingDependencies { .. }
            | Core::Summary { .. } => Self::Analysis { source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let cycle: CliError = buildwise_core::Error::CycleDetected {
            message: "2 task(s) could not be ordered: A, B".to_string(),
        }
        .into();
        assert_eq!(cycle.exit_code(), EXIT_ANALYSIS_FAILURE);

        let bad_area: CliError = buildwise_core::Error::invalid_input("area", "must be positive").into();
        assert_eq!(bad_area.exit_code(), EXIT_USAGE);

        let bad_config: CliError = buildwise_core::Error::configuration("invalid TOML").into();
        assert!(matches!(bad_config, CliError::Config { .. }));
        assert_eq!(bad_config.exit_code(), EXIT_USAGE);
    }

    #[test]
    fn test_output_error_display() {
        let err = CliError::output("json", "key must be a string");
        assert_eq!(
            err.to_string(),
            "Could not render json output: key must be a string"
        );
        assert_eq!(err.exit_code(), EXIT_ANALYSIS_FAILURE);
    }
}
