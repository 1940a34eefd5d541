//! CLI error handling with user-friendly messages.

use std::fmt;
use std::process;

use ecotiles::app::AppError;
use ecotiles::config::ConfigFileError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Configuration error
    Config(ConfigFileError),
    /// Application failed to start or serve
    App(AppError),
    /// Bad command-line input
    InvalidInput(String),
    /// Failed to write a file
    FileWrite { path: String, error: String },
}

impl CliError {
    /// Exit the process with the error chain and a non-zero code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Messages already embed their direct cause; only print what is new.
        let mut last = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let message = cause.to_string();
            if !last.contains(&message) {
                eprintln!("  caused by: {}", message);
            }
            last = message;
            source = cause.source();
        }

        if let CliError::App(AppError::Config(_)) = self {
            eprintln!();
            eprintln!("Set the Earth Engine credentials in ~/.ecotiles/config.ini:");
            eprintln!("  [provider]");
            eprintln!("  project = <cloud project>");
            eprintln!("or export ECOTILES_PROJECT and ECOTILES_ACCESS_TOKEN.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::App(e) => write!(f, "{}", e),
            CliError::InvalidInput(msg) => write!(f, "{}", msg),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::App(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}
