use crate::source::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadsError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Contact provider request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid provider URL: {url}")]
    InvalidUrl { url: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Permission denied: {path}")]
    Permission { path: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for LeadsError {
    fn user_message(&self) -> String {
        match self {
            LeadsError::Csv(e) => format!("Could not write the leads file: {}", e),
            LeadsError::Transport(e) => format!("Contact provider request failed: {}", e),
            LeadsError::InvalidUrl { url } => format!("Invalid provider URL: {}", url),
            LeadsError::Config { message } => format!("Configuration error: {}", message),
            LeadsError::Permission { path } => format!("Permission denied accessing: {}", path),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            LeadsError::Transport(TransportError::Api { status: 401, .. })
            | LeadsError::Transport(TransportError::Api { status: 403, .. }) => Some(
                "Check the provider API key (--api-key or the GMBLEADS_API_KEY environment variable).".to_string()
            ),
            LeadsError::Transport(_) => Some(
                "Check your internet connection and the provider URL, then try again.".to_string()
            ),
            LeadsError::InvalidUrl { .. } => Some(
                "Provide an absolute http(s) endpoint, e.g. https://api.example-b2b-provider.com/v1/contacts".to_string()
            ),
            LeadsError::Config { .. } => Some(
                "Check your configuration file syntax or regenerate one with --generate-config.".to_string()
            ),
            LeadsError::Permission { .. } | LeadsError::Csv(_) => Some(
                "Ensure the output directory exists and is writable, or choose another one with --output-dir.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for LeadsError {
    fn from(error: toml::de::Error) -> Self {
        LeadsError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LeadsError>;
