use thiserror::Error;

/// Message shown when a fetch is requested with a blank city.
pub const EMPTY_CITY_MESSAGE: &str = "Please enter a city name";

/// Every way a fetch can fail. `Display` gives the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// City input was empty or whitespace; no request was made.
    #[error("{}", EMPTY_CITY_MESSAGE)]
    Validation,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Weather service returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Unexpected response format: {0}")]
    Deserialization(String),
}

/// Fieldless mirror of [`WeatherError`] for branching on the kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Transport,
    Upstream,
    Deserialization,
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::Validation => ErrorKind::Validation,
            WeatherError::Transport(_) => ErrorKind::Transport,
            WeatherError::Upstream { .. } => ErrorKind::Upstream,
            WeatherError::Deserialization(_) => ErrorKind::Deserialization,
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        WeatherError::Transport(e.to_string())
    }
}
