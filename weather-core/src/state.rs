use crate::{error::WeatherError, model::WeatherReport};

/// Step of the fetch lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    /// Nothing requested yet. Only ever the initial phase.
    #[default]
    Idle,
    Loading,
    Error(WeatherError),
    Success(WeatherReport),
}

/// Snapshot published to renderers. Replaced wholesale on each transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub phase: Phase,
    /// Pending city text; changes without affecting `phase`.
    pub city_input: String,
}

impl ViewState {
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub fn error(&self) -> Option<&WeatherError> {
        match &self.phase {
            Phase::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        match &self.phase {
            Phase::Success(report) => Some(report),
            _ => None,
        }
    }

    pub fn has_error(&self) -> bool {
        self.error().is_some()
    }

    pub fn has_success(&self) -> bool {
        self.report().is_some()
    }

    /// True once the last fetch has resolved, successfully or not.
    pub fn is_settled(&self) -> bool {
        self.has_error() || self.has_success()
    }
}
