//! Five-act performance state machine states
//!
//! Idle → Fetching → ShowingSetup → ShowingAiGuess → RevealingPunchline → Transitioning → Fetching → …

use serde::{Deserialize, Serialize};

/// Performance state enumeration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub enum PerformanceState {
    /// Not running; initial state and forced state after stop
    #[default]
    Idle,
    /// Act 1: obtaining a joke
    Fetching,
    /// Act 2: setup on stage for the dwell window
    ShowingSetup,
    /// Act 3: predictor guesses the punchline
    ShowingAiGuess,
    /// Act 4: real punchline revealed with triumph/defeat cue
    RevealingPunchline,
    /// Act 5: brief pause before the next cycle
    Transitioning,
}

impl PerformanceState {
    /// Act number (1-5), `None` for Idle
    pub fn act(self) -> Option<u8> {
        match self {
            PerformanceState::Idle => None,
            PerformanceState::Fetching => Some(1),
            PerformanceState::ShowingSetup => Some(2),
            PerformanceState::ShowingAiGuess => Some(3),
            PerformanceState::RevealingPunchline => Some(4),
            PerformanceState::Transitioning => Some(5),
        }
    }
}

impl std::fmt::Display for PerformanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PerformanceState::Idle => write!(f, "Idle"),
            PerformanceState::Fetching => write!(f, "Fetching"),
            PerformanceState::ShowingSetup => write!(f, "ShowingSetup"),
            PerformanceState::ShowingAiGuess => write!(f, "ShowingAiGuess"),
            PerformanceState::RevealingPunchline => write!(f, "RevealingPunchline"),
            PerformanceState::Transitioning => write!(f, "Transitioning"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(PerformanceState::default(), PerformanceState::Idle);
    }

    #[test]
    fn test_act_numbers() {
        assert_eq!(PerformanceState::Idle.act(), None);
        assert_eq!(PerformanceState::Fetching.act(), Some(1));
        assert_eq!(PerformanceState::Transitioning.act(), Some(5));
    }
}
