//! Joke model as delivered by a joke source

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a joke, unique per source
pub type JokeId = u32;

/// Maximum length of a two-part setup or punchline (characters)
pub const MAX_SETUP_LEN: usize = 1000;

/// Maximum length of a single-form joke (characters)
pub const MAX_SINGLE_LEN: usize = 2000;

/// Joke form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JokeKind {
    /// Setup followed by a punchline
    #[serde(rename = "twopart")]
    TwoPart,
    /// One-liner; the whole text is held in `setup`
    #[serde(rename = "single")]
    Single,
}

impl fmt::Display for JokeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JokeKind::TwoPart => write!(f, "twopart"),
            JokeKind::Single => write!(f, "single"),
        }
    }
}

/// Content-safety flags reported by the source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JokeFlags {
    pub explicit: bool,
    pub political: bool,
    pub religious: bool,
    pub racist: bool,
    pub sexist: bool,
    /// Anything else the source considers sensitive (JokeAPI's `nsfw`)
    pub nsfw: bool,
}

impl JokeFlags {
    /// True when any flag is raised
    pub fn any(&self) -> bool {
        self.explicit || self.political || self.religious || self.racist || self.sexist || self.nsfw
    }
}

/// A joke as fetched from a joke source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joke {
    pub id: JokeId,
    pub category: String,
    pub kind: JokeKind,
    /// Setup text (two-part) or the whole joke (single)
    pub setup: String,
    /// Punchline text; empty for single-form jokes
    pub punchline: String,
    #[serde(default)]
    pub flags: JokeFlags,
    /// Whether safe filtering was requested when this joke was fetched
    #[serde(default)]
    pub safe_mode: bool,
}

impl Joke {
    pub fn two_part(
        id: JokeId,
        category: impl Into<String>,
        setup: impl Into<String>,
        punchline: impl Into<String>,
    ) -> Self {
        Self {
            id,
            category: category.into(),
            kind: JokeKind::TwoPart,
            setup: setup.into(),
            punchline: punchline.into(),
            flags: JokeFlags::default(),
            safe_mode: false,
        }
    }

    pub fn single(id: JokeId, category: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            category: category.into(),
            kind: JokeKind::Single,
            setup: text.into(),
            punchline: String::new(),
            flags: JokeFlags::default(),
            safe_mode: false,
        }
    }

    pub fn with_flags(mut self, flags: JokeFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_safe_mode(mut self, safe_mode: bool) -> Self {
        self.safe_mode = safe_mode;
        self
    }

    /// Text shown while the setup is on stage
    pub fn display_text(&self) -> &str {
        &self.setup
    }

    /// Text a prediction is scored against.
    ///
    /// Single-form jokes have no separate punchline, so the whole text stands in.
    pub fn expected_punchline(&self) -> &str {
        match self.kind {
            JokeKind::TwoPart => &self.punchline,
            JokeKind::Single => &self.setup,
        }
    }

    /// Check structural invariants of the joke
    pub fn validate(&self) -> Result<()> {
        if self.id == 0 {
            return Err(Error::InvalidInput("Joke ID must be a positive integer".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidInput("Joke category is required".to_string()));
        }

        match self.kind {
            JokeKind::TwoPart => {
                check_text("Setup", &self.setup, MAX_SETUP_LEN)?;
                check_text("Punchline", &self.punchline, MAX_SETUP_LEN)?;
            }
            JokeKind::Single => {
                check_text("Joke text", &self.setup, MAX_SINGLE_LEN)?;
            }
        }

        Ok(())
    }
}

fn check_text(field: &str, text: &str, max_len: usize) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} is required", field)));
    }
    if text.chars().count() > max_len {
        return Err(Error::InvalidInput(format!(
            "{} must not exceed {} characters",
            field, max_len
        )));
    }
    Ok(())
}
