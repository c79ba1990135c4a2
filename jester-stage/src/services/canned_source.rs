//! Offline joke source serving a fixed deck

use crate::error::SourceError;
use crate::types::JokeSource;
use async_trait::async_trait;
use jester_common::{Joke, JokeId};
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// Joke source that draws from an in-memory deck
///
/// Honors the exclusion set when a fresh joke remains; otherwise draws from
/// the whole deck.
#[derive(Debug, Clone)]
pub struct CannedJokeSource {
    deck: Vec<Joke>,
}

impl CannedJokeSource {
    pub fn new(deck: Vec<Joke>) -> Result<Self, SourceError> {
        if deck.is_empty() {
            return Err(SourceError::Rejected("Joke deck is empty".to_string()));
        }
        Ok(Self { deck })
    }

    /// A small deck of programming jokes
    pub fn classic() -> Self {
        let deck = vec![
            Joke::two_part(1, "Programming", "Why do programmers prefer dark mode?", "Because light attracts bugs."),
            Joke::two_part(2, "Programming", "Why did the developer go broke?", "Because he used up all his cache."),
            Joke::two_part(3, "Pun", "What do you call a fake noodle?", "An impasta."),
            Joke::two_part(4, "Programming", "Why do Java developers wear glasses?", "Because they can't C#."),
            Joke::two_part(5, "Misc", "Why did the scarecrow win an award?", "Because he was outstanding in his field."),
            Joke::two_part(6, "Programming", "How many programmers does it take to change a light bulb?", "None, that's a hardware problem."),
            Joke::two_part(7, "Pun", "Why don't skeletons fight each other?", "They don't have the guts."),
            Joke::single(8, "Programming", "There are 10 kinds of people: those who understand binary and those who don't."),
        ];
        Self { deck }
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }
}

#[async_trait]
impl JokeSource for CannedJokeSource {
    async fn fetch(
        &self,
        safe_mode: bool,
        exclude_ids: Option<&HashSet<JokeId>>,
    ) -> Result<Joke, SourceError> {
        let fresh: Vec<&Joke> = self
            .deck
            .iter()
            .filter(|joke| exclude_ids.map_or(true, |ids| !ids.contains(&joke.id)))
            .collect();
        let pool: Vec<&Joke> = if fresh.is_empty() {
            self.deck.iter().collect()
        } else {
            fresh
        };

        pool.choose(&mut rand::thread_rng())
            .map(|joke| (*joke).clone().with_safe_mode(safe_mode))
            .ok_or_else(|| SourceError::Rejected("Joke deck is empty".to_string()))
    }
}
