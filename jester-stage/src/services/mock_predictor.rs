//! Canned punchline predictor for running without a language model

use crate::error::PredictorError;
use crate::types::{FinishReason, Prediction, PunchlinePredictor};
use async_trait::async_trait;
use jester_common::{Joke, Rating};
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use tracing::info;

const MOCK_PUNCHLINES: [&str; 8] = [
    "Because they can't handle the byte!",
    "It was too mainstream!",
    "They wanted to C# clearly!",
    "Because it had no body!",
    "It couldn't find its class!",
    "They lost their inheritance!",
    "It kept throwing exceptions!",
    "The algorithm was too complex!",
];

const MOCK_COMMENTARY: &str = "A jest of reasonable mirth!";

/// Predictor that picks a random canned punchline after a simulated delay
#[derive(Debug, Clone)]
pub struct MockPredictor {
    predict_delay_ms: (u64, u64),
    rate_delay_ms: (u64, u64),
}

impl Default for MockPredictor {
    fn default() -> Self {
        Self {
            predict_delay_ms: (200, 800),
            rate_delay_ms: (100, 300),
        }
    }
}

impl MockPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    /// No simulated latency
    pub fn instant() -> Self {
        Self {
            predict_delay_ms: (0, 0),
            rate_delay_ms: (0, 0),
        }
    }
}

fn pick_delay((low, high): (u64, u64)) -> Duration {
    if high <= low {
        return Duration::from_millis(low);
    }
    Duration::from_millis(rand::thread_rng().gen_range(low..high))
}

#[async_trait]
impl PunchlinePredictor for MockPredictor {
    async fn predict(&self, _setup: &str) -> Result<Prediction, PredictorError> {
        let delay = pick_delay(self.predict_delay_ms);
        let punchline = MOCK_PUNCHLINES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(MOCK_PUNCHLINES[0]);

        tokio::time::sleep(delay).await;
        info!(punchline, "[MOCK] Predicted punchline");
        Ok(Prediction::new(punchline, FinishReason::Stop))
    }

    async fn rate(&self, joke: &Joke) -> Result<Option<Rating>, PredictorError> {
        let delay = pick_delay(self.rate_delay_ms);
        let (cleverness, rudeness, complexity, difficulty) = {
            let mut rng = rand::thread_rng();
            (
                rng.gen_range(1..=10),
                rng.gen_range(1..=4),
                rng.gen_range(1..=10),
                rng.gen_range(1..=10),
            )
        };

        tokio::time::sleep(delay).await;
        let rating = Rating::new(cleverness, rudeness, complexity, difficulty, MOCK_COMMENTARY)
            .map_err(|e| PredictorError::Failed(e.to_string()))?;
        info!(joke_id = joke.id, average = rating.average(), "[MOCK] Rated joke");
        Ok(Some(rating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_predicts_a_canned_punchline() {
        let predictor = MockPredictor::instant();
        let prediction = predictor.predict("Why did the chicken cross the road?").await.unwrap();
        assert!(MOCK_PUNCHLINES.contains(&prediction.text.as_str()));
        assert_eq!(prediction.confidence(), 0.9);
    }

    #[tokio::test]
    async fn test_rating_in_range() {
        let predictor = MockPredictor::instant();
        let joke = Joke::two_part(1, "Pun", "setup", "punchline");
        for _ in 0..20 {
            let rating = predictor.rate(&joke).await.unwrap().unwrap();
            assert!((1..=10).contains(&rating.cleverness));
            assert!((1..=4).contains(&rating.rudeness));
        }
    }
}
