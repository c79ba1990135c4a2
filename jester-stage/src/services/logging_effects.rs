//! Log-only narrator and sound cue player
//!
//! Stand-ins for speech synthesis and audio output on hosts without either.

use crate::error::EffectError;
use crate::types::{EffectCue, EffectPlayer, Narrator};
use async_trait::async_trait;
use jester_common::config::Voice;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNarrator;

#[async_trait]
impl Narrator for LoggingNarrator {
    async fn speak(&self, text: &str, voice: Voice) -> Result<(), EffectError> {
        info!(text = %text, rate = voice.rate, pitch = voice.pitch, "Narrating");
        Ok(())
    }

    async fn stop(&self) -> Result<(), EffectError> {
        debug!("Narration halted");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEffectPlayer;

#[async_trait]
impl EffectPlayer for LoggingEffectPlayer {
    async fn initialize(&self) -> Result<(), EffectError> {
        debug!("Logging effect player ready");
        Ok(())
    }

    async fn play(&self, cue: EffectCue) -> Result<(), EffectError> {
        if !(0.0..=1.0).contains(&cue.volume) {
            return Err(EffectError(format!("Volume out of range: {}", cue.volume)));
        }
        debug!(
            effect = ?cue.kind,
            duration_ms = cue.duration.map(|d| d.as_millis() as u64),
            volume = cue.volume,
            "Sound cue"
        );
        Ok(())
    }
}
