//! Fire-and-forget sound cues.
//!
//! Synthesis lives outside this crate. The canvas only calls into an
//! [`AudioSink`] and never waits on or inspects the result.

use crate::rng::CosmeticRng;

/// Chance that an appended point asks for a chime.
pub const CHIME_CHANCE: f64 = 0.2;
/// Minimum spacing between chimes.
pub const CHIME_MIN_INTERVAL_MS: f64 = 60.0;

pub trait AudioSink {
    /// Short sparkle while drawing.
    fn play_chime(&mut self);

    /// Played once when a replay starts.
    fn play_cast(&mut self);
}

/// Used when no audio backend is available.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_chime(&mut self) {
        log::trace!("chime (silent)");
    }

    fn play_cast(&mut self) {
        log::trace!("cast (silent)");
    }
}

/// Try to build an audio sink; any failure degrades to [`SilentAudio`].
pub fn init_audio<E: std::fmt::Display>(
    backend: impl FnOnce() -> Result<Box<dyn AudioSink>, E>,
) -> Box<dyn AudioSink> {
    match backend() {
        Ok(sink) => sink,
        Err(err) => {
            log::warn!("Audio unavailable, continuing without sound: {}", err);
            Box::new(SilentAudio)
        }
    }
}

/// Decides which appended points trigger a chime.
#[derive(Debug, Clone)]
pub struct ChimeThrottle {
    rng: CosmeticRng,
    last_chime_ms: Option<f64>,
}

impl ChimeThrottle {
    pub fn new(rng: CosmeticRng) -> Self {
        Self { rng, last_chime_ms: None }
    }

    pub fn should_chime(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_chime_ms {
            if now_ms - last < CHIME_MIN_INTERVAL_MS {
                return false;
            }
        }
        if !self.rng.chance(CHIME_CHANCE) {
            return false;
        }
        self.last_chime_ms = Some(now_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chimes_are_spaced_out() {
        let mut throttle = ChimeThrottle::new(CosmeticRng::new(1));
        let mut times = Vec::new();
        for frame in 0..5000 {
            let now = frame as f64 * 4.0;
            if throttle.should_chime(now) {
                times.push(now);
            }
        }
        assert!(!times.is_empty());
        assert!(times.windows(2).all(|w| w[1] - w[0] >= CHIME_MIN_INTERVAL_MS));
    }

    #[test]
    fn failing_backend_degrades_to_silence() {
        let mut sink = init_audio(|| Err::<Box<dyn AudioSink>, _>("no output device"));
        sink.play_chime();
        sink.play_cast();
    }
}
