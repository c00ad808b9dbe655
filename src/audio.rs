//! Sound notifications
//!
//! The simulation only announces that something audible happened; sinks
//! decide what (if anything) to play. On the web, `WebAudio` synthesizes
//! short procedural tones - no external files needed.

/// Audible simulation events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    /// Ambient particles replenished
    Respawn,
    /// Particle absorbed into the player
    Absorb,
    /// Hostile particle struck the player
    Hit,
    /// Level up; also reused as heal feedback
    LevelUp,
}

impl SoundEvent {
    pub fn key(&self) -> &'static str {
        match self {
            SoundEvent::Respawn => "respawn",
            SoundEvent::Absorb => "absorb",
            SoundEvent::Hit => "hit",
            SoundEvent::LevelUp => "levelUp",
        }
    }
}

/// Fire-and-forget receiver of sound events
pub trait SoundSink {
    fn notify(&mut self, event: SoundEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn notify(&mut self, _event: SoundEvent) {}
}

/// Records events in order (headless runs and tests)
#[derive(Debug, Clone, Default)]
pub struct SoundLog {
    pub events: Vec<SoundEvent>,
}

impl SoundLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, event: SoundEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl SoundSink for SoundLog {
    fn notify(&mut self, event: SoundEvent) {
        self.events.push(event);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEvent, SoundSink};

    /// Web Audio sink
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master_volume: f32,
        muted: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                muted: false,
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.master_volume }
        }

        /// Create an oscillator routed through a gain node
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Single decaying tone, optionally sweeping to `end_freq`
        #[allow(clippy::too_many_arguments)]
        fn tone(
            &self,
            ctx: &AudioContext,
            freq: f32,
            end_freq: Option<f32>,
            osc_type: OscillatorType,
            level: f32,
            start: f64,
            duration: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + start;

            gain.gain().set_value_at_time(level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + duration)
                .ok();
            if let Some(end) = end_freq {
                osc.frequency().set_value_at_time(freq, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(end, t + duration)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + duration + 0.05).ok();
        }
    }

    impl SoundSink for WebAudio {
        fn notify(&mut self, event: SoundEvent) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match event {
                // Soft shimmer rising
                SoundEvent::Respawn => {
                    for (i, freq) in [500.0, 700.0, 900.0].iter().enumerate() {
                        let delay = i as f64 * 0.05;
                        self.tone(ctx, *freq, None, OscillatorType::Sine, vol * 0.15, delay, 0.2);
                    }
                }
                // Short bright blip
                SoundEvent::Absorb => {
                    self.tone(ctx, 800.0, Some(1200.0), OscillatorType::Sine, vol * 0.2, 0.0, 0.06);
                }
                // Low thump
                SoundEvent::Hit => {
                    self.tone(ctx, 150.0, Some(60.0), OscillatorType::Sawtooth, vol * 0.4, 0.0, 0.15);
                }
                // Ascending arpeggio
                SoundEvent::LevelUp => {
                    for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
                        let delay = i as f64 * 0.08;
                        self.tone(ctx, *freq, None, OscillatorType::Triangle, vol * 0.3, delay, 0.3);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_log_records_in_order() {
        let mut log = SoundLog::new();
        log.notify(SoundEvent::Absorb);
        log.notify(SoundEvent::Hit);
        log.notify(SoundEvent::Absorb);
        assert_eq!(
            log.events,
            [SoundEvent::Absorb, SoundEvent::Hit, SoundEvent::Absorb]
        );
        assert_eq!(log.count(SoundEvent::Absorb), 2);
        log.clear();
        assert!(log.events.is_empty());
    }

    #[test]
    fn test_event_keys() {
        assert_eq!(SoundEvent::LevelUp.key(), "levelUp");
        assert_eq!(SoundEvent::Respawn.key(), "respawn");
    }
}
