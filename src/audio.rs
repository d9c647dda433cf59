//! Audio: looping background track plus short procedural cues
//!
//! Audio never feeds back into the simulation. A blocked autoplay or a
//! missing track only flips the ON/OFF indicator; the player decides whether
//! to try again.

use crate::sim::GameEvent;

/// Short sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Impulse applied
    Flap,
    /// Obstacle passed
    Score,
    /// Hit a pipe or left the playfield
    Crash,
    /// Reached the win score
    Win,
}

impl Cue {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::Flap => Some(Cue::Flap),
            GameEvent::Scored { .. } => Some(Cue::Score),
            GameEvent::Crashed { .. } => Some(Cue::Crash),
            GameEvent::Won { .. } => Some(Cue::Win),
            GameEvent::SessionStarted | GameEvent::ObstacleSpawned | GameEvent::Reset => None,
        }
    }
}

/// Background music toggle state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicState {
    playing: bool,
    volume: f32,
}

impl MusicState {
    /// Starts optimistic: playback is assumed until autoplay is refused
    pub fn new(volume: f32) -> Self {
        Self {
            playing: true,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Flip the desired state and return it
    pub fn toggle(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    /// Playback was refused (autoplay policy, missing file)
    pub fn mark_blocked(&mut self) {
        self.playing = false;
    }

    /// Text for the toggle control
    pub fn label(&self) -> &'static str {
        if self.playing { "ON" } else { "OFF" }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{CuePlayer, MusicPlayer};

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    use super::{Cue, MusicState};

    /// Looping `<audio>` track with an ON/OFF toggle
    pub struct MusicPlayer {
        element: Option<HtmlAudioElement>,
        state: Rc<RefCell<MusicState>>,
    }

    impl MusicPlayer {
        pub fn new(src: &str, volume: f32) -> Self {
            let state = Rc::new(RefCell::new(MusicState::new(volume)));
            let element = match HtmlAudioElement::new_with_src(src) {
                Ok(el) => {
                    el.set_loop(true);
                    el.set_volume(state.borrow().volume() as f64);
                    Some(el)
                }
                Err(e) => {
                    log::warn!("Failed to create audio element: {:?}", e);
                    state.borrow_mut().mark_blocked();
                    None
                }
            };
            Self { element, state }
        }

        /// Try to start playback. Browsers usually refuse before a user
        /// gesture; that only turns the indicator off.
        pub fn autoplay(&self) {
            self.play_or_mark_blocked("Autoplay prevented");
        }

        /// Handle a press of the music control
        pub fn toggle(&self) {
            let Some(el) = &self.element else {
                log::warn!("No audio element - music unavailable");
                return;
            };
            let playing = self.state.borrow_mut().toggle();
            if playing {
                self.play_or_mark_blocked("Audio play failed");
            } else {
                let _ = el.pause();
            }
        }

        pub fn label(&self) -> &'static str {
            self.state.borrow().label()
        }

        fn play_or_mark_blocked(&self, reason: &'static str) {
            let Some(el) = &self.element else { return };
            let state = self.state.clone();
            match el.play() {
                Ok(promise) => {
                    wasm_bindgen_futures::spawn_local(async move {
                        if let Err(e) = JsFuture::from(promise).await {
                            log::warn!("{}: {:?}", reason, e);
                            state.borrow_mut().mark_blocked();
                        }
                    });
                }
                Err(e) => {
                    log::warn!("{}: {:?}", reason, e);
                    state.borrow_mut().mark_blocked();
                }
            }
        }
    }

    impl Drop for MusicPlayer {
        fn drop(&mut self) {
            if let Some(el) = &self.element {
                let _ = el.pause();
            }
        }
    }

    /// Procedural cues through the Web Audio API
    pub struct CuePlayer {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl CuePlayer {
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - cues disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
            }
        }

        pub fn play(&self, cue: Cue) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                Cue::Flap => self.sweep(ctx, 400.0, 800.0, 0.12, OscillatorType::Sine, 0.4),
                Cue::Score => self.sweep(ctx, 520.0, 680.0, 0.15, OscillatorType::Triangle, 0.5),
                Cue::Crash => self.sweep(ctx, 400.0, 80.0, 0.5, OscillatorType::Sawtooth, 0.35),
                Cue::Win => self.sweep(ctx, 440.0, 880.0, 0.6, OscillatorType::Square, 0.3),
            }
        }

        /// Create an oscillator with gain envelope
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

        /// Frequency sweep with an exponential fade
        fn sweep(
            &self,
            ctx: &AudioContext,
            from: f32,
            to: f32,
            duration: f64,
            osc_type: OscillatorType,
            level: f32,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(self.volume * level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + duration)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + duration * 0.7)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + duration + 0.05).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_mapping() {
        assert_eq!(Cue::for_event(&GameEvent::Flap), Some(Cue::Flap));
        assert_eq!(Cue::for_event(&GameEvent::Scored { score: 1 }), Some(Cue::Score));
        assert_eq!(Cue::for_event(&GameEvent::Crashed { score: 0 }), Some(Cue::Crash));
        assert_eq!(Cue::for_event(&GameEvent::Won { score: 6 }), Some(Cue::Win));
        assert_eq!(Cue::for_event(&GameEvent::ObstacleSpawned), None);
        assert_eq!(Cue::for_event(&GameEvent::Reset), None);
    }

    #[test]
    fn test_music_toggle_and_block() {
        let mut music = MusicState::new(0.5);
        assert!(music.is_playing());
        assert_eq!(music.label(), "ON");

        music.mark_blocked();
        assert!(!music.is_playing());
        assert_eq!(music.label(), "OFF");

        assert!(music.toggle());
        assert!(!music.toggle());
    }

    #[test]
    fn test_music_volume_clamped() {
        assert_eq!(MusicState::new(2.0).volume(), 1.0);
    }
}
