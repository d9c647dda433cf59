//! Presentation preferences
//!
//! Colours and audio levels are handed to the renderer and the audio
//! collaborator explicitly. Nothing is read from page styles and nothing is
//! persisted between sessions.

use serde::Deserialize;

/// Parse a `#rrggbb` hex colour into RGBA floats
pub fn hex_color(hex: &str) -> Option<[f32; 4]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?, 1.0])
}

/// Visual and audio preferences
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Colours ===
    /// Pipe fill
    pub pipe_color: [f32; 4],
    /// Fallback circle when the player sprite is unavailable
    pub body_color: [f32; 4],
    /// Canvas clear colour (transparent shows the page background)
    pub background_color: [f32; 4],

    // === Audio ===
    /// Background track volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Short cues on flap/score/crash/win
    pub sound_effects: bool,
    /// Cue volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Accessibility ===
    /// Disable the velocity tilt of the body sprite
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // #ff6f8f
            pipe_color: [1.0, 0.435, 0.561, 1.0],
            // #ff476c
            body_color: [1.0, 0.278, 0.424, 1.0],
            background_color: [0.0, 0.0, 0.0, 0.0],

            music_volume: 0.5,
            sound_effects: true,
            sfx_volume: 0.6,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse a (possibly partial) JSON override. Volumes are clamped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.set_music_volume(settings.music_volume);
        settings.set_sfx_volume(settings.sfx_volume);
        Ok(settings)
    }

    /// Set music volume (clamped to 0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Set cue volume (clamped to 0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Override the pipe colour from a `#rrggbb` string; invalid input is ignored
    pub fn set_pipe_color_hex(&mut self, hex: &str) {
        match hex_color(hex) {
            Some(color) => self.pipe_color = color,
            None => log::warn!("Ignoring invalid pipe colour {:?}", hex),
        }
    }

    /// Effective cue volume (0 when cues are off)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sound_effects {
            self.sfx_volume
        } else {
            0.0
        }
    }

    /// Effective sprite tilt for a given velocity-derived angle
    pub fn effective_tilt(&self, tilt: f32) -> f32 {
        if self.reduced_motion { 0.0 } else { tilt }
    }
}
