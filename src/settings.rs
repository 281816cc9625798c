//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web; native builds use defaults.

use serde::{Deserialize, Serialize};

use crate::consts::STAR_COUNT;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Visual ===
    /// Draw the background starfield
    pub starfield: bool,
    /// Stars per frame when the starfield is on
    pub star_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            starfield: true,
            star_count: STAR_COUNT,
        }
    }
}

impl Settings {
    /// Upper bound on stars per frame
    pub const MAX_STARS: usize = 500;

    /// Stars to draw this frame (respects the starfield toggle)
    pub fn effective_star_count(&self) -> usize {
        if self.starfield {
            self.star_count.min(Self::MAX_STARS)
        } else {
            0
        }
    }

    /// Combined output volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Flip the mute flag, returning the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Parse stored JSON, falling back to defaults on corrupt data
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "star_invaders_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match serde_json::to_string(self) {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Failed to serialize settings: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.effective_star_count(), 100);
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"muted": true, "star_count": 40}"#);
        assert!(settings.muted);
        assert_eq!(settings.star_count, 40);
        assert_eq!(settings.master_volume, 0.8);
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_toggle_mute_silences() {
        let mut settings = Settings::default();
        assert!(settings.toggle_mute());
        assert_eq!(settings.effective_volume(), 0.0);
        assert!(!settings.toggle_mute());
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_json_round_trip_keeps_mute() {
        let mut settings = Settings::default();
        settings.toggle_mute();
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), settings);
    }

    #[test]
    fn test_corrupt_json_falls_back() {
        assert_eq!(Settings::from_json("{not json"), Settings::default());
    }

    #[test]
    fn test_starfield_toggle_and_cap() {
        let mut settings = Settings {
            star_count: 10_000,
            ..Default::default()
        };
        assert_eq!(settings.effective_star_count(), Settings::MAX_STARS);
        settings.starfield = false;
        assert_eq!(settings.effective_star_count(), 0);
    }
}
