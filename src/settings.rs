//! Harness settings
//!
//! Step size, stall clamps and the chunk floor. Persisted as JSON under its
//! own key; unknown or missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{FIXED_STEP, MAX_FRAME_DELTA, MAX_STEPS, MIN_CHUNK_SECONDS, MIN_FRAME_DELTA};
use crate::error::ArcadeError;
use crate::persistence::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessSettings {
    /// Simulation step (seconds)
    pub fixed_step: f32,
    /// Step cap per frame
    pub max_steps: u32,
    /// Frame delta clamp (seconds)
    pub min_frame_delta: f32,
    pub max_frame_delta: f32,
    /// Shortest time a chunk stays active
    pub min_chunk_seconds: f32,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            fixed_step: FIXED_STEP,
            max_steps: MAX_STEPS,
            min_frame_delta: MIN_FRAME_DELTA,
            max_frame_delta: MAX_FRAME_DELTA,
            min_chunk_seconds: MIN_CHUNK_SECONDS,
        }
    }
}

impl HarnessSettings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "pulse_arcade.settings";

    /// Parse settings from a JSON object. Arrays and scalars are rejected
    /// even though serde would fill a struct from a sequence by position.
    pub fn from_json(json: &str) -> Result<Self, ArcadeError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(ArcadeError::Settings(serde::de::Error::custom(
                "settings must be a JSON object",
            )));
        }
        Ok(serde_json::from_value::<Self>(value)?.sanitized())
    }

    pub fn to_json(&self) -> String {
        // Plain numeric struct, serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Replace out-of-range values with usable ones
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.fixed_step.is_finite() && self.fixed_step > 0.0) {
            self.fixed_step = defaults.fixed_step;
        }
        if self.max_steps == 0 {
            self.max_steps = defaults.max_steps;
        }
        if !(self.min_frame_delta.is_finite() && self.min_frame_delta >= 0.0) {
            self.min_frame_delta = defaults.min_frame_delta;
        }
        if !self.max_frame_delta.is_finite()
            || self.max_frame_delta <= 0.0
            || self.max_frame_delta < self.min_frame_delta
        {
            self.max_frame_delta = defaults.max_frame_delta.max(self.min_frame_delta);
        }
        // One clamped frame must cover at least one step
        if self.fixed_step > self.max_frame_delta {
            self.fixed_step = defaults.fixed_step.min(self.max_frame_delta);
        }
        if !(self.min_chunk_seconds.is_finite() && self.min_chunk_seconds >= 0.0) {
            self.min_chunk_seconds = defaults.min_chunk_seconds;
        }
        self
    }

    /// Load from a store, falling back to defaults
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Load, then write back when the stored JSON is missing or was
    /// repaired, so the store always holds usable settings
    pub fn load_and_repair<S: KeyValueStore + ?Sized>(store: &mut S) -> Self {
        let settings = Self::load(store);
        let json = settings.to_json();
        if store.get(Self::STORAGE_KEY).as_deref() != Some(json.as_str()) {
            settings.save(store);
        }
        settings
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        match store.set(Self::STORAGE_KEY, &self.to_json()) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {e}"),
        }
    }
}
