//! Controller configuration.

use std::{env, str::FromStr};

use anyhow::{ensure, Context};

use crate::{
    cursor::{CursorConfig, OutOfRange},
    resolution::Resolution,
};

/// Settings for a [`GestureController`](crate::controller::GestureController).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Camera-to-screen mapping.
    pub cursor: CursorConfig,
    /// At most this many detected hands are considered per frame.
    pub max_hands: usize,
    /// Hands with a lower detection score are ignored.
    pub min_confidence: f32,
    /// Which of the remaining hands controls the cursor.
    pub hand_num: usize,
    /// Mirror camera frames before landmark detection, for a selfie view.
    pub mirror: bool,
    /// Draw overlays onto the frame.
    pub draw: bool,
    /// Name of the output window, also used in log messages.
    pub window_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cursor: CursorConfig::default(),
            max_hands: 1,
            min_confidence: 0.75,
            hand_num: 0,
            mirror: true,
            draw: true,
            window_title: "Gesture".into(),
        }
    }
}

impl Config {
    /// Creates the default configuration and applies overrides from `GESTURE_MOUSE_*` environment
    /// variables.
    ///
    /// See the [crate-level documentation](crate) for the list of variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`Config::from_env`], but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(screen) = parse_var(&lookup, "GESTURE_MOUSE_SCREEN")? {
            config.cursor.screen = screen;
        }
        if let Some(camera) = parse_var(&lookup, "GESTURE_MOUSE_CAMERA")? {
            config.cursor.camera = camera;
        }
        if let Some(margin) = parse_var(&lookup, "GESTURE_MOUSE_MARGIN")? {
            config.cursor.frame_margin = margin;
        }
        if let Some(smoothing) = parse_var(&lookup, "GESTURE_MOUSE_SMOOTHING")? {
            config.cursor.smoothing = smoothing;
        }
        if let Some(conf) = parse_var(&lookup, "GESTURE_MOUSE_MIN_CONFIDENCE")? {
            config.min_confidence = conf;
        }
        if let Some(clamp) = lookup("GESTURE_MOUSE_CLAMP") {
            config.cursor.out_of_range = match clamp.trim() {
                "1" | "true" => OutOfRange::Clamp,
                "0" | "false" | "" => OutOfRange::Extrapolate,
                other => anyhow::bail!("invalid value '{other}' for GESTURE_MOUSE_CLAMP"),
            };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.cursor.validate()?;
        ensure!(
            (0.0..=1.0).contains(&self.min_confidence),
            "minimum confidence {} is not between 0.0 and 1.0",
            self.min_confidence
        );
        ensure!(
            self.hand_num < self.max_hands,
            "hand #{} is never tracked when only {} hands are considered",
            self.hand_num,
            self.max_hands
        );
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Into<anyhow::Error>,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => {
            let parsed = value
                .trim()
                .parse::<T>()
                .map_err(|e| -> anyhow::Error { e.into() })
                .with_context(|| format!("invalid value '{value}' for {name}"))?;
            log::debug!("{name}={value}");
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}
