//! Hand gesture mouse control.
//!
//! This crate turns the output of a hand landmark model into mouse cursor movement. Per video
//! frame, a [`HandLandmarker`] reports the 21 landmarks of every visible hand, the landmarks of one
//! hand are converted into pixel space ([`hand::landmark::HandObservation`]), simple gesture
//! features are computed from them ([`hand::features`]), and the index fingertip is mapped into
//! screen space by a [`cursor::CursorMapper`].
//!
//! Hand detection and landmark regression are not implemented here. Anything that produces
//! normalized landmark lists can be plugged in by implementing [`HandLandmarker`].
//!
//! # Coordinates
//!
//! Landmark and cursor coordinates use image conventions: X points to the right, Y points *down*,
//! and `(0, 0)` is the top left corner of the camera frame or screen.
//!
//! # Environment Variables
//!
//! [`config::Config::from_env`] reads the following overrides:
//!
//! * `GESTURE_MOUSE_SCREEN`: screen resolution as `WIDTHxHEIGHT`.
//! * `GESTURE_MOUSE_CAMERA`: camera resolution as `WIDTHxHEIGHT`.
//! * `GESTURE_MOUSE_MARGIN`: inset of the active camera region, in pixels.
//! * `GESTURE_MOUSE_SMOOTHING`: cursor smoothing divisor (1 disables smoothing).
//! * `GESTURE_MOUSE_MIN_CONFIDENCE`: minimum hand detection score between 0.0 and 1.0.
//! * `GESTURE_MOUSE_CLAMP`: if `1` or `true`, clamp the cursor to the screen instead of
//!   extrapolating.
//!
//! [`HandLandmarker`]: hand::landmark::HandLandmarker

use log::LevelFilter;

pub mod config;
pub mod controller;
pub mod cursor;
pub mod hand;
pub mod image;
pub mod resolution;
pub mod timer;

pub use anyhow::{Error, Result};

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and this crate will log at *trace*
/// level. Otherwise, they will log at *debug* level. `RUST_LOG` takes precedence over both.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
