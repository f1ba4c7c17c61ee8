//! Mapping of fingertip positions to screen cursor positions.
//!
//! Only a central part of the camera frame, the *active region*, is mapped onto the screen. This
//! lets the user reach the screen edges without moving their hand to the very edge of the camera's
//! view, where hand tracking is unreliable. The mapped position is then smoothed with an
//! exponential moving average to suppress landmark jitter.

use std::fmt;

use anyhow::ensure;

use crate::{image::Rect, resolution::Resolution};

/// An absolute cursor position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorPos {
    pub x: f32,
    pub y: f32,
}

impl CursorPos {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for CursorPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Smoothing state carried from one frame to the next.
///
/// Starts out at the screen origin. The caller owns the state and passes it to
/// [`CursorMapper::map`] on every frame a hand is visible.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorState {
    prev: CursorPos,
}

impl CursorState {
    pub fn new(prev: CursorPos) -> Self {
        Self { prev }
    }

    /// Returns the cursor position computed in the previous frame.
    #[inline]
    pub fn position(&self) -> CursorPos {
        self.prev
    }
}

/// How fingertip positions outside of the active region are mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutOfRange {
    /// Continue the linear mapping past the active region. The result can lie off-screen.
    #[default]
    Extrapolate,
    /// Clamp to the edges of the active region, and thus to the screen.
    Clamp,
}

/// Parameters of the camera-to-screen mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorConfig {
    /// Size of the camera frames the fingertip positions refer to.
    pub camera: Resolution,
    /// Size of the screen the cursor moves on.
    pub screen: Resolution,
    /// Inset of the active region, in camera pixels.
    pub frame_margin: u32,
    /// Divisor applied to the distance between the previous and the new position. `1` disables
    /// smoothing, larger values trade responsiveness for steadiness.
    pub smoothing: u32,
    pub out_of_range: OutOfRange,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            camera: Resolution::VGA,
            screen: Resolution::RES_1080P,
            frame_margin: 100,
            smoothing: 7,
            out_of_range: OutOfRange::Extrapolate,
        }
    }
}

impl CursorConfig {
    /// Checks that the configuration describes a non-degenerate mapping.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.smoothing >= 1, "cursor smoothing must be at least 1");
        ensure!(
            u64::from(self.frame_margin) * 2 < u64::from(self.camera.width())
                && u64::from(self.frame_margin) * 2 < u64::from(self.camera.height()),
            "frame margin of {}px leaves no active region in a {} camera frame",
            self.frame_margin,
            self.camera,
        );
        ensure!(
            self.screen.width() > 0 && self.screen.height() > 0,
            "screen resolution {} is empty",
            self.screen,
        );
        Ok(())
    }
}

/// Maps index fingertip positions in camera space to smoothed screen positions.
#[derive(Debug, Clone)]
pub struct CursorMapper {
    config: CursorConfig,
}

impl CursorMapper {
    /// Creates a mapper, returning an error if `config` fails [`CursorConfig::validate`].
    pub fn new(config: CursorConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    /// Returns the part of the camera frame that is mapped onto the screen.
    ///
    /// Horizontally, the margin is removed on both sides. Vertically, the region starts at the top
    /// of the frame and twice the margin is removed at the bottom, since a hand raised near the
    /// bottom edge is mostly out of view.
    pub fn active_region(&self) -> Rect {
        let m = self.config.frame_margin as i32;
        let (w, h) = (
            self.config.camera.width() as i32,
            self.config.camera.height() as i32,
        );
        Rect::from_corners((m, 0), (w - m, h - 2 * m))
    }

    /// Maps a fingertip position to the screen, without smoothing.
    pub fn rescale(&self, fingertip: (i32, i32)) -> CursorPos {
        let c = &self.config;
        let m = c.frame_margin as f32;
        let (cam_w, cam_h) = (c.camera.width() as f32, c.camera.height() as f32);
        let x = interp(
            fingertip.0 as f32,
            (m, cam_w - m),
            (0.0, c.screen.width() as f32),
            c.out_of_range,
        );
        let y = interp(
            fingertip.1 as f32,
            (0.0, cam_h - 2.0 * m),
            (0.0, c.screen.height() as f32),
            c.out_of_range,
        );
        CursorPos { x, y }
    }

    /// Maps a fingertip position to the screen and smooths the result against `state`.
    ///
    /// Returns the new state; its [`CursorState::position`] is where the cursor should move.
    #[must_use]
    pub fn map(&self, fingertip: (i32, i32), state: CursorState) -> CursorState {
        let target = self.rescale(fingertip);
        let prev = state.prev;
        let s = self.config.smoothing as f32;
        let pos = CursorPos {
            x: prev.x + (target.x - prev.x) / s,
            y: prev.y + (target.y - prev.y) / s,
        };
        log::trace!("fingertip {:?} -> {} -> {}", fingertip, target, pos);
        CursorState { prev: pos }
    }
}

/// Linearly maps `value` from the range `from` to the range `to`.
fn interp(value: f32, from: (f32, f32), to: (f32, f32), out_of_range: OutOfRange) -> f32 {
    let value = match out_of_range {
        OutOfRange::Extrapolate => value,
        OutOfRange::Clamp => value.clamp(from.0, from.1),
    };
    to.0 + (value - from.0) * (to.1 - to.0) / (from.1 - from.0)
}

/// Error returned by a [`CursorSink`] that could not move the cursor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CursorError {
    #[error("cursor position {pos} lies outside of the {screen} screen")]
    OutOfBounds { pos: CursorPos, screen: Resolution },
    #[error("failed to move cursor to {pos}: {reason}")]
    Backend { pos: CursorPos, reason: String },
}

/// Receiver of absolute cursor movements, usually the OS pointer.
pub trait CursorSink {
    /// Moves the cursor to `pos`.
    fn move_to(&mut self, pos: CursorPos) -> Result<(), CursorError>;
}

impl<S: CursorSink + ?Sized> CursorSink for &mut S {
    fn move_to(&mut self, pos: CursorPos) -> Result<(), CursorError> {
        (**self).move_to(pos)
    }
}

impl<S: CursorSink + ?Sized> CursorSink for Box<S> {
    fn move_to(&mut self, pos: CursorPos) -> Result<(), CursorError> {
        (**self).move_to(pos)
    }
}

/// A [`CursorSink`] that only logs the requested positions.
#[derive(Debug, Default)]
pub struct LogCursor;

impl CursorSink for LogCursor {
    fn move_to(&mut self, pos: CursorPos) -> Result<(), CursorError> {
        log::info!("move cursor to {}", pos);
        Ok(())
    }
}

/// Wraps a [`CursorSink`] and rejects positions outside of the screen.
///
/// Many pointer APIs refuse off-screen coordinates. This makes that behavior explicit and
/// platform-independent.
#[derive(Debug)]
pub struct ScreenBounds<S> {
    inner: S,
    screen: Resolution,
}

impl<S: CursorSink> ScreenBounds<S> {
    pub fn new(inner: S, screen: Resolution) -> Self {
        Self { inner, screen }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: CursorSink> CursorSink for ScreenBounds<S> {
    fn move_to(&mut self, pos: CursorPos) -> Result<(), CursorError> {
        if !self.screen.contains(pos.x, pos.y) {
            return Err(CursorError::OutOfBounds {
                pos,
                screen: self.screen,
            });
        }
        self.inner.move_to(pos)
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    fn mapper(smoothing: u32) -> CursorMapper {
        CursorMapper::new(CursorConfig {
            smoothing,
            ..CursorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_rescale_boundaries() {
        let m = mapper(7);
        // x: [100, 540] -> [0, 1920], y: [0, 280] -> [0, 1080]
        assert_eq!(m.rescale((100, 0)), CursorPos::new(0.0, 0.0));
        assert_eq!(m.rescale((540, 280)), CursorPos::new(1920.0, 1080.0));
        let mid = m.rescale((320, 140));
        assert_relative_eq!(mid.x, 960.0);
        assert_relative_eq!(mid.y, 540.0);
    }

    #[test]
    fn test_rescale_extrapolates() {
        let m = mapper(1);
        let pos = m.rescale((0, 480));
        assert!(pos.x < 0.0);
        assert_relative_eq!(pos.x, -100.0 * 1920.0 / 440.0);
        assert!(pos.y > 1080.0);
    }

    #[test]
    fn test_rescale_clamps() {
        let m = CursorMapper::new(CursorConfig {
            out_of_range: OutOfRange::Clamp,
            ..CursorConfig::default()
        })
        .unwrap();
        assert_eq!(m.rescale((0, 480)), CursorPos::new(0.0, 1080.0));
        assert_eq!(m.rescale((639, -5)), CursorPos::new(1920.0, 0.0));
    }

    #[test]
    fn test_no_smoothing() {
        let m = mapper(1);
        let state = m.map((250, 77), CursorState::new(CursorPos::new(12.0, 900.0)));
        assert_eq!(state.position(), m.rescale((250, 77)));
    }

    #[test]
    fn test_smoothing_step() {
        let m = mapper(7);
        let state = m.map((540, 280), CursorState::default());
        assert_relative_eq!(state.position().x, 1920.0 / 7.0);
        assert_relative_eq!(state.position().y, 1080.0 / 7.0);
    }

    #[test]
    fn test_fixed_point() {
        let m = mapper(7);
        let target = m.rescale((320, 140));
        let state = CursorState::new(target);
        assert_eq!(m.map((320, 140), state), state);
    }

    #[test]
    fn test_converges() {
        let m = mapper(7);
        let target = m.rescale((400, 50));
        let mut state = CursorState::default();
        let mut prev_err = f32::INFINITY;
        for i in 0..200 {
            state = m.map((400, 50), state);
            let err = (state.position().x - target.x).abs() + (state.position().y - target.y).abs();
            if i < 20 {
                assert!(err < prev_err, "error grew at iteration {i}: {err} >= {prev_err}");
            }
            prev_err = err;
        }
        assert_abs_diff_eq!(state.position().x, target.x, epsilon = 1e-2);
        assert_abs_diff_eq!(state.position().y, target.y, epsilon = 1e-2);
    }

    #[test]
    fn test_active_region() {
        let region = mapper(7).active_region();
        assert_eq!(region, Rect::from_corners((100, 0), (540, 280)));
    }

    #[test]
    fn test_invalid_config() {
        assert!(CursorMapper::new(CursorConfig {
            smoothing: 0,
            ..CursorConfig::default()
        })
        .is_err());
        assert!(CursorMapper::new(CursorConfig {
            frame_margin: 240,
            ..CursorConfig::default()
        })
        .is_err());
        assert!(CursorMapper::new(CursorConfig {
            frame_margin: 0,
            ..CursorConfig::default()
        })
        .is_ok());
    }

    #[derive(Default)]
    struct Recorder(Vec<CursorPos>);

    impl CursorSink for Recorder {
        fn move_to(&mut self, pos: CursorPos) -> Result<(), CursorError> {
            self.0.push(pos);
            Ok(())
        }
    }

    #[test]
    fn test_screen_bounds() {
        let screen = Resolution::new(100, 50);
        let mut sink = ScreenBounds::new(Recorder::default(), screen);
        sink.move_to(CursorPos::new(0.0, 0.0)).unwrap();
        sink.move_to(CursorPos::new(99.5, 49.0)).unwrap();
        for pos in [
            CursorPos::new(-0.5, 10.0),
            CursorPos::new(10.0, -1.0),
            CursorPos::new(100.0, 10.0),
            CursorPos::new(10.0, 50.0),
        ] {
            assert_eq!(
                sink.move_to(pos),
                Err(CursorError::OutOfBounds { pos, screen })
            );
        }
        assert_eq!(sink.into_inner().0.len(), 2);
    }

    #[test]
    fn test_error_message() {
        let err = CursorError::OutOfBounds {
            pos: CursorPos::new(-3.0, 12.5),
            screen: Resolution::RES_1080P,
        };
        assert_eq!(
            err.to_string(),
            "cursor position (-3.0, 12.5) lies outside of the 1920x1080 screen"
        );
    }
}
