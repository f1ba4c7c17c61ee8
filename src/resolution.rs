//! Types for representing camera and screen resolutions.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Context};

/// Resolution (`width x height`) of a camera frame, image, or screen.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// VGA resolution: `640x480`. The capture size the controller is tuned for.
    pub const VGA: Self = Self {
        width: 640,
        height: 480,
    };

    /// 1080p resolution: `1920x1080`
    pub const RES_1080P: Self = Self {
        width: 1920,
        height: 1080,
    };

    /// Creates a new [`Resolution`] of `width x height`.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the width of this [`Resolution`].
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of this [`Resolution`].
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `true` if `(x, y)` lies inside `[0, width) x [0, height)`.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width as f32 && y < self.height as f32
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Parses `WIDTHxHEIGHT`, eg. `1920x1080`.
impl FromStr for Resolution {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| anyhow!("invalid resolution '{s}' (expected WIDTHxHEIGHT)"))?;
        let width = w
            .parse::<u32>()
            .with_context(|| format!("invalid width in resolution '{s}'"))?;
        let height = h
            .parse::<u32>()
            .with_context(|| format!("invalid height in resolution '{s}'"))?;
        if width == 0 || height == 0 {
            anyhow::bail!("resolution '{s}' must not be empty");
        }
        Ok(Self::new(width, height))
    }
}
