//! Frame rate and per-stage timing.

use std::{
    cell::RefCell,
    fmt,
    time::{Duration, Instant},
};

/// Number of samples after which a [`Timer`] starts overwriting its oldest samples.
const MAX_SAMPLES: usize = 250;

/// A timer that can measure and average the time an operation takes.
///
/// Collected timings are averaged and reset when the timer is displayed using `{}`
/// ([`std::fmt::Display`]).
pub struct Timer {
    name: &'static str,
    samples: RefCell<Samples>,
}

#[derive(Default)]
struct Samples {
    durations: Vec<Duration>,
    next: usize,
}

impl Timer {
    /// Creates a new timer.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            samples: Default::default(),
        }
    }

    /// Invokes a closure, measuring and recording the time it takes.
    pub fn time<T>(&mut self, timee: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = timee();
        self.record(start.elapsed());
        result
    }

    /// Returns the number of samples recorded since the timer was last displayed.
    pub fn samples(&self) -> usize {
        self.samples.borrow().durations.len()
    }

    fn record(&mut self, duration: Duration) {
        let samples = self.samples.get_mut();
        if samples.durations.len() < MAX_SAMPLES {
            samples.durations.push(duration);
        } else {
            let i = samples.next % MAX_SAMPLES;
            samples.durations[i] = duration;
            samples.next = i + 1;
        }
    }
}

/// Displays the average recorded time and resets it.
impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `Timer` isn't `Sync` and `time` takes `&mut self`, so this borrow can't conflict.
        let mut samples = self.samples.borrow_mut();
        let len = samples.durations.len();
        let avg_ms = if len == 0 {
            0.0
        } else {
            samples
                .durations
                .iter()
                .map(|d| d.as_secs_f32() * 1000.0)
                .sum::<f32>()
                / len as f32
        };
        *samples = Samples::default();

        write!(f, "{}: {len}x{avg_ms:.01}ms", self.name)
    }
}

/// Counts frames per second and logs the rate once per second.
pub struct FpsCounter {
    name: String,
    frames: u32,
    start: Instant,
    last_fps: Option<u32>,
}

impl FpsCounter {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            frames: 0,
            start: Instant::now(),
            last_fps: None,
        }
    }

    /// Returns the frame rate measured over the last full second, if one has passed.
    pub fn fps(&self) -> Option<u32> {
        self.last_fps
    }

    /// Advances the frame counter by 1 and logs FPS and `extra` data if one second has passed.
    ///
    /// Each item of `extra` is appended to the log line, eg. the [`Timer`]s of the frame's stages.
    pub fn tick_with<D: fmt::Display, I: IntoIterator<Item = D>>(&mut self, extra: I) {
        self.frames += 1;
        let elapsed = self.start.elapsed();
        if elapsed < Duration::from_secs(1) {
            return;
        }

        let fps = (self.frames as f32 / elapsed.as_secs_f32()).round() as u32;
        let extra = extra
            .into_iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>();
        if extra.is_empty() {
            log::debug!("{}: {} FPS", self.name, fps);
        } else {
            log::debug!("{}: {} FPS ({})", self.name, fps, extra.join(", "));
        }

        self.last_fps = Some(fps);
        self.frames = 0;
        self.start = Instant::now();
    }
}
