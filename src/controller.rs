//! Per-frame gesture mouse control.
//!
//! [`GestureController`] ties everything together: it runs the landmarker on a frame, picks the
//! controlling hand, computes its features, moves the cursor to where the index fingertip points,
//! and draws overlays. It owns the cursor smoothing state, so one controller should be used for the
//! whole lifetime of a video stream.

use crate::{
    config::Config,
    cursor::{CursorError, CursorMapper, CursorPos, CursorSink, CursorState},
    hand::{
        features::{self, BoundingBox, Distance, FingerState},
        landmark::{HandLandmarker, HandLandmarks, HandObservation, LandmarkIdx},
    },
    image::{self, Color, Image},
    timer::{FpsCounter, Timer},
};

/// Everything computed for the controlling hand in one frame.
#[derive(Debug, Clone)]
pub struct HandFeatures {
    pub observation: HandObservation,
    pub bbox: Option<BoundingBox>,
    pub fingers: FingerState,
    /// Distance between index and middle fingertip.
    pub pinch: Distance,
    /// Smoothed cursor position the sink was asked to move to.
    pub cursor: CursorPos,
    /// Result of moving the cursor. Failures have already been logged.
    pub moved: Result<(), CursorError>,
}

/// Result of [`GestureController::process`].
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// Number of hands that passed the confidence filter and the hand limit.
    pub hands: usize,
    /// Features of the controlling hand, or `None` if it wasn't visible.
    pub hand: Option<HandFeatures>,
}

/// Drives cursor movement from hand landmarks, one frame at a time.
pub struct GestureController<S> {
    config: Config,
    mapper: CursorMapper,
    state: CursorState,
    sink: S,
    fps: FpsCounter,
    t_features: Timer,
    t_cursor: Timer,
    warned_resolution: bool,
}

impl<S: CursorSink> GestureController<S> {
    /// Creates a controller that moves the cursor through `sink`.
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(config: Config, sink: S) -> anyhow::Result<Self> {
        config.validate()?;
        let mapper = CursorMapper::new(config.cursor)?;
        log::debug!(
            "{}: mapping {:?} of the {} camera frame onto a {} screen",
            config.window_title,
            mapper.active_region(),
            config.cursor.camera,
            config.cursor.screen,
        );
        Ok(Self {
            fps: FpsCounter::new(config.window_title.clone()),
            config,
            mapper,
            state: CursorState::default(),
            sink,
            t_features: Timer::new("features"),
            t_cursor: Timer::new("cursor"),
            warned_resolution: false,
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn cursor_state(&self) -> CursorState {
        self.state
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Returns the frame rate measured over the last second.
    pub fn fps(&self) -> Option<u32> {
        self.fps.fps()
    }

    /// Runs `landmarker` on a camera frame and processes the detected hands.
    ///
    /// If mirroring is enabled, `image` is flipped in place first, so the landmarker and the
    /// overlays both see the selfie view. Errors from the landmarker are returned as-is.
    pub fn track<L: HandLandmarker>(
        &mut self,
        landmarker: &mut L,
        image: &mut Image,
    ) -> anyhow::Result<FrameReport> {
        if self.config.mirror {
            image.flip_horizontal_in_place();
        }
        let hands = landmarker.detect(image)?;
        Ok(self.process(image, &hands))
    }

    /// Processes the landmarks detected in `image`.
    ///
    /// Never fails: a frame without a usable hand leaves the cursor alone, and cursor movement
    /// failures are logged and reported in the returned [`FrameReport`].
    pub fn process(&mut self, image: &mut Image, hands: &[HandLandmarks]) -> FrameReport {
        if image.resolution() != self.config.cursor.camera && !self.warned_resolution {
            log::warn!(
                "frame resolution {} differs from configured camera resolution {}",
                image.resolution(),
                self.config.cursor.camera,
            );
            self.warned_resolution = true;
        }

        let candidates = hands
            .iter()
            .filter(|hand| hand.score() >= self.config.min_confidence)
            .take(self.config.max_hands)
            .collect::<Vec<_>>();
        log::trace!("{} of {} hands considered", candidates.len(), hands.len());

        let observation = candidates.get(self.config.hand_num).and_then(|hand| {
            match HandObservation::from_landmarks(hand, image.resolution()) {
                Ok(obs) => Some(obs),
                Err(e) => {
                    log::warn!("skipping hand: {}", e);
                    None
                }
            }
        });
        let features = observation.map(|obs| self.control(obs));

        if self.config.draw {
            self.draw(image, features.as_ref());
        }
        self.fps.tick_with([&self.t_features, &self.t_cursor]);

        FrameReport {
            hands: candidates.len(),
            hand: features,
        }
    }

    fn control(&mut self, observation: HandObservation) -> HandFeatures {
        let (bbox, fingers, pinch) = self.t_features.time(|| {
            (
                features::bounding_box(observation.landmarks()),
                features::fingers_up(&observation),
                features::pinch(&observation),
            )
        });

        let tip = observation.landmark(LandmarkIdx::IndexFingerTip).pos();
        let (mapper, prev) = (&self.mapper, self.state);
        self.state = self.t_cursor.time(|| mapper.map(tip, prev));

        let cursor = self.state.position();
        let moved = self.sink.move_to(cursor);
        if let Err(e) = &moved {
            log::warn!("{}", e);
        }
        log::trace!("fingers={:?} pinch={:.1}px cursor={}", fingers, pinch.length, cursor);

        HandFeatures {
            observation,
            bbox,
            fingers,
            pinch,
            cursor,
            moved,
        }
    }

    fn draw(&self, image: &mut Image, features: Option<&HandFeatures>) {
        image::draw_rect(image, self.mapper.active_region())
            .color(Color::MAGENTA)
            .stroke_width(2);

        if let Some(features) = features {
            features.observation.draw(image);
            if let Some(bbox) = &features.bbox {
                bbox.draw(image);
            }
            features.pinch.draw(image);
        }

        if let Some(fps) = self.fps.fps() {
            image::draw_text(image, 10, 40, &format!("FPS: {fps}"))
                .color(Color::MAGENTA)
                .align_baseline_left();
        }
    }
}
