//! Hand landmark representation.
//!
//! Hand landmark models (like the one used by MediaPipe Hands) output 21 points per hand, in
//! coordinates normalized to the input image's size. [`HandLandmarks`] holds that raw output, and
//! [`HandObservation`] holds the same points converted to pixel coordinates of a specific frame.

use std::ops::{Index, RangeInclusive};

use serde::Deserialize;

use crate::{
    image::{self, Color, Image},
    resolution::Resolution,
};

/// Number of landmarks the hand landmark model outputs per hand.
pub const NUM_LANDMARKS: usize = 21;

/// Range of accepted normalized landmark coordinates.
///
/// Landmark models may place points of a partially visible hand somewhat outside of the frame, so
/// this is wider than `[0, 1]`. Anything beyond it is treated as garbage output.
pub const COORD_RANGE: RangeInclusive<f32> = -1.0..=2.0;

/// Anything that can locate hands in a camera frame and regress their landmarks.
///
/// Implementations wrap an external pose-estimation model. They should return one
/// [`HandLandmarks`] per detected hand, in the order the model reports them (usually by decreasing
/// confidence). An empty list means that no hand was found, which is not an error.
pub trait HandLandmarker {
    /// Detects hands in `image` and returns their normalized landmarks.
    fn detect(&mut self, image: &Image) -> anyhow::Result<Vec<HandLandmarks>>;
}

impl<L: HandLandmarker + ?Sized> HandLandmarker for &mut L {
    fn detect(&mut self, image: &Image) -> anyhow::Result<Vec<HandLandmarks>> {
        (**self).detect(image)
    }
}

impl<L: HandLandmarker + ?Sized> HandLandmarker for Box<L> {
    fn detect(&mut self, image: &Image) -> anyhow::Result<Vec<HandLandmarks>> {
        (**self).detect(image)
    }
}

/// Which hand was detected.
///
/// The landmark model classifies handedness assuming that the camera image is *mirrored*, so a
/// hand reported as [`Handedness::Right`] is a right hand in a selfie view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// Raw landmark output of the landmark model for a single hand.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HandLandmarks {
    handedness: Handedness,
    /// Detection confidence between 0.0 and 1.0.
    #[serde(default = "default_score")]
    score: f32,
    /// `[x, y]` positions normalized to `[0, 1]` of the image size.
    landmarks: Vec<[f32; 2]>,
}

fn default_score() -> f32 {
    1.0
}

impl HandLandmarks {
    pub fn new(handedness: Handedness, score: f32, landmarks: Vec<[f32; 2]>) -> Self {
        Self {
            handedness,
            score,
            landmarks,
        }
    }

    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Returns the confidence of the detection, between 0.0 and 1.0.
    #[inline]
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Returns the normalized `[x, y]` landmark positions.
    #[inline]
    pub fn positions(&self) -> &[[f32; 2]] {
        &self.landmarks
    }

    /// Checks that there are exactly [`NUM_LANDMARKS`] positions, all finite and inside
    /// [`COORD_RANGE`].
    pub fn validate(&self) -> Result<(), LandmarkError> {
        if self.landmarks.len() != NUM_LANDMARKS {
            return Err(LandmarkError::Count(self.landmarks.len()));
        }
        match self
            .landmarks
            .iter()
            .position(|[x, y]| !COORD_RANGE.contains(x) || !COORD_RANGE.contains(y))
        {
            Some(index) => {
                let [x, y] = self.landmarks[index];
                Err(LandmarkError::OutOfRange { index, x, y })
            }
            None => Ok(()),
        }
    }
}

/// Error returned for landmark lists that can't be turned into a [`HandObservation`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum LandmarkError {
    #[error("expected 21 hand landmarks, got {0}")]
    Count(usize),
    #[error("landmark {index} at ({x}, {y}) is far outside of the frame")]
    OutOfRange { index: usize, x: f32, y: f32 },
}

/// A single landmark in pixel coordinates of a camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landmark {
    pub index: usize,
    pub x: i32,
    pub y: i32,
}

impl Landmark {
    #[inline]
    pub fn pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// The 21 landmarks of one hand in one frame, in pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    handedness: Handedness,
    landmarks: [Landmark; NUM_LANDMARKS],
}

impl HandObservation {
    /// Converts normalized landmarks to pixel coordinates of a frame of size `res`.
    ///
    /// Coordinates are scaled by the frame size in double precision and truncated towards zero.
    /// Fails if `hand` doesn't pass [`HandLandmarks::validate`].
    pub fn from_landmarks(hand: &HandLandmarks, res: Resolution) -> Result<Self, LandmarkError> {
        hand.validate()?;
        let (w, h) = (f64::from(res.width()), f64::from(res.height()));
        Self::from_pixels(
            hand.handedness(),
            hand.positions()
                .iter()
                .map(|&[x, y]| ((f64::from(x) * w) as i32, (f64::from(y) * h) as i32)),
        )
    }

    /// Creates an observation from pixel positions ordered by landmark index.
    pub fn from_pixels<I>(handedness: Handedness, positions: I) -> Result<Self, LandmarkError>
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let mut landmarks = [Landmark {
            index: 0,
            x: 0,
            y: 0,
        }; NUM_LANDMARKS];
        let mut count = 0;
        for (x, y) in positions {
            if let Some(lm) = landmarks.get_mut(count) {
                *lm = Landmark { index: count, x, y };
            }
            count += 1;
        }
        if count != NUM_LANDMARKS {
            return Err(LandmarkError::Count(count));
        }

        Ok(Self {
            handedness,
            landmarks,
        })
    }

    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    #[inline]
    pub fn landmarks(&self) -> &[Landmark; NUM_LANDMARKS] {
        &self.landmarks
    }

    #[inline]
    pub fn landmark(&self, idx: LandmarkIdx) -> Landmark {
        self.landmarks[idx as usize]
    }

    /// Draws the hand skeleton and a filled circle on every landmark.
    pub fn draw(&self, target: &mut Image) {
        for (a, b) in CONNECTIVITY {
            image::draw_line(target, self[*a].pos(), self[*b].pos()).color(Color::GREEN);
        }
        for lm in &self.landmarks {
            image::draw_circle(target, lm.x, lm.y, 15);
        }
    }
}

impl Index<LandmarkIdx> for HandObservation {
    type Output = Landmark;

    fn index(&self, index: LandmarkIdx) -> &Landmark {
        &self.landmarks[index as usize]
    }
}

impl Index<usize> for HandObservation {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Landmark {
        &self.landmarks[index]
    }
}

/// Names for the hand pose landmarks.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl LandmarkIdx {
    /// Fingertip landmarks, ordered thumb, index, middle, ring, pinky.
    pub const TIPS: [LandmarkIdx; 5] = [
        LandmarkIdx::ThumbTip,
        LandmarkIdx::IndexFingerTip,
        LandmarkIdx::MiddleFingerTip,
        LandmarkIdx::RingFingerTip,
        LandmarkIdx::PinkyTip,
    ];
}

const CONNECTIVITY: &[(LandmarkIdx, LandmarkIdx)] = {
    use LandmarkIdx::*;
    &[
        // Surround the palm:
        (Wrist, ThumbCmc),
        (ThumbCmc, IndexFingerMcp),
        (IndexFingerMcp, MiddleFingerMcp),
        (MiddleFingerMcp, RingFingerMcp),
        (RingFingerMcp, PinkyMcp),
        (PinkyMcp, Wrist),
        // Thumb:
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        // Index:
        (IndexFingerMcp, IndexFingerPip),
        (IndexFingerPip, IndexFingerDip),
        (IndexFingerDip, IndexFingerTip),
        // Middle:
        (MiddleFingerMcp, MiddleFingerPip),
        (MiddleFingerPip, MiddleFingerDip),
        (MiddleFingerDip, MiddleFingerTip),
        // Ring:
        (RingFingerMcp, RingFingerPip),
        (RingFingerPip, RingFingerDip),
        (RingFingerDip, RingFingerTip),
        // Pinky:
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(n: usize) -> HandLandmarks {
        let points = (0..n).map(|i| [i as f32 / 32.0, 0.5]).collect();
        HandLandmarks::new(Handedness::Right, 0.9, points)
    }

    #[test]
    fn test_pixel_conversion() {
        let hand = HandLandmarks::new(
            Handedness::Left,
            1.0,
            vec![[0.5, 0.25]; NUM_LANDMARKS],
        );
        let obs = HandObservation::from_landmarks(&hand, Resolution::VGA).unwrap();
        assert_eq!(obs.handedness(), Handedness::Left);
        assert_eq!(obs[0].pos(), (320, 120));
        assert_eq!(obs[20], Landmark { index: 20, x: 320, y: 120 });

        // truncation, not rounding
        let mut points = vec![[0.0, 0.0]; NUM_LANDMARKS];
        points[8] = [0.999, 0.999];
        let hand = HandLandmarks::new(Handedness::Right, 1.0, points);
        let obs = HandObservation::from_landmarks(&hand, Resolution::new(100, 10)).unwrap();
        assert_eq!(obs.landmark(LandmarkIdx::IndexFingerTip).pos(), (99, 9));

        // 0.29f32 is slightly below 0.29; an f32 product would round up to 29
        let mut points = vec![[0.0, 0.0]; NUM_LANDMARKS];
        points[4] = [0.29, 0.57];
        let hand = HandLandmarks::new(Handedness::Right, 1.0, points);
        let obs = HandObservation::from_landmarks(&hand, Resolution::new(100, 100)).unwrap();
        assert_eq!(obs.landmark(LandmarkIdx::ThumbTip).pos(), (28, 56));
    }

    #[test]
    fn test_indices_are_assigned_in_order() {
        let obs = HandObservation::from_landmarks(&normalized(21), Resolution::new(320, 100))
            .unwrap();
        for (i, lm) in obs.landmarks().iter().enumerate() {
            assert_eq!(lm.index, i);
            assert_eq!(lm.x, i as i32 * 10);
        }
    }

    #[test]
    fn test_wrong_landmark_count() {
        let res = Resolution::VGA;
        assert_eq!(
            HandObservation::from_landmarks(&normalized(20), res),
            Err(LandmarkError::Count(20))
        );
        assert_eq!(
            HandObservation::from_landmarks(&normalized(22), res),
            Err(LandmarkError::Count(22))
        );
        assert_eq!(
            HandObservation::from_landmarks(&normalized(0), res),
            Err(LandmarkError::Count(0))
        );
    }

    #[test]
    fn test_landmarks_far_outside_frame() {
        let res = Resolution::VGA;
        for bad in [[1e10, 0.5], [0.5, -1.5], [f32::NAN, 0.5], [0.5, f32::INFINITY]] {
            let mut points = vec![[0.5, 0.5]; NUM_LANDMARKS];
            points[8] = bad;
            let hand = HandLandmarks::new(Handedness::Right, 1.0, points);
            match HandObservation::from_landmarks(&hand, res) {
                Err(LandmarkError::OutOfRange { index: 8, .. }) => {}
                other => panic!("{:?} was not rejected: {:?}", bad, other),
            }
        }

        // slightly outside of the frame is fine
        let mut points = vec![[0.5, 0.5]; NUM_LANDMARKS];
        points[0] = [-0.25, 1.5];
        let hand = HandLandmarks::new(Handedness::Right, 1.0, points);
        let obs = HandObservation::from_landmarks(&hand, res).unwrap();
        assert_eq!(obs[0].pos(), (-160, 720));
    }

    #[test]
    fn test_tip_indices() {
        let tips: Vec<usize> = LandmarkIdx::TIPS.iter().map(|&t| t as usize).collect();
        assert_eq!(tips, [4, 8, 12, 16, 20]);
    }

    #[test]
    fn test_draw_does_not_panic_at_edges() {
        let obs = HandObservation::from_pixels(
            Handedness::Right,
            (0..NUM_LANDMARKS as i32).map(|i| (i * 40 - 100, 479)),
        )
        .unwrap();
        let mut image = Image::from_resolution(Resolution::VGA);
        obs.draw(&mut image);
        assert_eq!(image.get(60, 479), Color::MAGENTA);
    }
}
