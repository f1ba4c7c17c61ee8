//! Geometric gesture features computed from a single [`HandObservation`].

use std::{fmt, ops::Index};

use crate::{
    hand::landmark::{HandObservation, Landmark, LandmarkIdx},
    image::{self, Color, Image, Rect},
};

/// Margin added around a [`BoundingBox`] when it is drawn.
pub const BBOX_PADDING: u32 = 20;

/// Axis-aligned box tightly enclosing a set of landmarks. Both corners are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl BoundingBox {
    /// Returns the box as a [`Rect`], without padding.
    pub fn rect(&self) -> Rect {
        Rect::from_corners((self.xmin, self.ymin), (self.xmax, self.ymax))
    }

    /// Draws the box, padded by [`BBOX_PADDING`] on every side.
    pub fn draw(&self, target: &mut Image) {
        image::draw_rect(target, self.rect().grow(BBOX_PADDING))
            .color(Color::GREEN)
            .stroke_width(2);
    }
}

/// Computes the bounding box of `landmarks`.
///
/// Returns `None` if `landmarks` is empty.
pub fn bounding_box(landmarks: &[Landmark]) -> Option<BoundingBox> {
    let rect = Rect::bounding(landmarks.iter().map(Landmark::pos))?;
    let (xmax, ymax) = rect.bottom_right();
    Some(BoundingBox {
        xmin: rect.x(),
        ymin: rect.y(),
        xmax,
        ymax,
    })
}

/// The fingers of a hand, in the order used by [`FingerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Returns the landmark at the tip of this finger.
    pub fn tip(self) -> LandmarkIdx {
        LandmarkIdx::TIPS[self as usize]
    }
}

/// Which fingers are raised, ordered thumb, index, middle, ring, pinky.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerState([bool; 5]);

impl FingerState {
    pub fn new(up: [bool; 5]) -> Self {
        Self(up)
    }

    #[inline]
    pub fn is_up(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    /// Returns the number of raised fingers.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|up| **up).count()
    }

    #[inline]
    pub fn as_array(&self) -> [bool; 5] {
        self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Index<usize> for FingerState {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        &self.0[index]
    }
}

impl Index<Finger> for FingerState {
    type Output = bool;

    fn index(&self, finger: Finger) -> &bool {
        &self.0[finger as usize]
    }
}

/// Formats as a string of `1`s and `0`s, eg. `01100` for index and middle finger.
impl fmt::Debug for FingerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for up in self.0 {
            f.write_str(if up { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Determines which fingers of `hand` are raised.
///
/// A finger counts as raised if its tip is strictly above (lower Y) the landmark two joints below
/// the tip. The thumb instead compares X coordinates of the tip and the joint right below it, and
/// counts as raised if the tip is further left.
///
/// The thumb test only works for a right hand in a mirrored (selfie view) image. The hand's
/// reported [`Handedness`] is not taken into account.
///
/// [`Handedness`]: crate::hand::landmark::Handedness
pub fn fingers_up(hand: &HandObservation) -> FingerState {
    let mut up = [false; 5];
    for (finger, up) in Finger::ALL.into_iter().zip(&mut up) {
        let tip = finger.tip() as usize;
        *up = match finger {
            Finger::Thumb => hand[tip].x < hand[tip - 1].x,
            _ => hand[tip].y < hand[tip - 2].y,
        };
    }
    FingerState(up)
}

/// Distance between two landmarks, as computed by [`distance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    /// Euclidean distance between `start` and `end`, in pixels.
    pub length: f32,
    pub start: (i32, i32),
    pub end: (i32, i32),
    /// Integer midpoint of `start` and `end`, rounded towards negative infinity.
    pub midpoint: (i32, i32),
}

impl Distance {
    /// Draws a line between both landmarks, and circles on the landmarks and the midpoint.
    pub fn draw(&self, target: &mut Image) {
        self.draw_with(target, 15, 3);
    }

    /// Like [`Distance::draw`], but with custom circle radius and line thickness.
    pub fn draw_with(&self, target: &mut Image, radius: u32, thickness: u32) {
        image::draw_line(target, self.start, self.end)
            .color(Color::MAGENTA)
            .stroke_width(thickness);
        image::draw_circle(target, self.start.0, self.start.1, radius);
        image::draw_circle(target, self.end.0, self.end.1, radius);
        image::draw_circle(target, self.midpoint.0, self.midpoint.1, radius).color(Color::RED);
    }
}

/// Computes the distance between landmarks `a` and `b` of `hand`.
pub fn distance(hand: &HandObservation, a: LandmarkIdx, b: LandmarkIdx) -> Distance {
    let (x1, y1) = hand[a].pos();
    let (x2, y2) = hand[b].pos();
    let (dx, dy) = ((x2 - x1) as f32, (y2 - y1) as f32);
    Distance {
        length: dx.hypot(dy),
        start: (x1, y1),
        end: (x2, y2),
        midpoint: ((x1 + x2).div_euclid(2), (y1 + y2).div_euclid(2)),
    }
}

/// Distance between the index and middle fingertips, the usual pinch/click gesture.
pub fn pinch(hand: &HandObservation) -> Distance {
    distance(hand, LandmarkIdx::IndexFingerTip, LandmarkIdx::MiddleFingerTip)
}
