use std::fmt;

use embedded_graphics::prelude::*;
use itertools::{Itertools, MinMaxResult};

/// An axis-aligned rectangle.
///
/// This rectangle type uses (signed) integer coordinates and is meant to be used with the
/// [`crate::image`] module. Both corners are *inclusive*: a rectangle spanning `(0, 0)` to `(2, 2)`
/// is 3 pixels wide.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub(crate) rect: embedded_graphics::primitives::Rectangle,
}

impl Rect {
    /// Creates a rectangle extending downwards and right from a point.
    #[inline]
    pub fn from_top_left(top_left_x: i32, top_left_y: i32, width: u32, height: u32) -> Self {
        Self {
            rect: embedded_graphics::primitives::Rectangle {
                top_left: Point {
                    x: top_left_x,
                    y: top_left_y,
                },
                size: Size { width, height },
            },
        }
    }

    /// Creates a rectangle from two opposing corner points.
    ///
    /// The corners may be passed in any order.
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        Self::span_inner(a.0.min(b.0), a.1.min(b.1), a.0.max(b.0), a.1.max(b.1))
    }

    /// Computes the (axis-aligned) bounding rectangle that encompasses `points`.
    ///
    /// Returns `None` if `points` is an empty iterator.
    pub fn bounding<I: IntoIterator<Item = (i32, i32)>>(points: I) -> Option<Self> {
        let (xs, ys): (Vec<i32>, Vec<i32>) = points.into_iter().unzip();
        let (x_min, x_max) = match xs.into_iter().minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(x) => (x, x),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        let (y_min, y_max) = match ys.into_iter().minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(y) => (y, y),
            MinMaxResult::MinMax(min, max) => (min, max),
        };

        Some(Self::span_inner(x_min, y_min, x_max, y_max))
    }

    fn span_inner(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        debug_assert!(x_min <= x_max, "x_min={}, x_max={}", x_min, x_max);
        debug_assert!(y_min <= y_max, "y_min={}, y_max={}", y_min, y_max);
        Self {
            rect: embedded_graphics::primitives::Rectangle {
                top_left: Point { x: x_min, y: y_min },
                size: Size {
                    width: x_max.abs_diff(x_min) + 1,
                    height: y_max.abs_diff(y_min) + 1,
                },
            },
        }
    }

    /// Grows every side of this rectangle outwards by `margin` pixels.
    #[must_use]
    pub fn grow(&self, margin: u32) -> Self {
        let m = margin as i32;
        Self::from_top_left(
            self.x() - m,
            self.y() - m,
            self.width() + 2 * margin,
            self.height() + 2 * margin,
        )
    }

    /// Returns the X coordinate of the left side of the rectangle.
    #[inline]
    pub fn x(&self) -> i32 {
        self.rect.top_left.x
    }

    /// Returns the Y coordinate of the top side of the rectangle.
    #[inline]
    pub fn y(&self) -> i32 {
        self.rect.top_left.y
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.rect.size.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.rect.size.height
    }

    /// Returns the inclusive bottom right corner.
    pub fn bottom_right(&self) -> (i32, i32) {
        (
            self.x() + self.width() as i32 - 1,
            self.y() + self.height() as i32 - 1,
        )
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = (self.x(), self.y());
        let (bx, by) = self.bottom_right();
        let (w, h) = (self.width(), self.height());
        write!(f, "Rect @ ({x},{y})-({bx},{by})/{w}x{h}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding() {
        assert_eq!(
            Rect::bounding([(0, 0), (1, 1), (-1, -1)]).unwrap(),
            Rect::from_corners((-1, -1), (1, 1)),
        );
        assert_eq!(
            Rect::bounding([(1, 2), (2, 1)]).unwrap(),
            Rect::from_corners((1, 1), (2, 2)),
        );
        assert_eq!(
            Rect::bounding([(5, 7)]).unwrap(),
            Rect::from_top_left(5, 7, 1, 1)
        );
        assert_eq!(Rect::bounding([]), None);
    }

    #[test]
    fn test_from_corners_any_order() {
        assert_eq!(
            Rect::from_corners((3, 4), (1, 2)),
            Rect::from_corners((1, 2), (3, 4)),
        );
        assert_eq!(Rect::from_corners((1, 2), (3, 4)).bottom_right(), (3, 4));
    }

    #[test]
    fn test_grow() {
        let rect = Rect::from_corners((10, 10), (20, 30)).grow(5);
        assert_eq!(rect, Rect::from_corners((5, 5), (25, 35)));
        assert_eq!((rect.width(), rect.height()), (21, 31));
    }
}
