use std::convert::Infallible;

use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyle},
    prelude::*,
    primitives::{Circle, ContainsPoint, Line, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::image::{Color, Image, Rect};

/// Outline of a [`Rect`], drawn when dropped. Created by [`draw_rect`].
pub struct DrawRect<'a> {
    image: &'a mut Image,
    rect: Rect,
    color: Color,
    stroke_width: u32,
}

impl DrawRect<'_> {
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the outline thickness in pixels (default: 1).
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        self.stroke_width = width;
        self
    }
}

impl Drop for DrawRect<'_> {
    fn drop(&mut self) {
        let style = PrimitiveStyle::with_stroke(self.color, self.stroke_width);
        render(self.image, self.rect.rect.into_styled(style));
    }
}

/// Filled circle, drawn when dropped. Created by [`draw_circle`].
pub struct DrawCircle<'a> {
    image: &'a mut Image,
    center: Point,
    radius: u32,
    color: Color,
}

impl DrawCircle<'_> {
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }
}

impl Drop for DrawCircle<'_> {
    fn drop(&mut self) {
        let circle = Circle::with_center(self.center, self.radius * 2 + 1);
        render(
            self.image,
            circle.into_styled(PrimitiveStyle::with_fill(self.color)),
        );
    }
}

/// Straight line between two points, drawn when dropped. Created by [`draw_line`].
pub struct DrawLine<'a> {
    image: &'a mut Image,
    line: Line,
    color: Color,
    stroke_width: u32,
}

impl DrawLine<'_> {
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the line thickness in pixels (default: 1).
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        self.stroke_width = width;
        self
    }
}

impl Drop for DrawLine<'_> {
    fn drop(&mut self) {
        let style = PrimitiveStyle::with_stroke(self.color, self.stroke_width);
        render(self.image, self.line.into_styled(style));
    }
}

/// Text label, drawn when dropped. Created by [`draw_text`].
pub struct DrawText<'a> {
    image: &'a mut Image,
    pos: Point,
    text: &'a str,
    color: Color,
    alignment: Alignment,
    baseline: Baseline,
}

impl DrawText<'_> {
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Anchors the text at the left end of its baseline, like a text cursor.
    pub fn align_baseline_left(&mut self) -> &mut Self {
        self.alignment = Alignment::Left;
        self.baseline = Baseline::Alphabetic;
        self
    }
}

impl Drop for DrawText<'_> {
    fn drop(&mut self) {
        let style = TextStyleBuilder::new()
            .alignment(self.alignment)
            .baseline(self.baseline)
            .build();
        let text = Text::with_text_style(
            self.text,
            self.pos,
            MonoTextStyle::new(&FONT_10X20, self.color),
            style,
        );
        render(self.image, text);
    }
}

/// Draws the outline of `rect` in red, unless customized.
pub fn draw_rect(image: &mut Image, rect: Rect) -> DrawRect<'_> {
    DrawRect {
        image,
        rect,
        color: Color::RED,
        stroke_width: 1,
    }
}

/// Draws a filled magenta circle of the given radius centered at `(x, y)`.
pub fn draw_circle(image: &mut Image, x: i32, y: i32, radius: u32) -> DrawCircle<'_> {
    DrawCircle {
        image,
        center: Point::new(x, y),
        radius,
        color: Color::MAGENTA,
    }
}

/// Draws a blue line from `start` to `end`, both inclusive.
pub fn draw_line(image: &mut Image, start: (i32, i32), end: (i32, i32)) -> DrawLine<'_> {
    DrawLine {
        image,
        line: Line::new(Point::new(start.0, start.1), Point::new(end.0, end.1)),
        color: Color::BLUE,
        stroke_width: 1,
    }
}

/// Draws `text` centered on `(x, y)`.
pub fn draw_text<'a>(image: &'a mut Image, x: i32, y: i32, text: &'a str) -> DrawText<'a> {
    DrawText {
        image,
        pos: Point::new(x, y),
        text,
        color: Color::RED,
        alignment: Alignment::Center,
        baseline: Baseline::Middle,
    }
}

fn render<D: Drawable<Color = Color>>(image: &mut Image, drawable: D) {
    match drawable.draw(&mut Clipped(image)) {
        Ok(_) => {}
        Err(infallible) => match infallible {},
    }
}

/// [`DrawTarget`] that discards pixels outside of the image.
struct Clipped<'a>(&'a mut Image);

impl Dimensions for Clipped<'_> {
    fn bounding_box(&self) -> Rectangle {
        self.0.rect().rect
    }
}

impl DrawTarget for Clipped<'_> {
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Infallible>
    where
        I: IntoIterator<Item = Pixel<Color>>,
    {
        let bounds = self.0.rect();
        for Pixel(Point { x, y }, color) in pixels {
            if bounds.rect.contains(Point::new(x, y)) {
                self.0.set(x as u32, y as u32, color);
            }
        }
        Ok(())
    }
}
