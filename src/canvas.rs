//! Drawing surface with save/restore and rotation
//!
//! `embedded-graphics` draw targets only know about pixels, so rotated
//! bitmaps are rasterised here: every target pixel covered by the rotated
//! bounds is mapped back into the bounds and sampled from the drawable.

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Dimensions, Point},
    pixelcolor::Rgb565,
    primitives::Rectangle,
    Pixel,
};
use heapless::Vec;
use libm::{ceilf, cosf, fabsf, floorf, sinf};

use crate::{
    error::Error,
    image::{ScaledDrawable, TRANSPARENT},
};

/// Maximum number of nested `save` calls
pub const SAVE_DEPTH: usize = 4;

/// A 2D surface the clock face draws itself onto
pub trait Canvas {
    /// Push the current transform
    fn save(&mut self) -> Result<(), Error>;

    /// Pop the transform pushed by the matching `save`
    fn restore(&mut self) -> Result<(), Error>;

    /// Rotate following drawing clockwise by `degrees` about `pivot`
    fn rotate(&mut self, degrees: f32, pivot: (f32, f32));

    /// Draw `image` stretched to fill `bounds` under the current transform
    fn draw_image(&mut self, image: &ScaledDrawable<'_>, bounds: Rectangle) -> Result<(), Error>;
}

/// Affine transform `x' = a*x + b*y + c`, `y' = d*x + e*y + f`
#[derive(Clone, Copy, Debug, PartialEq)]
struct Affine {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Affine {
    const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
        e: 1.0,
        f: 0.0,
    };

    /// Rotation about `(px, py)`. With y pointing down, positive angles turn
    /// clockwise on screen.
    fn rotation(degrees: f32, (px, py): (f32, f32)) -> Self {
        let radians = degrees.to_radians();
        let (sin, cos) = (sinf(radians), cosf(radians));
        Affine {
            a: cos,
            b: -sin,
            c: px - cos * px + sin * py,
            d: sin,
            e: cos,
            f: py - sin * px - cos * py,
        }
    }

    /// `self * other`: `other` is applied first
    fn concat(&self, other: &Affine) -> Self {
        Affine {
            a: self.a * other.a + self.b * other.d,
            b: self.a * other.b + self.b * other.e,
            c: self.a * other.c + self.b * other.f + self.c,
            d: self.d * other.a + self.e * other.d,
            e: self.d * other.b + self.e * other.e,
            f: self.d * other.c + self.e * other.f + self.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.b * y + self.c,
            self.d * x + self.e * y + self.f,
        )
    }

    fn invert(&self) -> Option<Self> {
        let det = self.a * self.e - self.b * self.d;
        if fabsf(det) < f32::EPSILON {
            return None;
        }
        Some(Affine {
            a: self.e / det,
            b: -self.b / det,
            c: (self.b * self.f - self.e * self.c) / det,
            d: -self.d / det,
            e: self.a / det,
            f: (self.d * self.c - self.a * self.f) / det,
        })
    }
}

/// Canvas over an RGB565 draw target
pub struct TransformCanvas<D> {
    target: D,
    matrix: Affine,
    saved: Vec<Affine, SAVE_DEPTH>,
}

impl<D> TransformCanvas<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: D) -> Self {
        Self {
            target,
            matrix: Affine::IDENTITY,
            saved: Vec::new(),
        }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D> Canvas for TransformCanvas<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn save(&mut self) -> Result<(), Error> {
        self.saved
            .push(self.matrix)
            .map_err(|_| Error::SaveStackOverflow)
    }

    fn restore(&mut self) -> Result<(), Error> {
        self.matrix = self.saved.pop().ok_or(Error::RestoreUnderflow)?;
        Ok(())
    }

    fn rotate(&mut self, degrees: f32, pivot: (f32, f32)) {
        self.matrix = self.matrix.concat(&Affine::rotation(degrees, pivot));
    }

    fn draw_image(&mut self, image: &ScaledDrawable<'_>, bounds: Rectangle) -> Result<(), Error> {
        if bounds.size.width == 0
            || bounds.size.height == 0
            || image.width() == 0
            || image.height() == 0
        {
            return Ok(());
        }
        // Degenerate transforms cover no pixels
        let Some(inverse) = self.matrix.invert() else {
            return Ok(());
        };

        let left = bounds.top_left.x as f32;
        let top = bounds.top_left.y as f32;
        let width = bounds.size.width as f32;
        let height = bounds.size.height as f32;

        // Pixel area covered by the transformed bounds
        let corners = [
            self.matrix.apply(left, top),
            self.matrix.apply(left + width, top),
            self.matrix.apply(left, top + height),
            self.matrix.apply(left + width, top + height),
        ];
        let (mut min_x, mut min_y) = corners[0];
        let (mut max_x, mut max_y) = corners[0];
        for (x, y) in corners {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        let clip = self.target.bounding_box();
        let x0 = (floorf(min_x) as i32).max(clip.top_left.x);
        let y0 = (floorf(min_y) as i32).max(clip.top_left.y);
        let x1 = (ceilf(max_x) as i32).min(clip.top_left.x + clip.size.width as i32);
        let y1 = (ceilf(max_y) as i32).min(clip.top_left.y + clip.size.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        let (image_w, image_h) = (image.width(), image.height());
        let pixels = (y0..y1).flat_map(move |y| {
            (x0..x1).filter_map(move |x| {
                let (lx, ly) = inverse.apply(x as f32 + 0.5, y as f32 + 0.5);
                let u = (lx - left) / width;
                let v = (ly - top) / height;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    return None;
                }
                let ix = ((u * image_w as f32) as u32).min(image_w - 1);
                let iy = ((v * image_h as f32) as u32).min(image_h - 1);
                let color = image.pixel(ix, iy)?;
                (color != TRANSPARENT).then_some(Pixel(Point::new(x, y), color))
            })
        });

        self.target.draw_iter(pixels).map_err(|_| {
            warn!("draw target rejected pixels");
            Error::Target
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{encode, scaled_drawable, ResourceId, ResourceTable};
    use embedded_graphics::{
        geometry::Size,
        mock_display::MockDisplay,
        pixelcolor::RgbColor,
    };
    use pretty_assertions::assert_eq;

    fn canvas() -> TransformCanvas<MockDisplay<Rgb565>> {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        TransformCanvas::new(display)
    }

    fn checker() -> std::vec::Vec<u8> {
        encode(
            2,
            2,
            &[Rgb565::RED, Rgb565::GREEN, Rgb565::BLUE, Rgb565::WHITE],
        )
    }

    fn at(canvas: &TransformCanvas<MockDisplay<Rgb565>>, x: i32, y: i32) -> Option<Rgb565> {
        canvas.target().get_pixel(Point::new(x, y))
    }

    const SQUARE: Rectangle = Rectangle::new(Point::zero(), Size::new(4, 4));

    #[test]
    fn draws_stretched_without_transform() {
        let bytes = checker();
        let entries: [&[u8]; 1] = [&bytes];
        let table = ResourceTable::new(&entries);
        let image = scaled_drawable(&table, ResourceId(0), 2, 2).unwrap();

        let mut canvas = canvas();
        canvas.draw_image(&image, SQUARE).unwrap();

        assert_eq!(at(&canvas, 0, 0), Some(Rgb565::RED));
        assert_eq!(at(&canvas, 3, 0), Some(Rgb565::GREEN));
        assert_eq!(at(&canvas, 0, 3), Some(Rgb565::BLUE));
        assert_eq!(at(&canvas, 3, 3), Some(Rgb565::WHITE));
        assert_eq!(at(&canvas, 4, 4), None);
    }

    #[test]
    fn rotates_clockwise_about_pivot() {
        let bytes = checker();
        let entries: [&[u8]; 1] = [&bytes];
        let table = ResourceTable::new(&entries);
        let image = scaled_drawable(&table, ResourceId(0), 2, 2).unwrap();

        let mut canvas = canvas();
        canvas.rotate(90.0, (2.0, 2.0));
        canvas.draw_image(&image, SQUARE).unwrap();

        // top-left quadrant swings over to the top-right
        assert_eq!(at(&canvas, 3, 0), Some(Rgb565::RED));
        assert_eq!(at(&canvas, 3, 3), Some(Rgb565::GREEN));
        assert_eq!(at(&canvas, 0, 3), Some(Rgb565::WHITE));
        assert_eq!(at(&canvas, 0, 0), Some(Rgb565::BLUE));
    }

    #[test]
    fn restore_discards_rotation() {
        let bytes = checker();
        let entries: [&[u8]; 1] = [&bytes];
        let table = ResourceTable::new(&entries);
        let image = scaled_drawable(&table, ResourceId(0), 2, 2).unwrap();

        let mut canvas = canvas();
        canvas.save().unwrap();
        canvas.rotate(180.0, (2.0, 2.0));
        canvas.restore().unwrap();
        canvas.draw_image(&image, SQUARE).unwrap();

        assert_eq!(at(&canvas, 0, 0), Some(Rgb565::RED));
        assert_eq!(at(&canvas, 3, 3), Some(Rgb565::WHITE));
    }

    #[test]
    fn save_stack_is_bounded() {
        let mut canvas = canvas();
        assert_eq!(canvas.restore(), Err(Error::RestoreUnderflow));

        for _ in 0..SAVE_DEPTH {
            canvas.save().unwrap();
        }
        assert_eq!(canvas.save(), Err(Error::SaveStackOverflow));
    }

    #[test]
    fn skips_transparent_pixels_and_clips() {
        let bytes = encode(2, 1, &[TRANSPARENT, Rgb565::YELLOW]);
        let entries: [&[u8]; 1] = [&bytes];
        let table = ResourceTable::new(&entries);
        let image = scaled_drawable(&table, ResourceId(0), 2, 1).unwrap();

        let mut canvas = canvas();
        canvas
            .draw_image(&image, Rectangle::new(Point::new(-2, 0), Size::new(4, 1)))
            .unwrap();
        assert_eq!(at(&canvas, 0, 0), Some(Rgb565::YELLOW));
        assert_eq!(at(&canvas, 1, 0), Some(Rgb565::YELLOW));
        assert_eq!(at(&canvas, 2, 0), None);

        canvas.target_mut().clear(Rgb565::BLACK).unwrap();
        canvas
            .draw_image(&image, Rectangle::new(Point::zero(), Size::new(4, 1)))
            .unwrap();
        // left half was transparent and keeps the background
        assert_eq!(at(&canvas, 1, 0), Some(Rgb565::BLACK));
        assert_eq!(at(&canvas, 2, 0), Some(Rgb565::YELLOW));
    }

    #[test]
    fn affine_inverse_round_trips() {
        let rotation = Affine::rotation(37.0, (10.0, -4.0));
        let inverse = rotation.invert().unwrap();
        let (x, y) = rotation.apply(3.0, 5.0);
        let (bx, by) = inverse.apply(x, y);

        assert!(fabsf(bx - 3.0) < 1e-4);
        assert!(fabsf(by - 5.0) < 1e-4);
        assert_eq!(Affine::IDENTITY.concat(&rotation), rotation);
    }
}
