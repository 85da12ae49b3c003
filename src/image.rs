//! Bitmap resources and nearest-neighbour scaling
//!
//! Resources are stored as a 4 byte header (big-endian `u16` width, then
//! height) followed by big-endian RGB565 pixels, row by row.

use embedded_graphics::{
    geometry::{OriginDimensions, Size},
    pixelcolor::{raw::RawU16, Rgb565},
};

use crate::error::{DecodeError, Error};

const HEADER_LEN: usize = 4;
const BYTES_PER_PIXEL: usize = 2;

/// Pixels of this colour are left unpainted when a drawable is drawn
pub const TRANSPARENT: Rgb565 = Rgb565::new(31, 0, 31);

/// Opaque handle of a bitmap resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResourceId(pub u16);

/// Source of encoded bitmap resources
pub trait Resources {
    /// Encoded bytes of a resource, `None` if the id is unknown
    fn bytes(&self, id: ResourceId) -> Option<&[u8]>;
}

/// Resources kept in a static table, the id is the table index
#[derive(Clone, Copy, Debug)]
pub struct ResourceTable<'a> {
    entries: &'a [&'a [u8]],
}

impl<'a> ResourceTable<'a> {
    pub const fn new(entries: &'a [&'a [u8]]) -> Self {
        Self { entries }
    }
}

impl Resources for ResourceTable<'_> {
    fn bytes(&self, id: ResourceId) -> Option<&[u8]> {
        self.entries.get(id.0 as usize).copied()
    }
}

/// A decoded bitmap borrowing its pixel data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawImage<'a> {
    width: u32,
    height: u32,
    pixels: &'a [u8],
}

impl<'a> RawImage<'a> {
    pub fn decode(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        if bytes.len() < HEADER_LEN {
            return Err(DecodeError::MissingHeader);
        }
        let width = u16::from_be_bytes([bytes[0], bytes[1]]) as u32;
        let height = u16::from_be_bytes([bytes[2], bytes[3]]) as u32;
        if width == 0 || height == 0 {
            return Err(DecodeError::ZeroDimension);
        }

        let pixels = &bytes[HEADER_LEN..];
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(DecodeError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let raw = u16::from_be_bytes([self.pixels[offset], self.pixels[offset + 1]]);
        Some(Rgb565::from(RawU16::new(raw)))
    }
}

impl OriginDimensions for RawImage<'_> {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A bitmap resized to a fixed pixel size
///
/// Scaling is done on read: every pixel maps back to the nearest source
/// pixel, so no scaled copy needs to be held in RAM.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaledDrawable<'a> {
    source: RawImage<'a>,
    size: Size,
}

impl<'a> ScaledDrawable<'a> {
    /// Width of the drawable in pixels
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height of the drawable in pixels
    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn source(&self) -> &RawImage<'a> {
        &self.source
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let sx = (x as u64 * self.source.width as u64 / self.size.width as u64) as u32;
        let sy = (y as u64 * self.source.height as u64 / self.size.height as u64) as u32;
        self.source.pixel(sx, sy)
    }
}

impl OriginDimensions for ScaledDrawable<'_> {
    fn size(&self) -> Size {
        self.size
    }
}

/// Decode resource `id` and scale it to exactly `width` x `height` pixels.
///
/// The resource is decoded again on every call.
pub fn scaled_drawable<R: Resources + ?Sized>(
    resources: &R,
    id: ResourceId,
    width: i32,
    height: i32,
) -> Result<ScaledDrawable<'_>, Error> {
    if width <= 0 || height <= 0 {
        return Err(Error::InvalidTargetSize { width, height });
    }
    let bytes = resources.bytes(id).ok_or(Error::MissingResource(id.0))?;
    let source = RawImage::decode(bytes)?;
    debug!(
        "scaled resource {} from {}x{} to {}x{}",
        id.0, source.width, source.height, width, height
    );

    Ok(ScaledDrawable {
        source,
        size: Size::new(width as u32, height as u32),
    })
}

/// Encode pixels in the resource format
#[cfg(test)]
pub(crate) fn encode(width: u16, height: u16, pixels: &[Rgb565]) -> Vec<u8> {
    use embedded_graphics::pixelcolor::IntoStorage;

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    for pixel in pixels {
        bytes.extend_from_slice(&pixel.into_storage().to_be_bytes());
    }
    bytes
}
