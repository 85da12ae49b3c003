//! Measurement pass
//!
//! A measure spec packs a mode into the two high bits of a `u32` and a size
//! into the remaining 30 bits, the same layout the host toolkit hands to its
//! views. The face always resolves to the largest square the constraints
//! allow, falling back to the shorter screen side.

use embedded_graphics::geometry::Size;

use crate::{error::Error, metrics::DisplayMetrics};

const MODE_SHIFT: u32 = 30;
const MODE_MASK: u32 = 0x3 << MODE_SHIFT;
const SIZE_MASK: u32 = !MODE_MASK;

/// Size reported back to the layout after measuring
pub type MeasuredSize = Size;

/// How the parent constrains one dimension
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasureMode {
    /// No constraint, pick whatever size fits
    Unspecified = 0,
    /// The parent has fixed the size
    Exactly = 1,
    /// The size may not exceed the given value
    AtMost = 2,
}

/// Packed mode and size for one dimension
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasureSpec(u32);

impl MeasureSpec {
    pub const fn new(size: u32, mode: MeasureMode) -> Self {
        Self(((mode as u32) << MODE_SHIFT) | (size & SIZE_MASK))
    }

    pub const fn unspecified() -> Self {
        Self::new(0, MeasureMode::Unspecified)
    }

    pub const fn exactly(size: u32) -> Self {
        Self::new(size, MeasureMode::Exactly)
    }

    pub const fn at_most(size: u32) -> Self {
        Self::new(size, MeasureMode::AtMost)
    }

    /// Wrap a raw spec as received from the layout
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn size(self) -> u32 {
        self.0 & SIZE_MASK
    }

    pub fn mode(self) -> Result<MeasureMode, Error> {
        match (self.0 & MODE_MASK) >> MODE_SHIFT {
            0 => Ok(MeasureMode::Unspecified),
            1 => Ok(MeasureMode::Exactly),
            2 => Ok(MeasureMode::AtMost),
            _ => Err(Error::UnsupportedMeasureMode(self.0 & MODE_MASK)),
        }
    }

    /// Resolve this dimension against the preferred (screen based) size
    fn resolve(self, preferred: u32) -> Result<u32, Error> {
        Ok(match self.mode()? {
            MeasureMode::Unspecified => preferred,
            MeasureMode::Exactly => self.size(),
            MeasureMode::AtMost => preferred.min(self.size()),
        })
    }
}

/// Resolve the face size for a measurement request.
///
/// Width and height are swapped in the reported size, which is how the face
/// has always reported itself. For the square requests it normally receives
/// this makes no difference.
pub fn measure<M: DisplayMetrics + ?Sized>(
    width_spec: MeasureSpec,
    height_spec: MeasureSpec,
    metrics: &M,
) -> Result<MeasuredSize, Error> {
    let preferred = metrics.shorter_side();
    let width = width_spec.resolve(preferred)?;
    let height = height_spec.resolve(preferred)?;
    trace!("measured {}x{} (preferred {})", width, height, preferred);

    Ok(Size::new(height, width))
}
