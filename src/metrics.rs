//! Screen metrics

/// Size of the physical screen in pixels
pub trait DisplayMetrics {
    fn width_pixels(&self) -> u32;
    fn height_pixels(&self) -> u32;

    /// The shorter of the two screen dimensions
    fn shorter_side(&self) -> u32 {
        self.width_pixels().min(self.height_pixels())
    }
}

/// Fixed screen dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenMetrics {
    pub width: u32,
    pub height: u32,
}

impl ScreenMetrics {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl DisplayMetrics for ScreenMetrics {
    fn width_pixels(&self) -> u32 {
        self.width
    }

    fn height_pixels(&self) -> u32 {
        self.height
    }
}
