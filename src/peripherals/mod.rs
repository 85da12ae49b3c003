//! PineTime peripherals used by the clock face

pub mod backlight;
pub mod display;
