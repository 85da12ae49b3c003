//! Analog clock face for the PineTime
//!
//! The renderer core is hardware independent: it resolves a square size from
//! layout constraints, scales the dial and hand bitmaps once, and draws them
//! rotated onto any `embedded-graphics` draw target. A cancellable 1 Hz tick
//! loop keeps the displayed time current.
#![cfg_attr(not(test), no_std)]

// Must stay first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

pub mod canvas;
pub mod clock;
pub mod error;
pub mod image;
pub mod layout;
pub mod measure;
pub mod metrics;
pub mod ticker;
pub mod time;
pub mod view;

pub use canvas::{Canvas, TransformCanvas};
pub use clock::{ClockState, Hand};
pub use error::{DecodeError, Error};
pub use image::{scaled_drawable, RawImage, ResourceId, ResourceTable, Resources, ScaledDrawable};
pub use measure::{measure, MeasureMode, MeasureSpec, MeasuredSize};
pub use metrics::{DisplayMetrics, ScreenMetrics};
pub use ticker::{ClockLink, OneSecond, Pacer};
pub use time::{TimeManager, TimeReference, TimeSource};
pub use view::{ClockView, FaceResources};
