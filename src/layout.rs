//! Hand placement on the dial

use embedded_graphics::{
    geometry::{Point, Size},
    primitives::Rectangle,
};

use crate::clock::Hand;

/// Visual correction applied to hand widths and offsets, as a fraction of the
/// face size
pub const ERROR: f64 = 0.03;
/// Gap between the dial rim and the hand tips, as a fraction of the face size
pub const DIAL_GAP_PERCENT: f64 = 0.1;

/// Pixel size every hand bitmap is scaled to for a face of `view` size
pub fn hand_size(view: Size) -> (i32, i32) {
    (
        (view.width as f64 * ERROR) as i32,
        (view.height as f64 / (2.0 + DIAL_GAP_PERCENT)) as i32,
    )
}

/// Point the hands rotate about
pub fn pivot(view: Size) -> (f32, f32) {
    (view.width as f32 / 2.0, view.height as f32 / 2.0)
}

/// Bounds a hand is stretched into before rotation.
///
/// `intrinsic` is the size of the scaled hand bitmap. Every hand is
/// horizontally centred and ends just below the centre of the face; the top
/// edge depends on the hand.
pub fn hand_bounds(hand: Hand, view: Size, intrinsic: Size) -> Rectangle {
    let (w, h) = (view.width as i32, view.height as i32);
    let (iw, ih) = (intrinsic.width as i32, intrinsic.height as i32);
    let (wf, hf) = (w as f64, h as f64);

    let left = ((w / 2 - iw / 2) as f64 - wf * ERROR / 2.0) as i32;
    let right = ((w / 2 + iw / 2) as f64 + wf * ERROR / 2.0) as i32;
    let bottom = ((h / 2) as f64 + hf * ERROR) as i32;
    let top = match hand {
        Hand::Hour => (hf * DIAL_GAP_PERCENT * 2.5 + hf * ERROR) as i32,
        Hand::Minute => (hf * DIAL_GAP_PERCENT + hf * ERROR) as i32,
        Hand::Second => ((h / 2 - ih) as f64 + hf * ERROR) as i32,
    };

    Rectangle::new(
        Point::new(left, top),
        Size::new((right - left).max(0) as u32, (bottom - top).max(0) as u32),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FACE: Size = Size::new(240, 240);

    #[test]
    fn hands_are_scaled_from_face_size() {
        assert_eq!(hand_size(FACE), (7, 114));
        assert_eq!(hand_size(Size::new(20, 20)), (0, 9));
    }

    #[test]
    fn hand_bounds_on_240_face() {
        let hand = Size::new(7, 114);

        assert_eq!(
            hand_bounds(Hand::Hour, FACE, hand),
            Rectangle::new(Point::new(113, 67), Size::new(13, 60))
        );
        assert_eq!(
            hand_bounds(Hand::Minute, FACE, hand),
            Rectangle::new(Point::new(113, 31), Size::new(13, 96))
        );
        assert_eq!(
            hand_bounds(Hand::Second, FACE, hand),
            Rectangle::new(Point::new(113, 13), Size::new(13, 114))
        );
    }

    #[test]
    fn hands_are_ordered_by_length() {
        let hand = Size::new(7, 114);
        let hour = hand_bounds(Hand::Hour, FACE, hand);
        let minute = hand_bounds(Hand::Minute, FACE, hand);
        let second = hand_bounds(Hand::Second, FACE, hand);

        assert!(hour.size.height < minute.size.height);
        assert!(minute.size.height < second.size.height);
        // all hands share the same bottom edge below the pivot
        assert_eq!(hour.bottom_right(), minute.bottom_right());
        assert_eq!(minute.bottom_right(), second.bottom_right());
        assert!(hour.bottom_right().unwrap().y >= pivot(FACE).1 as i32);
    }
}
