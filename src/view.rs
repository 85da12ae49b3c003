//! Analog clock face view
//!
//! The view owns the measured size, the time it shows and the four scaled
//! drawables. Drawables are scaled on the first draw from the size known at
//! that point and kept from then on, even if the view is resized later.

use embedded_graphics::{
    geometry::{OriginDimensions, Point, Size},
    primitives::Rectangle,
};

use crate::{
    canvas::Canvas,
    clock::{ClockState, Hand},
    error::Error,
    image::{scaled_drawable, ResourceId, Resources, ScaledDrawable},
    layout,
    measure::{self, MeasureSpec, MeasuredSize},
    metrics::DisplayMetrics,
};

/// Resource ids of the dial and the three hands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceResources {
    pub dial: ResourceId,
    pub hour_hand: ResourceId,
    pub minute_hand: ResourceId,
    pub second_hand: ResourceId,
}

impl FaceResources {
    pub fn hand(&self, hand: Hand) -> ResourceId {
        match hand {
            Hand::Hour => self.hour_hand,
            Hand::Minute => self.minute_hand,
            Hand::Second => self.second_hand,
        }
    }
}

/// Dial and hands scaled for one face size
struct FaceDrawables<'r> {
    dial: ScaledDrawable<'r>,
    hour_hand: ScaledDrawable<'r>,
    minute_hand: ScaledDrawable<'r>,
    second_hand: ScaledDrawable<'r>,
}

impl<'r> FaceDrawables<'r> {
    fn scale<R>(resources: &'r R, ids: &FaceResources, size: Size) -> Result<Self, Error>
    where
        R: Resources + ?Sized,
    {
        let (hand_w, hand_h) = layout::hand_size(size);
        let hand = |hand| scaled_drawable(resources, ids.hand(hand), hand_w, hand_h);

        Ok(Self {
            dial: scaled_drawable(resources, ids.dial, size.width as i32, size.height as i32)?,
            hour_hand: hand(Hand::Hour)?,
            minute_hand: hand(Hand::Minute)?,
            second_hand: hand(Hand::Second)?,
        })
    }

    fn hand(&self, hand: Hand) -> &ScaledDrawable<'r> {
        match hand {
            Hand::Hour => &self.hour_hand,
            Hand::Minute => &self.minute_hand,
            Hand::Second => &self.second_hand,
        }
    }
}

/// The clock face
pub struct ClockView<'r, R: ?Sized, M> {
    resources: &'r R,
    ids: FaceResources,
    metrics: M,
    size: Size,
    state: ClockState,
    drawables: Option<FaceDrawables<'r>>,
}

impl<'r, R, M> ClockView<'r, R, M>
where
    R: Resources + ?Sized,
    M: DisplayMetrics,
{
    pub fn new(resources: &'r R, ids: FaceResources, metrics: M) -> Self {
        Self {
            resources,
            ids,
            metrics,
            size: Size::zero(),
            state: ClockState::new(),
            drawables: None,
        }
    }

    /// Resolve the face size for a measurement pass and adopt it as the
    /// view size
    pub fn on_measure(
        &mut self,
        width_spec: MeasureSpec,
        height_spec: MeasureSpec,
    ) -> Result<MeasuredSize, Error> {
        let measured = measure::measure(width_spec, height_spec, &self.metrics)?;
        self.size = measured;
        Ok(measured)
    }

    /// Set the view size directly, bypassing measurement
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Show a new time. Takes effect on the next draw.
    pub fn set_state(&mut self, state: ClockState) {
        self.state = state;
    }

    /// Size the drawables were scaled for, if they have been scaled yet
    pub fn scaled_size(&self) -> Option<Size> {
        self.drawables.as_ref().map(|drawables| drawables.dial.size())
    }

    /// Draw the dial, then each hand rotated about the centre of the face
    pub fn on_draw<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Result<(), Error> {
        let size = self.size;
        let state = self.state;
        let drawables = match self.drawables {
            Some(ref drawables) => drawables,
            None => {
                let scaled = FaceDrawables::scale(self.resources, &self.ids, size)?;
                info!("clock face scaled to {}x{}", size.width, size.height);
                &*self.drawables.insert(scaled)
            }
        };

        canvas.draw_image(&drawables.dial, Rectangle::new(Point::zero(), size))?;

        let pivot = layout::pivot(size);
        for hand in Hand::ALL {
            let drawable = drawables.hand(hand);
            canvas.save()?;
            let bounds = layout::hand_bounds(hand, size, drawable.size());
            canvas.rotate(state.angle(hand), pivot);
            canvas.draw_image(drawable, bounds)?;
            canvas.restore()?;
        }

        Ok(())
    }
}
