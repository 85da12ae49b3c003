//! Clock state and hand angles

use chrono::Timelike;

/// Degrees the hour hand advances per hour
pub const STEP_HOUR: f32 = 360.0 / 12.0;
/// Degrees the minute hand advances per minute
pub const STEP_MINUTE: f32 = 360.0 / 60.0;
/// Degrees the second hand advances per second
pub const STEP_SECOND: f32 = 360.0 / 60.0;

/// One of the three rotating hands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hand {
    Hour,
    Minute,
    Second,
}

impl Hand {
    /// Hands in drawing order, bottom to top
    pub const ALL: [Hand; 3] = [Hand::Hour, Hand::Minute, Hand::Second];
}

/// Time shown on the face
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockState {
    /// Hour in 12-hour form, 0–11
    pub hour: u8,
    /// Minute, 0–59
    pub minute: u8,
    /// Second, 0–59
    pub second: u8,
}

impl ClockState {
    /// Midnight
    pub const fn new() -> Self {
        Self {
            hour: 0,
            minute: 0,
            second: 0,
        }
    }

    /// Create a state from hour, minute and second. The hour wraps to the
    /// 12-hour form, minute and second are clamped to 59.
    pub fn from_hms(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour: hour % 12,
            minute: minute.min(59),
            second: second.min(59),
        }
    }

    /// Read hour (12-hour form), minute and second from a wall-clock time
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        Self {
            hour: (time.hour() % 12) as u8,
            minute: time.minute() as u8,
            second: time.second() as u8,
        }
    }

    /// Hour hand angle in degrees clockwise from twelve o'clock.
    ///
    /// The hour hand jumps on the hour, minutes are not carried over.
    pub fn hour_angle(&self) -> f32 {
        STEP_HOUR * self.hour as f32
    }

    /// Minute hand angle in degrees clockwise from twelve o'clock
    pub fn minute_angle(&self) -> f32 {
        STEP_MINUTE * self.minute as f32
    }

    /// Second hand angle in degrees clockwise from twelve o'clock
    pub fn second_angle(&self) -> f32 {
        STEP_SECOND * self.second as f32
    }

    pub fn angle(&self, hand: Hand) -> f32 {
        match hand {
            Hand::Hour => self.hour_angle(),
            Hand::Minute => self.minute_angle(),
            Hand::Second => self.second_angle(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;

    #[test]
    fn hour_angle_is_thirty_degrees_per_hour() {
        for hour in 0..12u8 {
            let state = ClockState::from_hms(hour, 0, 0);
            assert_eq!(state.hour_angle(), 30.0 * hour as f32);
        }
        assert_eq!(ClockState::from_hms(12, 0, 0).hour_angle(), 0.0);
    }

    #[test]
    fn minute_and_second_angles_are_six_degrees_per_unit() {
        for unit in 0..60u8 {
            let state = ClockState::from_hms(0, unit, unit);
            assert_eq!(state.minute_angle(), 6.0 * unit as f32);
            assert_eq!(state.second_angle(), 6.0 * unit as f32);
        }
        assert_eq!(ClockState::from_hms(0, 59, 0).minute_angle(), 354.0);
        assert_eq!(ClockState::from_hms(0, 0, 59).second_angle(), 354.0);
    }

    #[test]
    fn quarter_past_three() {
        let time = NaiveTime::from_hms_opt(3, 15, 45).unwrap();
        let state = ClockState::from_time(&time);

        assert_eq!(state.angle(Hand::Hour), 90.0);
        assert_eq!(state.angle(Hand::Minute), 90.0);
        assert_eq!(state.angle(Hand::Second), 270.0);
    }

    #[test]
    fn afternoon_uses_twelve_hour_form() {
        let time = NaiveTime::from_hms_opt(15, 59, 30).unwrap();
        let state = ClockState::from_time(&time);

        assert_eq!(state, ClockState::from_hms(3, 59, 30));
        // no carry from the minutes into the hour hand
        assert_eq!(state.hour_angle(), 90.0);

        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(ClockState::from_time(&noon).hour, 0);
    }
}
