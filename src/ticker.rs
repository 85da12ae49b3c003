//! Once-per-second clock updates
//!
//! The tick loop never draws. It stores the latest [`ClockState`] in a
//! [`ClockLink`] and signals that a redraw is due; the render task picks the
//! state up from there. Detaching the link stops the loop for good.

use core::{
    cell::Cell,
    sync::atomic::{AtomicBool, Ordering},
};

use embassy_futures::select::{select, Either};
use embassy_sync::{
    blocking_mutex::{raw::RawMutex, Mutex},
    signal::Signal,
};
use embassy_time::{Duration, Timer};

use crate::{clock::ClockState, time::TimeSource};

/// Waits until the next tick is due
#[allow(async_fn_in_trait)]
pub trait Pacer {
    async fn wait(&mut self);
}

/// Sleeps one second between ticks. Time spent outside the wait is not made
/// up for, so a busy executor simply shows a later time on the next tick.
pub struct OneSecond;

impl Pacer for OneSecond {
    async fn wait(&mut self) {
        Timer::after(Duration::from_secs(1)).await;
    }
}

/// State shared between the tick loop and the render task for as long as the
/// face is attached
pub struct ClockLink<M: RawMutex> {
    state: Mutex<M, Cell<ClockState>>,
    redraw: Signal<M, ()>,
    detach: Signal<M, ()>,
    detached: AtomicBool,
}

impl<M: RawMutex> ClockLink<M> {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(ClockState::new())),
            redraw: Signal::new(),
            detach: Signal::new(),
            detached: AtomicBool::new(false),
        }
    }

    /// Latest time stored by the tick loop
    pub fn state(&self) -> ClockState {
        self.state.lock(|state| state.get())
    }

    /// Wait until the tick loop requests a redraw
    pub async fn wait_redraw(&self) {
        self.redraw.wait().await
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw.signaled()
    }

    /// Stop the tick loop. Takes effect immediately, also for a tick that is
    /// currently waiting, and cannot be undone. Calling it again is a no-op.
    pub fn detach(&self) {
        if !self.detached.swap(true, Ordering::SeqCst) {
            info!("clock face detached");
            self.detach.signal(());
        }
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    /// Store a new time and request a redraw, unless detached
    fn tick(&self, state: ClockState) -> bool {
        if self.is_detached() {
            return false;
        }
        self.state.lock(|cell| cell.set(state));
        self.redraw.signal(());
        true
    }
}

impl<M: RawMutex> Default for ClockLink<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tick loop: wait for the pacer, read the time, store it and request a
/// redraw. Returns once the link is detached.
pub async fn run<M, T, P>(link: &ClockLink<M>, time: &T, pacer: &mut P)
where
    M: RawMutex,
    T: TimeSource + ?Sized,
    P: Pacer,
{
    info!("clock ticker started");
    while !link.is_detached() {
        if let Either::First(()) = select(link.detach.wait(), pacer.wait()).await {
            break;
        }
        let state = ClockState::from_time(&time.now());
        if !link.tick(state) {
            break;
        }
        trace!("tick {}:{}:{}", state.hour, state.minute, state.second);
    }
    info!("clock ticker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use embassy_futures::{block_on, join::join, yield_now};
    use embassy_sync::{blocking_mutex::raw::NoopRawMutex, channel::Channel};
    use pretty_assertions::assert_eq;

    struct FakeClock(Cell<NaiveDateTime>);

    impl FakeClock {
        fn at(hour: u32, minute: u32, second: u32) -> Self {
            Self(Cell::new(datetime(hour, minute, second)))
        }

        fn set(&self, hour: u32, minute: u32, second: u32) {
            self.0.set(datetime(hour, minute, second));
        }
    }

    impl TimeSource for FakeClock {
        fn now(&self) -> NaiveDateTime {
            self.0.get()
        }
    }

    fn datetime(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 3)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    /// Ticks whenever the test pushes into the channel
    struct Scripted<'a>(&'a Channel<NoopRawMutex, (), 4>);

    impl Pacer for Scripted<'_> {
        async fn wait(&mut self) {
            self.0.receive().await
        }
    }

    async fn settle() {
        for _ in 0..4 {
            yield_now().await;
        }
    }

    #[test]
    fn tick_stores_time_and_requests_redraw() {
        let _ = env_logger::builder().is_test(true).try_init();
        let link = ClockLink::<NoopRawMutex>::new();
        let clock = FakeClock::at(15, 15, 45);
        let ticks = Channel::<NoopRawMutex, (), 4>::new();
        let mut pacer = Scripted(&ticks);

        block_on(join(run(&link, &clock, &mut pacer), async {
            settle().await;
            // nothing happens before the first tick
            assert_eq!(link.state(), ClockState::new());
            assert!(!link.redraw_pending());

            ticks.send(()).await;
            settle().await;
            assert_eq!(link.state(), ClockState::from_hms(3, 15, 45));
            assert!(link.redraw_pending());

            clock.set(15, 15, 46);
            ticks.send(()).await;
            settle().await;
            assert_eq!(link.state().second, 46);

            link.detach();
        }));
    }

    #[test]
    fn no_ticks_after_detach() {
        let link = ClockLink::<NoopRawMutex>::new();
        let clock = FakeClock::at(9, 0, 0);
        let ticks = Channel::<NoopRawMutex, (), 4>::new();
        let mut pacer = Scripted(&ticks);

        block_on(join(run(&link, &clock, &mut pacer), async {
            ticks.send(()).await;
            settle().await;
            assert_eq!(link.state(), ClockState::from_hms(9, 0, 0));

            link.detach();
            // time keeps moving and the pacer keeps firing
            clock.set(9, 0, 5);
            ticks.try_send(()).unwrap();
            settle().await;
        }));

        assert!(link.is_detached());
        assert_eq!(link.state(), ClockState::from_hms(9, 0, 0));
    }

    #[test]
    fn detach_before_start_and_twice_is_harmless() {
        let link = ClockLink::<NoopRawMutex>::new();
        let clock = FakeClock::at(1, 2, 3);
        let ticks = Channel::<NoopRawMutex, (), 4>::new();
        ticks.try_send(()).unwrap();

        link.detach();
        link.detach();
        block_on(run(&link, &clock, &mut Scripted(&ticks)));

        assert_eq!(link.state(), ClockState::new());
        assert!(!link.redraw_pending());
    }
}
