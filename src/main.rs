#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Level, Output, OutputDrive, Pin},
    peripherals::SPI2,
    spim,
};
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;

bind_interrupts!(struct Irqs {
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{
    backlight::{Backlight, DEFAULT_BRIGHTNESS},
    display::{self, Lcd, LCD_H, LCD_W},
};
use pinetime_analog_clock::{
    ticker, ClockLink, ClockView, FaceResources, MeasureSpec, OneSecond, ResourceId,
    ResourceTable, ScreenMetrics, TimeManager, TimeReference, TransformCanvas,
};
use system::config::SystemConfig;

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));
const TIMEZONE: i32 = 1 * 3_600;

// Face bitmaps, see DESIGN.md for the encoding
static ASSETS: [&[u8]; 4] = [
    include_bytes!("../assets/dial.raw"),
    include_bytes!("../assets/hour_hand.raw"),
    include_bytes!("../assets/minute_hand.raw"),
    include_bytes!("../assets/second_hand.raw"),
];
static RESOURCES: ResourceTable<'static> = ResourceTable::new(&ASSETS);

const FACE_RESOURCES: FaceResources = FaceResources {
    dial: ResourceId(0),
    hour_hand: ResourceId(1),
    minute_hand: ResourceId(2),
    second_hand: ResourceId(3),
};

// Shared between the tick and render tasks
static FACE: ClockLink<ThreadModeRawMutex> = ClockLink::new();

/// Update the face time once per second
#[embassy_executor::task(pool_size = 1)]
async fn clock_tick(time: TimeManager) {
    ticker::run(&FACE, &time, &mut OneSecond).await;
}

/// Redraw the face whenever the tick asks for it
#[embassy_executor::task(pool_size = 1)]
async fn render(lcd: Lcd, mut backlight: Backlight) {
    let metrics = ScreenMetrics::new(LCD_W as u32, LCD_H as u32);
    let mut view = ClockView::new(&RESOURCES, FACE_RESOURCES, metrics);
    if let Err(e) = view.on_measure(
        MeasureSpec::exactly(LCD_W as u32),
        MeasureSpec::exactly(LCD_H as u32),
    ) {
        defmt::error!("Cannot measure clock face: {}", e);
        FACE.detach();
    }

    let mut canvas = TransformCanvas::new(lcd);
    while !FACE.is_detached() {
        FACE.wait_redraw().await;
        view.set_state(FACE.state());
        if let Err(e) = view.on_draw(&mut canvas) {
            defmt::error!("Failed to draw clock face: {}", e);
            FACE.detach();
        }
    }

    backlight.off();
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::new());
    defmt::info!("Initializing");

    // Initialize Backlight
    let mut backlight = Backlight::init(
        Output::new(p.P0_14.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_22.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_23.degrade(), Level::High, OutputDrive::Standard),
        0,
    );

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let Some(lcd) = display::init(
        spim,
        Output::new(p.P0_25.degrade(), Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18.degrade(), Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26.degrade(), Level::Low, OutputDrive::Standard),
    ) else {
        defmt::error!("LCD initialization failed");
        return;
    };
    backlight.set(DEFAULT_BRIGHTNESS);
    defmt::info!("Backlight at level {}", backlight.brightness());

    // Start the clock at the build time
    let mut time = TimeManager::init(TIMEZONE);
    match TimeReference::from_timestamp(UTC_EPOCH) {
        Some(reference) => time.set_time(reference),
        None => defmt::warn!("Build time {} out of range, starting at epoch", UTC_EPOCH),
    }

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(render(lcd, backlight)));
    unwrap!(spawner.spawn(clock_tick(time)));
}
