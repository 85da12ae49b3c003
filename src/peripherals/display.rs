//! Display control module for PineTime

use embassy_nrf::{
    gpio::{AnyPin, Output},
    peripherals::SPI2,
    spim::Spim,
};

use display_interface_spi::SPIInterface;
use embassy_time::Delay;
use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use mipidsi::{models::ST7789, Builder, Orientation};

pub const LCD_W: u16 = 240;
pub const LCD_H: u16 = 240;

/// The ST7789 panel driven over SPI2
pub type Lcd = mipidsi::Display<
    SPIInterface<Spim<'static, SPI2>, Output<'static, AnyPin>, Output<'static, AnyPin>>,
    ST7789,
    Output<'static, AnyPin>,
>;

/// Initialize the LCD and clear it to black. Returns `None` if the panel
/// does not respond.
pub fn init(
    spim: Spim<'static, SPI2>,
    cs: Output<'static, AnyPin>,
    dc: Output<'static, AnyPin>,
    rst: Output<'static, AnyPin>,
) -> Option<Lcd> {
    let mut lcd = Builder::st7789(SPIInterface::new(spim, dc, cs))
        .with_display_size(LCD_W, LCD_H)
        .with_orientation(Orientation::Portrait(false))
        .init(&mut Delay, Some(rst))
        .ok()?;

    lcd.clear(Rgb565::BLACK).ok()?;
    Some(lcd)
}
