//! Hardware adapters backing the logic crate's source traits.

use embassy_stm32::adc::{Adc, AnyAdcChannel, Instance};
use embassy_stm32::gpio::Input;
use morphalogic_lib::input::{AnalogSource, DigitalSource};

/// An ADC channel wired to one panel control.
///
/// The F7's converter runs at 12 bits; samples are scaled down to the 10-bit range the panel
/// [`Range`][morphalogic_lib::input::Range]s are calibrated against.
pub struct AdcSource<'d, T: Instance> {
    adc: Adc<'d, T>,
    channel: AnyAdcChannel<T>,
}

impl<'d, T: Instance> AdcSource<'d, T> {
    /// Takes exclusive ownership of a converter and the channel it samples.
    pub fn new(adc: Adc<'d, T>, channel: AnyAdcChannel<T>) -> Self {
        Self { adc, channel }
    }
}

impl<T: Instance> AnalogSource for AdcSource<'_, T> {
    fn sample_raw(&mut self) -> u16 {
        self.adc.blocking_read(&mut self.channel) >> 2
    }
}

/// A GPIO pin read as a digital control line.
///
/// Pull-up selection happens where the [`Input`] is constructed, alongside the rest of the
/// pin configuration.
pub struct GpioLevel<'d> {
    pin: Input<'d>,
}

impl<'d> GpioLevel<'d> {
    /// Wraps a configured input pin.
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }
}

impl DigitalSource for GpioLevel<'_> {
    fn level_is_high(&mut self) -> bool {
        self.pin.is_high()
    }
}
