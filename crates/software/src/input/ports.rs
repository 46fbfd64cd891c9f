/// A source of raw analog samples, typically one ADC channel wired to a panel control.
pub trait AnalogSource {
    /// Return one unprocessed sample on the converter's native scale (full scale is
    /// [`ADC_MAX`][crate::input::ADC_MAX]). No filtering or averaging is applied.
    fn sample_raw(&mut self) -> u16;
}

/// A source of digital line levels, typically a GPIO pin behind a gate jack or button.
pub trait DigitalSource {
    /// Return `true` while the line reads high.
    fn level_is_high(&mut self) -> bool;
}
