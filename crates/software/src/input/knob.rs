use crate::configuration::ConfigError;
use crate::input::AnalogSource;
use measurements::Voltage;

/// Full-scale reading of the 10-bit converter the panel ranges are calibrated against.
pub const ADC_MAX: i32 = 1023;

/// Selects how a [`Range`] behaves at the edges of the scale.
///
/// The expander shipped with two quirks at the boundaries: thresholds were never validated, so a
/// reversed pair silently produced collapsed readings, and a fully-open control quantized one
/// position past the last switch position. Panels in the field were calibrated against those
/// readings, so both behaviors remain selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoundaryMode {
    /// Reject reversed thresholds at construction and clamp switch readings into range.
    #[default]
    Checked,
    /// Skip threshold validation and let a fully-open reading land one past the last switch
    /// position, matching panels calibrated against the shipped firmware.
    Legacy,
}

/// The raw window a knob or CV jack sweeps through, and how it maps onto 0..1.
///
/// Readings at or below `threshold_low` map to 0.0, readings at or above `threshold_high` map to
/// 1.0, and everything in between is rescaled linearly. Pulling the window in from the full
/// converter scale absorbs the dead zones at the ends of a potentiometer's travel and the offset
/// error of an input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Range {
    threshold_low: i32,
    threshold_high: i32,
    boundaries: BoundaryMode,
}

impl Default for Range {
    /// The full converter scale, boundary-checked.
    fn default() -> Self {
        Self {
            threshold_low: 0,
            threshold_high: ADC_MAX,
            boundaries: BoundaryMode::Checked,
        }
    }
}

impl Range {
    /// Constructs a [`BoundaryMode::Checked`] range.
    ///
    /// Returns [`ConfigError::ReversedThresholds`] unless `threshold_low < threshold_high`;
    /// a reversed window has no meaningful sweep and would otherwise read back collapsed
    /// values (see [`Range::legacy`]).
    pub fn new(threshold_low: i32, threshold_high: i32) -> Result<Self, ConfigError> {
        if threshold_high <= threshold_low {
            return Err(ConfigError::ReversedThresholds {
                low: threshold_low,
                high: threshold_high,
            });
        }

        Ok(Self {
            threshold_low,
            threshold_high,
            boundaries: BoundaryMode::Checked,
        })
    }

    /// Constructs a [`BoundaryMode::Legacy`] range, performing no validation at all.
    ///
    /// With reversed thresholds every sample at or below `threshold_low` still reads 0.0 and the
    /// rest read 1.0, because the low-threshold comparison is evaluated first. Useful only for
    /// panels calibrated against that behavior.
    pub fn legacy(threshold_low: i32, threshold_high: i32) -> Self {
        Self {
            threshold_low,
            threshold_high,
            boundaries: BoundaryMode::Legacy,
        }
    }

    /// Maps a raw sample onto 0..1.
    ///
    /// Samples outside the window are clamped to the ends; samples inside it are interpolated
    /// linearly. The low threshold is compared first, then the high one.
    pub fn normalized(&self, raw: u16) -> f32 {
        let r = i32::from(raw);

        if r <= self.threshold_low {
            0.0
        } else if r >= self.threshold_high {
            1.0
        } else {
            (r - self.threshold_low) as f32 / (self.threshold_high - self.threshold_low) as f32
        }
    }

    /// Quantizes a raw sample into one of `|positions|` equal-width switch positions.
    ///
    /// A negative `positions` count reverses the readout: the remapped index runs from
    /// `|positions|` fully closed down to 0 fully open, so a knob wired backwards on the panel
    /// can be read without reworking the board.
    ///
    /// `positions == 0` leaves the position width undefined and is reported as
    /// [`ConfigError::ZeroPositions`] in either boundary mode.
    ///
    /// In [`BoundaryMode::Legacy`], a sample that normalizes to exactly 1.0 lands on index
    /// `|positions|`, one past the last zero-based position; [`BoundaryMode::Checked`] clamps
    /// the result into `0..=|positions| - 1`.
    pub fn switch_position(&self, raw: u16, positions: i32) -> Result<i32, ConfigError> {
        if positions == 0 {
            return Err(ConfigError::ZeroPositions);
        }

        let width = 1.0 / positions.unsigned_abs() as f32;
        let mut position = (self.normalized(raw) / width) as i32;

        if positions < 0 {
            position = (positions + position).unsigned_abs() as i32;
        }

        Ok(match self.boundaries {
            BoundaryMode::Checked => position.min(positions.unsigned_abs() as i32 - 1),
            BoundaryMode::Legacy => position,
        })
    }
}

/// A panel knob or CV jack, read through an [`AnalogSource`] and mapped onto a [`Range`].
///
/// The source handle and range are fixed at construction; reading has no side effects beyond
/// sampling the source.
pub struct Knob<S> {
    source: S,
    range: Range,
}

impl<S: AnalogSource> Knob<S> {
    /// Binds an analog source to a range.
    pub fn new(source: S, range: Range) -> Self {
        Self { source, range }
    }

    /// Returns the raw sample, exactly as the source produced it.
    pub fn read_raw(&mut self) -> u16 {
        self.source.sample_raw()
    }

    /// Returns the current reading as a value between 0.0 and 1.0, inclusive.
    pub fn read(&mut self) -> f32 {
        let raw = self.read_raw();
        self.range.normalized(raw)
    }

    /// Returns the current reading as a switch position; see [`Range::switch_position`].
    pub fn read_switch(&mut self, positions: i32) -> Result<i32, ConfigError> {
        let raw = self.read_raw();
        self.range.switch_position(raw, positions)
    }

    /// Returns the current reading scaled onto a control-voltage span.
    ///
    /// A fully-closed control reads 0 V and a fully-open one reads `full_scale`.
    pub fn read_volts(&mut self, full_scale: Voltage) -> Voltage {
        full_scale * f64::from(self.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePot {
        raw: u16,
    }

    impl AnalogSource for FakePot {
        fn sample_raw(&mut self) -> u16 {
            self.raw
        }
    }

    #[test]
    fn fully_closed_reads_zero() {
        let mut knob = Knob::new(FakePot { raw: 0 }, Range::default());
        assert_eq!(
            0.0,
            knob.read(),
            "A sample at the bottom of the scale should normalize to 0.0"
        );
    }

    #[test]
    fn fully_open_reads_one() {
        let mut knob = Knob::new(FakePot { raw: 1023 }, Range::default());
        assert_eq!(
            1.0,
            knob.read(),
            "A sample at the top of the scale should normalize to 1.0"
        );
    }

    #[test]
    fn midpoint_reads_half() {
        let range = Range::new(0, 1000).expect("thresholds are ordered");
        let mut knob = Knob::new(FakePot { raw: 500 }, range);
        assert_eq!(
            0.5,
            knob.read(),
            "The middle of the window should normalize to 0.5"
        );
    }

    #[test]
    fn samples_outside_the_window_are_clamped() {
        let range = Range::new(100, 900).expect("thresholds are ordered");
        assert_eq!(
            0.0,
            range.normalized(50),
            "Samples below the low threshold should clamp to 0.0"
        );
        assert_eq!(
            1.0,
            range.normalized(950),
            "Samples above the high threshold should clamp to 1.0"
        );
    }

    #[test]
    fn readings_inside_the_window_increase_with_the_sample() {
        let range = Range::new(100, 900).expect("thresholds are ordered");
        let mut previous = 0.0;
        for raw in [101, 250, 500, 750, 899] {
            let reading = range.normalized(raw);
            assert!(
                reading > previous,
                "Reading for raw {} should exceed the reading for the previous sample",
                raw
            );
            assert!(
                reading > 0.0 && reading < 1.0,
                "Reading inside the window should lie strictly between 0 and 1, got {}",
                reading
            );
            previous = reading;
        }
    }

    #[test]
    fn reading_is_idempotent_while_the_sample_holds() {
        let mut knob = Knob::new(FakePot { raw: 341 }, Range::default());
        assert_eq!(
            knob.read(),
            knob.read(),
            "Two reads of an unchanged source should agree"
        );
    }

    #[test]
    fn reversed_thresholds_are_rejected() {
        assert_eq!(
            Err(ConfigError::ReversedThresholds { low: 900, high: 100 }),
            Range::new(900, 100),
            "A reversed window should be reported at construction"
        );
        assert_eq!(
            Err(ConfigError::ReversedThresholds { low: 512, high: 512 }),
            Range::new(512, 512),
            "An empty window should be reported at construction"
        );
    }

    #[test]
    fn legacy_ranges_accept_reversed_thresholds() {
        // The low comparison wins, so the sweep collapses to a step at the low threshold.
        let range = Range::legacy(900, 100);
        assert_eq!(0.0, range.normalized(500), "At or below low reads 0.0");
        assert_eq!(1.0, range.normalized(950), "Everything else reads 1.0");
    }

    #[test]
    fn switch_readout_quantizes_the_sweep() {
        let range = Range::new(0, 1000).expect("thresholds are ordered");
        let mut knob = Knob::new(FakePot { raw: 250 }, range);
        assert_eq!(
            Ok(2),
            knob.read_switch(10),
            "A quarter-open knob on 10 positions should sit in position 2"
        );
    }

    #[test]
    fn negative_position_count_reverses_the_readout() {
        let range = Range::new(0, 1000).expect("thresholds are ordered");
        assert_eq!(
            Ok(8),
            range.switch_position(250, -10),
            "Position 2 of 10 should remap to 8 when the count is negative"
        );
    }

    #[test]
    fn legacy_top_of_scale_overflows_the_last_position() {
        let range = Range::legacy(0, 10);
        assert_eq!(
            Ok(10),
            range.switch_position(10, 10),
            "A fully-open legacy reading should land one past the last position"
        );
    }

    #[test]
    fn checked_top_of_scale_clamps_to_the_last_position() {
        let range = Range::new(0, 10).expect("thresholds are ordered");
        assert_eq!(
            Ok(9),
            range.switch_position(10, 10),
            "A fully-open checked reading should clamp into the last position"
        );
    }

    #[test]
    fn zero_positions_is_a_configuration_error() {
        let range = Range::default();
        assert_eq!(
            Err(ConfigError::ZeroPositions),
            range.switch_position(512, 0),
            "Zero positions should be reported, not divided by"
        );
        assert_eq!(
            Err(ConfigError::ZeroPositions),
            Range::legacy(0, 1023).switch_position(512, 0),
            "Legacy mode should report zero positions too"
        );
    }

    #[test]
    fn volts_scale_with_the_reading() {
        let range = Range::new(0, 1000).expect("thresholds are ordered");
        let mut knob = Knob::new(FakePot { raw: 500 }, range);
        assert_eq!(
            Voltage::from_volts(2.5),
            knob.read_volts(Voltage::from_volts(5.0)),
            "A half-open knob on a 5 V span should read 2.5 V"
        );
    }
}
