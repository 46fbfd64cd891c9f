//! This module contains the errors reported for invalid control setups and helpers for mapping
//! panel readings onto configuration enums.

use num_traits::FromPrimitive;

/// Misconfiguration of a panel control, reported instead of letting the arithmetic run off
/// the scale.
///
/// Every variant traces back to caller-supplied configuration; reads themselves cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The low threshold of a range was at or above the high one, leaving no sweep to map.
    ReversedThresholds {
        /// The configured low threshold.
        low: i32,
        /// The configured high threshold.
        high: i32,
    },
    /// A switch readout was asked for zero positions, which leaves the position width undefined.
    ZeroPositions,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ReversedThresholds { low, high } => write!(
                f,
                "range thresholds are reversed: low {} must be below high {}",
                low, high
            ),
            Self::ZeroPositions => write!(f, "a switch readout needs at least one position"),
        }
    }
}

/// A trait which selects an enum's variant from a quantized switch reading.
///
/// Useful for knobs and selectors wired as N-position switches: the zero-based position returned
/// by [`Knob::read_switch`][crate::input::Knob::read_switch] indexes directly into the variants.
pub trait SwitchConfig {
    /// Return the variant sitting at `position`, or `None` if the position is out of range.
    fn from_position(position: i32) -> Option<Self>
    where
        Self: FromPrimitive + Sized,
    {
        Self::from_i32(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_derive::FromPrimitive;

    #[derive(Debug, Clone, Copy, FromPrimitive, PartialEq)]
    enum Alpha {
        A,
        B,
        C,
    }
    impl SwitchConfig for Alpha {}

    #[test]
    fn from_position() {
        assert_eq!(
            Some(Alpha::A),
            Alpha::from_position(0),
            "Position 0 should select the first variant; expected left but got right"
        );
        assert_eq!(
            Some(Alpha::C),
            Alpha::from_position(2),
            "Position 2 should select the last variant; expected left but got right"
        );
        assert_eq!(
            None,
            Alpha::from_position(3),
            "Positions past the last variant should select nothing"
        );
        assert_eq!(
            None,
            Alpha::from_position(-1),
            "Negative positions should select nothing"
        );
    }
}
