use crate::configuration::SwitchConfig;
use crate::input::DigitalSource;
use num_derive::FromPrimitive;

/// Whether a high line level means the input is active.
///
/// Gate jacks are wired straight through and read [`Polarity::Normal`]; buttons and footswitches
/// that pull a line to ground against an internal pull-up read [`Polarity::Inverted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// The input is active while the line is high.
    #[default]
    Normal,
    /// The input is active while the line is low.
    Inverted,
}

impl SwitchConfig for Polarity {}

/// A gate jack or panel button, read through a [`DigitalSource`].
///
/// Whether the line idles high or low is a wiring concern; the pull-up, if any, is configured
/// when the pin itself is constructed.
pub struct Trigger<S> {
    source: S,
    polarity: Polarity,
}

impl<S: DigitalSource> Trigger<S> {
    /// Binds a digital source to a polarity.
    pub fn new(source: S, polarity: Polarity) -> Self {
        Self { source, polarity }
    }

    /// Returns `true` while the input is active, i.e. while the (possibly inverted) line
    /// level is high. Reads take effect immediately; no debouncing is applied.
    pub fn read(&mut self) -> bool {
        let level = self.source.level_is_high();

        match self.polarity {
            Polarity::Normal => level,
            Polarity::Inverted => !level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeGate {
        high: bool,
    }

    impl DigitalSource for FakeGate {
        fn level_is_high(&mut self) -> bool {
            self.high
        }
    }

    #[test]
    fn normal_polarity_follows_the_line() {
        let mut gate = Trigger::new(FakeGate { high: true }, Polarity::Normal);
        assert!(gate.read(), "A high line should read active");

        let mut gate = Trigger::new(FakeGate { high: false }, Polarity::Normal);
        assert!(!gate.read(), "A low line should read inactive");
    }

    #[test]
    fn inverted_polarity_flips_the_line() {
        let mut button = Trigger::new(FakeGate { high: false }, Polarity::Inverted);
        assert!(
            button.read(),
            "A grounded line should read active when inverted"
        );

        let mut button = Trigger::new(FakeGate { high: true }, Polarity::Inverted);
        assert!(
            !button.read(),
            "A high line should read inactive when inverted"
        );
    }

    #[test]
    fn polarity_selectable_from_a_switch_position() {
        assert_eq!(
            Some(Polarity::Inverted),
            Polarity::from_position(1),
            "Position 1 should select the second variant"
        );
        assert_eq!(
            None,
            Polarity::from_position(5),
            "An out-of-range position should select nothing"
        );
    }
}
