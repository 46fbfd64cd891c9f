//! Placeholder state for the Morphagene end of the patch.

/// Tracks what the expander believes the attached Morphagene is doing.
///
/// Only the play state is modeled so far. Splice and gene-size tracking will join it once the
/// corresponding outputs are wired; this struct is expected to grow with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Morphagene {
    play: bool,
}

impl Default for Morphagene {
    /// The Morphagene plays freely when nothing holds its play input.
    fn default() -> Self {
        Self { play: true }
    }
}

impl Morphagene {
    /// Returns `true` while the attached module is believed to be playing.
    pub fn is_playing(&self) -> bool {
        self.play
    }

    /// Records whether the attached module is playing.
    pub fn set_playing(&mut self, play: bool) {
        self.play = play;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_by_default() {
        assert!(
            Morphagene::default().is_playing(),
            "A freshly initialized module should be playing"
        );
    }

    #[test]
    fn play_state_follows_the_setter() {
        let mut module = Morphagene::default();
        module.set_playing(false);
        assert!(!module.is_playing(), "Play state should track the setter");
    }
}
