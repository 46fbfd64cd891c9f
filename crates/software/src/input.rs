//! Abstractions for the expander's panel controls.
//!
//! Controls come in two flavors: continuous ([`Knob`], backed by an analog-to-digital
//! conversion) and on/off ([`Trigger`], backed by a digital line level). Both are generic over
//! the source traits in [`ports`] so the logic can be exercised on a host without hardware.

mod knob;
pub use knob::*;

mod ports;
pub use ports::*;

mod trigger;
pub use trigger::*;
