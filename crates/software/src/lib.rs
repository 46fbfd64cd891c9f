//! This crate contains architecture-agnostic logic for MorphaLogic, an expander which adds
//! external control to the [Make Noise Morphagene](https://www.makenoisemusic.com/modules/morphagene),
//! a tape and microsound eurorack module. Panel knobs and CV jacks are read through [`input::Knob`],
//! which maps raw converter samples onto normalized values or quantized switch positions; gate jacks
//! and buttons are read through [`input::Trigger`].

#![deny(missing_docs)]
#![no_std]

pub mod configuration;

pub mod input;

pub mod morphagene;
