//! Data sources other than files.
//!
//! - `synth`: seeded synthetic spectra for trying the tool end to end

pub mod synth;

pub use synth::*;
