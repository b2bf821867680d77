//! Continuum smoothing.
//!
//! Responsibilities:
//!
//! - place exclusion ranges on the wavelength axis (`locator`)
//! - fit one continuum segment with a Chebyshev series (`segment`)
//! - blend fitted and raw flux at the joins (`blend`)
//! - run all of the above across a spectrum (`transform`)

pub mod blend;
pub mod locator;
pub mod segment;
pub mod transform;

pub use blend::*;
pub use locator::*;
pub use segment::*;
pub use transform::*;
