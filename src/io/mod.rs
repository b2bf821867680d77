//! Input/output helpers.
//!
//! - spectrum files, FITS, JSON or CSV (`spectrum`, `fits`)
//! - telluric range files (`ranges`)
//! - diagnostic CSV export (`export`)

pub mod export;
pub mod fits;
pub mod ranges;
pub mod spectrum;

pub use export::*;
pub use fits::*;
pub use ranges::*;
pub use spectrum::*;
