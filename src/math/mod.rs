//! Mathematical utilities: Chebyshev basis and least squares.

pub mod chebyshev;
pub mod ols;

pub use chebyshev::*;
pub use ols::*;
