//! `tellfit` library crate.
//!
//! The binary (`tellfit`) is a thin wrapper around this library so that:
//!
//! - the smoothing transform is testable without spawning processes
//! - file formats, plotting and fitting stay separately usable

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
