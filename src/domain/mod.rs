//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - smoothing knobs (`LookupMode`, `TrailingRescale`, `BlendWeighting`, `SmoothOptions`)
//! - spectral inputs (`Spectrum`, `LinearSolution`, `ExclusionRange`)
//! - derived index spans (`SegmentIndexRange`, `ContinuumSegment`)
//! - the run configuration (`SmoothConfig`) and the JSON file schema (`SpectrumFile`)

pub mod types;

pub use types::*;
