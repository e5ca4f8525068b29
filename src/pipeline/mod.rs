//! Two-stage invert-and-overlay pipeline.

/// State machine sequencing the engine calls of one run.
pub mod controller;
/// Argument lists for the invert and composite invocations.
pub mod filters;
