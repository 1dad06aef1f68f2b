//! Verification pipeline evaluation.
//!
//! # Responsibility
//! - Derive overall status and aggregate score from the four round slots.
//! - Decide which notifications a (re-)evaluation emits.
//!
//! # Invariants
//! - Evaluation is a pure function of the pipeline and the previous overall
//!   status; persistence and feed appends happen in the service layer.

pub mod evaluator;
