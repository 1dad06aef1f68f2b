//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract the placement core depends on.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Student::validate()` before SQL.
//! - A student update and the notifications emitted by the same evaluation
//!   commit in one transaction or not at all.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod placement_repo;
