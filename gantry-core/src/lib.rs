//! Gantry Core
//!
//! Core types for the Gantry maintenance planning pipeline.
//!
//! This crate contains:
//! - Domain types: analysis windows, downtime records, cluster analysis
//!   results, maintenance tasks, and the run summary shared between the
//!   workflow, its collaborators, and the CLI.

pub mod domain;
