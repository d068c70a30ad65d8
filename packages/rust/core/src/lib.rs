//! Core pipeline for wikimill: path planning, parallel source
//! conversion, deterministic concatenation, and man/PDF generation.

pub mod concat;
pub mod convert;
mod exec;
pub mod man;
pub mod pdf;
pub mod pipeline;
pub mod plan;
pub mod prereq;
pub mod repo;
