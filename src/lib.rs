//! # Recipe Consistency Audit
//!
//! Audits a recipe collection for internal inconsistencies between
//! description, ingredient list, instructions and image, and for violations
//! of the low-GI substitution policy. Findings are graded P0 to P2 and
//! exported as a CSV report.

pub mod aggregator;
pub mod audit_config;
pub mod audit_errors;
pub mod audit_patterns;
pub mod canonical_tables;
pub mod cli;
pub mod consistency_checks;
pub mod db;
pub mod recipe_model;
pub mod report;
pub mod substitution_extractor;
pub mod text_processing;
