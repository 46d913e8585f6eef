//! Report-building pipeline stages.

pub mod bead_model;
pub mod efa;
pub mod extract;
pub mod figure;
pub mod layout;
pub mod report;
pub mod table;
