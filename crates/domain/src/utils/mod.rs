//! Domain-level utility helpers

pub mod tax_id;
