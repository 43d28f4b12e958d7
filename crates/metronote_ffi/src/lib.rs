//! Flutter bridge crate for the Metro Notes core.

pub mod api;
