//! Flutter bridge for Habitly core.

pub mod api;
