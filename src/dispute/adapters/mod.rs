//! Adapter implementations for report ports.

pub mod memory;
pub mod postgres;
