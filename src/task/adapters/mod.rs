//! Adapter implementations for task and project repository ports.

pub mod memory;
pub mod postgres;
