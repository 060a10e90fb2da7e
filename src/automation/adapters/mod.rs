//! Adapter implementations for the automation rule repository port.

pub mod memory;
pub mod postgres;
