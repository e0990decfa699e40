//! Infrastructure adapters implementing the port traits.

pub mod email;
pub mod memory;
pub mod postgres;
pub mod scheduling;
