//! Store backend implementations.

pub mod memory;
pub mod router;
