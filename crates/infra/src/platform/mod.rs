//! Host platform queries.

pub mod device;

pub use device::detect;
