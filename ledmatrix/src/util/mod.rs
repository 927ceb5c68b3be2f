//! Utility code shared by the driver and its users.

pub mod loan;
pub mod measurement;
