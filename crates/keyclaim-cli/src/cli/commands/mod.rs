//! Command implementations.

pub mod keygen;
pub mod serve;
pub mod update;
