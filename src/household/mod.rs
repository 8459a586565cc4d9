//! Household inputs and batch loading

mod data;
pub mod loader;

pub use data::*;
pub use loader::{load_households, load_households_from_reader};
