//! CSV files exchanged with the test bench and the pack assembly.

pub mod assignment;
pub mod cells;
pub mod results;
