use thiserror::Error;

use crate::quantity::resistance::Ohms;

/// Errors of the cell selection and module assembly pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Per-record malformation, recovered by excluding the record from the population.
    #[error("record on line {line} rejected: {reason}")]
    RecordRejected { line: usize, reason: Rejection },

    /// Not enough valid cells to fill every module.
    #[error("not enough cells: {available} valid, {required} required")]
    InsufficientPopulation { available: usize, required: usize },

    /// No module can accept the cell: the capacity bookkeeping is broken.
    #[error("no eligible module left for cell `{serial_number}` ({n_assigned} cells assigned)")]
    AssemblyExhausted { serial_number: String, n_assigned: usize },

    /// The assembler was fed fewer cells than the modules can hold.
    #[error("modules are not filled: {n_cells} cells given, {required} required")]
    Underfilled { n_cells: usize, required: usize },
}

/// Why a record has been excluded from the cell population.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Rejection {
    #[error("missing serial number")]
    MissingSerialNumber,

    #[error("missing resistance")]
    MissingResistance,

    #[error("invalid resistance `{0}`")]
    InvalidResistance(String),

    #[error("non-positive resistance {0:?}")]
    NonPositiveResistance(Ohms),
}
