use crate::{
    core::error::Rejection,
    quantity::resistance::{Ohms, Siemens},
};

/// Characterized battery cell.
///
/// The conductance is derived from the resistance at construction and cannot be set on its own.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    serial_number: String,
    resistance: Ohms,
    conductance: Siemens,

    /// Position of the record in the input dataset, starting with zero.
    origin_rank: usize,
}

impl Cell {
    pub fn try_new(
        serial_number: impl Into<String>,
        resistance: Ohms,
        origin_rank: usize,
    ) -> Result<Self, Rejection> {
        if !resistance.0.is_finite() {
            return Err(Rejection::InvalidResistance(resistance.0.to_string()));
        }
        if resistance.0 <= 0.0 {
            return Err(Rejection::NonPositiveResistance(resistance));
        }
        let conductance = resistance.recip();
        if !conductance.0.is_finite() {
            return Err(Rejection::InvalidResistance(resistance.0.to_string()));
        }
        Ok(Self { serial_number: serial_number.into(), resistance, conductance, origin_rank })
    }

    /// Parse the raw resistance field and build the cell.
    pub fn try_parse(
        serial_number: impl Into<String>,
        resistance: Option<&str>,
        origin_rank: usize,
    ) -> Result<Self, Rejection> {
        let resistance = resistance.map(str::trim).filter(|field| !field.is_empty());
        let Some(resistance) = resistance else {
            return Err(Rejection::MissingResistance);
        };
        let parsed = resistance
            .parse::<f64>()
            .map_err(|_| Rejection::InvalidResistance(resistance.to_string()))?;
        Self::try_new(serial_number, Ohms(parsed), origin_rank)
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub const fn resistance(&self) -> Ohms {
        self.resistance
    }

    pub const fn conductance(&self) -> Siemens {
        self.conductance
    }

    pub const fn origin_rank(&self) -> usize {
        self.origin_rank
    }
}
