use std::str::FromStr;

use crate::{
    prelude::*,
    quantity::{current::Amperes, resistance::Ohms, voltage::Volts},
};

/// Measurement reported by the instrument: `voltage,current,resistance,timestamp,status`.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Reading {
    pub voltage: Volts,
    pub current: Amperes,
    pub resistance: Ohms,

    /// Instrument timestamp, seconds.
    pub timestamp: f64,

    /// Status word as reported.
    pub status: f64,
}

impl FromStr for Reading {
    type Err = Error;

    fn from_str(response: &str) -> Result<Self> {
        // Serial links occasionally leave control characters in the buffer:
        let cleaned: String =
            response.chars().filter(|char_| char_.is_ascii_graphic() || *char_ == ' ').collect();
        let fields: Vec<f64> = cleaned
            .split(',')
            .map(|field| {
                field
                    .trim()
                    .parse::<f64>()
                    .with_context(|| format!("invalid reading field `{field}` in `{cleaned}`"))
            })
            .collect::<Result<_>>()?;
        let [voltage, current, resistance, timestamp, status] = fields[..] else {
            bail!("expected 5 fields in the reading, got {}: `{cleaned}`", fields.len());
        };
        Ok(Self {
            voltage: Volts(voltage),
            current: Amperes(current),
            resistance: Ohms(resistance),
            timestamp,
            status,
        })
    }
}
