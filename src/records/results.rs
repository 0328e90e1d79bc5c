use std::{fs::OpenOptions, path::PathBuf};

use csv::WriterBuilder;
use serde::Serialize;

use crate::{core::characterization::Characterization, prelude::*};

#[derive(Serialize)]
struct Row<'a> {
    #[serde(rename = "Serial Number")]
    serial_number: &'a str,

    #[serde(rename = "OCV (V)")]
    open_circuit_voltage: f64,

    #[serde(rename = "R0 (Ohm)")]
    r0: f64,

    #[serde(rename = "R0 Charge (Ohm)")]
    r0_charge: f64,

    #[serde(rename = "R0 Discharge (Ohm)")]
    r0_discharge: f64,

    #[serde(rename = "DCIR (Ohm)")]
    dcir: f64,

    #[serde(rename = "DCIR Charge (Ohm)")]
    dcir_charge: f64,

    #[serde(rename = "DCIR Discharge (Ohm)")]
    dcir_discharge: f64,
}

impl<'a> From<&'a Characterization> for Row<'a> {
    fn from(characterization: &'a Characterization) -> Self {
        Self {
            serial_number: &characterization.serial_number,
            open_circuit_voltage: characterization.open_circuit_voltage.0,
            r0: characterization.r0.mean().0,
            r0_charge: characterization.r0.charge.0,
            r0_discharge: characterization.r0.discharge.0,
            dcir: characterization.dcir.mean().0,
            dcir_charge: characterization.dcir.charge.0,
            dcir_discharge: characterization.dcir.discharge.0,
        }
    }
}

/// Append-only CSV log of the characterization results.
///
/// The header is written when the file is created or empty.
#[must_use]
pub struct ResultsFile {
    path: PathBuf,
}

impl ResultsFile {
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn append(&self, characterization: &Characterization) -> Result {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open `{}`", self.path.display()))?;
        let is_empty = file.metadata()?.len() == 0;
        let mut writer = WriterBuilder::new().has_headers(is_empty).from_writer(file);
        writer.serialize(Row::from(characterization))?;
        writer.flush()?;
        debug!(serial_number = %characterization.serial_number, "appended");
        Ok(())
    }
}
