//! Source-measure units used to characterize the cells.

pub mod keithley;
pub mod mock;
mod reading;

use std::time::Duration;

use clap::ValueEnum;

use crate::{
    prelude::*,
    quantity::{current::Amperes, voltage::Volts},
};

/// Source-measure unit operations needed by the characterization procedure.
#[allow(async_fn_in_trait)]
pub trait SourceMeter {
    /// Query the instrument identification string.
    async fn identify(&mut self) -> Result<String>;

    async fn measure_voltage(&mut self) -> Result<Volts>;

    /// Configure a DC current source with the voltage compliance limit.
    ///
    /// The output must be switched on separately.
    async fn source_current(&mut self, current: Amperes, voltage_limit: Volts) -> Result;

    /// Run a single current pulse and return the voltage measured during the pulse.
    async fn pulse_current(
        &mut self,
        current: Amperes,
        voltage_limit: Volts,
        width: Duration,
    ) -> Result<Volts>;

    async fn output_on(&mut self) -> Result;

    async fn output_off(&mut self) -> Result;

    /// Give an audible confirmation.
    async fn beep_success(&mut self) -> Result;

    /// Switch the output off and release the connection.
    async fn close(&mut self) -> Result;
}

/// Instrument terminal set wired to the cell holder.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum Terminals {
    #[default]
    Front,
    Rear,
}
