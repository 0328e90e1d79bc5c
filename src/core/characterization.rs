use std::time::Duration;

use bon::Builder;
use tokio::time::sleep;

use crate::{
    instrument::SourceMeter,
    prelude::*,
    quantity::{Zero, current::Amperes, resistance::Ohms, voltage::Volts},
};

/// Parameters of the cell characterization sequence.
#[must_use]
#[derive(Copy, Clone, Debug, Builder)]
pub struct Procedure {
    /// Compliance voltage while charging.
    #[builder(default = Volts(4.2))]
    pub charge_voltage_limit: Volts,

    /// Compliance voltage while discharging.
    #[builder(default = Volts(2.5))]
    pub discharge_voltage_limit: Volts,

    /// Current of the short pulses estimating `R0`.
    #[builder(default = Amperes(10.0))]
    pub pulse_current: Amperes,

    #[builder(default = Duration::from_micros(2500))]
    pub pulse_width: Duration,

    /// Sustained current of the DC internal resistance test.
    #[builder(default = Amperes(3.0))]
    pub dcir_current: Amperes,

    #[builder(default = Duration::from_secs(10))]
    pub dcir_duration: Duration,

    /// Settling time before the open-circuit voltage is measured.
    #[builder(default = Duration::from_millis(100))]
    pub voltage_dwell: Duration,
}

/// Internal resistance measured in both current directions.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Resistance {
    pub charge: Ohms,
    pub discharge: Ohms,
}

impl Resistance {
    pub fn mean(self) -> Ohms {
        (self.charge + self.discharge) / 2.0
    }
}

/// Characterization results of a single cell.
#[must_use]
#[derive(Clone, Debug)]
pub struct Characterization {
    pub serial_number: String,
    pub open_circuit_voltage: Volts,

    /// Ohmic resistance from the millisecond pulses.
    pub r0: Resistance,

    /// DC internal resistance from the sustained load.
    pub dcir: Resistance,
}

impl Procedure {
    /// Run the full sequence: open-circuit voltage, `R0` pulses and sustained DCIR load.
    #[instrument(skip_all, fields(serial_number = serial_number))]
    pub async fn run<M: SourceMeter>(
        &self,
        meter: &mut M,
        serial_number: &str,
    ) -> Result<Characterization> {
        info!("measuring the open-circuit voltage…");
        meter.source_current(Amperes::ZERO, self.charge_voltage_limit).await?;
        sleep(self.voltage_dwell).await;
        let open_circuit_voltage = meter.measure_voltage().await?;
        info!(?open_circuit_voltage);

        info!(current = ?self.pulse_current, width = ?self.pulse_width, "measuring R0…");
        let r0 = self.measure_pulse_resistance(meter).await?;
        info!(charge = ?r0.charge, discharge = ?r0.discharge, mean = ?r0.mean(), "R0");

        info!(current = ?self.dcir_current, duration = ?self.dcir_duration, "measuring DCIR…");
        let dcir = self.measure_sustained_resistance(meter).await?;
        info!(charge = ?dcir.charge, discharge = ?dcir.discharge, mean = ?dcir.mean(), "DCIR");

        Ok(Characterization {
            serial_number: serial_number.to_string(),
            open_circuit_voltage,
            r0,
            dcir,
        })
    }

    async fn measure_pulse_resistance<M: SourceMeter>(&self, meter: &mut M) -> Result<Resistance> {
        let idle_before_charge = meter.measure_voltage().await?;
        let charging = meter
            .pulse_current(self.pulse_current, self.charge_voltage_limit, self.pulse_width)
            .await?;
        let idle_before_discharge = meter.measure_voltage().await?;
        let discharging = meter
            .pulse_current(-self.pulse_current, self.discharge_voltage_limit, self.pulse_width)
            .await?;
        Ok(Resistance {
            charge: (charging - idle_before_charge) / self.pulse_current,
            discharge: (idle_before_discharge - discharging) / self.pulse_current,
        })
    }

    async fn measure_sustained_resistance<M: SourceMeter>(
        &self,
        meter: &mut M,
    ) -> Result<Resistance> {
        let idle_before_charge = meter.measure_voltage().await?;
        let charging =
            self.hold_current(meter, self.dcir_current, self.charge_voltage_limit).await?;
        let idle_before_discharge = meter.measure_voltage().await?;
        let discharging =
            self.hold_current(meter, -self.dcir_current, self.discharge_voltage_limit).await?;
        Ok(Resistance {
            charge: (charging - idle_before_charge) / self.dcir_current,
            discharge: (idle_before_discharge - discharging) / self.dcir_current,
        })
    }

    /// Source the current for the DCIR duration and return the loaded voltage.
    async fn hold_current<M: SourceMeter>(
        &self,
        meter: &mut M,
        current: Amperes,
        voltage_limit: Volts,
    ) -> Result<Volts> {
        meter.source_current(current, voltage_limit).await?;
        meter.output_on().await?;
        sleep(self.dcir_duration).await;
        let voltage = meter.measure_voltage().await;
        meter.output_off().await?;
        voltage
    }
}
