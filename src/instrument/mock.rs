use std::time::Duration;

use crate::{
    instrument::SourceMeter,
    prelude::*,
    quantity::{Zero, current::Amperes, resistance::Ohms, voltage::Volts},
};

/// Simulated source meter connected to an ideal cell: `V = OCV + I·R`, clipped at compliance.
#[must_use]
pub struct MockSourceMeter {
    open_circuit_voltage: Volts,
    internal_resistance: Ohms,
    current: Amperes,
    voltage_limit: Volts,
    is_output_on: bool,
}

impl MockSourceMeter {
    pub const fn new(open_circuit_voltage: Volts, internal_resistance: Ohms) -> Self {
        Self {
            open_circuit_voltage,
            internal_resistance,
            current: Amperes::ZERO,
            voltage_limit: open_circuit_voltage,
            is_output_on: false,
        }
    }

    /// Terminal voltage while sourcing the current, limited by the compliance voltage.
    fn terminal_voltage(&self, current: Amperes, voltage_limit: Volts) -> Volts {
        let voltage = self.open_circuit_voltage + current * self.internal_resistance;
        if current > Amperes::ZERO {
            voltage.min(voltage_limit)
        } else if current < Amperes::ZERO {
            voltage.max(voltage_limit)
        } else {
            voltage
        }
    }
}

impl SourceMeter for MockSourceMeter {
    async fn identify(&mut self) -> Result<String> {
        Ok("MOCK,SOURCE METER,0,0".to_string())
    }

    async fn measure_voltage(&mut self) -> Result<Volts> {
        if self.is_output_on {
            Ok(self.terminal_voltage(self.current, self.voltage_limit))
        } else {
            Ok(self.open_circuit_voltage)
        }
    }

    async fn source_current(&mut self, current: Amperes, voltage_limit: Volts) -> Result {
        self.current = current;
        self.voltage_limit = voltage_limit;
        Ok(())
    }

    async fn pulse_current(
        &mut self,
        current: Amperes,
        voltage_limit: Volts,
        _width: Duration,
    ) -> Result<Volts> {
        Ok(self.terminal_voltage(current, voltage_limit))
    }

    async fn output_on(&mut self) -> Result {
        self.is_output_on = true;
        Ok(())
    }

    async fn output_off(&mut self) -> Result {
        self.is_output_on = false;
        Ok(())
    }

    async fn beep_success(&mut self) -> Result {
        Ok(())
    }

    async fn close(&mut self) -> Result {
        self.output_off().await
    }
}
