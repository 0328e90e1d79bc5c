use std::{io::Write, path::PathBuf};

use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, stdin};

use crate::{
    core::characterization::Procedure,
    instrument::{SourceMeter, Terminals, keithley::Keithley2430, mock::MockSourceMeter},
    prelude::*,
    quantity::{current::Amperes, resistance::Ohms, voltage::Volts},
    records::results::ResultsFile,
};

#[derive(Parser)]
pub struct MeasureArgs {
    /// Results file, appended to if it exists.
    #[clap(env = "RESULTS_PATH")]
    output: PathBuf,

    /// SCPI socket address of the source meter.
    #[clap(long, env = "INSTRUMENT_ADDRESS", required_unless_present = "mock")]
    address: Option<String>,

    /// Simulate the instrument instead of connecting to it.
    #[clap(long, env = "MOCK")]
    mock: bool,

    /// Open-circuit voltage of the simulated cell.
    #[clap(long = "mock-voltage", env = "MOCK_VOLTAGE", default_value = "3.6")]
    mock_voltage: Volts,

    /// Internal resistance of the simulated cell.
    #[clap(long = "mock-resistance", env = "MOCK_RESISTANCE", default_value = "0.015")]
    mock_resistance: Ohms,

    #[clap(long, env = "TERMINALS", value_enum, default_value_t)]
    terminals: Terminals,

    /// Query the instrument identification and exit.
    #[clap(long)]
    test_connection: bool,

    #[clap(flatten)]
    procedure: ProcedureArgs,
}

#[derive(Parser)]
struct ProcedureArgs {
    #[clap(long = "charge-voltage-limit", env = "CHARGE_VOLTAGE_LIMIT", default_value = "4.2")]
    charge_voltage_limit: Volts,

    #[clap(
        long = "discharge-voltage-limit",
        env = "DISCHARGE_VOLTAGE_LIMIT",
        default_value = "2.5"
    )]
    discharge_voltage_limit: Volts,

    #[clap(long = "pulse-current", env = "PULSE_CURRENT", default_value = "10")]
    pulse_current: Amperes,

    #[clap(long = "pulse-width", env = "PULSE_WIDTH", default_value = "2500us")]
    pulse_width: humantime::Duration,

    #[clap(long = "dcir-current", env = "DCIR_CURRENT", default_value = "3")]
    dcir_current: Amperes,

    #[clap(long = "dcir-duration", env = "DCIR_DURATION", default_value = "10s")]
    dcir_duration: humantime::Duration,

    #[clap(long = "voltage-dwell", env = "VOLTAGE_DWELL", default_value = "100ms")]
    voltage_dwell: humantime::Duration,
}

impl From<&ProcedureArgs> for Procedure {
    fn from(args: &ProcedureArgs) -> Self {
        Self::builder()
            .charge_voltage_limit(args.charge_voltage_limit)
            .discharge_voltage_limit(args.discharge_voltage_limit)
            .pulse_current(args.pulse_current)
            .pulse_width(args.pulse_width.into())
            .dcir_current(args.dcir_current)
            .dcir_duration(args.dcir_duration.into())
            .voltage_dwell(args.voltage_dwell.into())
            .build()
    }
}

impl MeasureArgs {
    pub async fn run(&self) -> Result {
        if self.mock {
            info!("using the simulated instrument");
            let meter = MockSourceMeter::new(self.mock_voltage, self.mock_resistance);
            self.run_with(meter).await
        } else {
            let address = self.address.as_deref().context("instrument address is required")?;
            self.run_with(Keithley2430::connect(address, self.terminals).await?).await
        }
    }

    /// Run the session and release the instrument regardless of the outcome.
    async fn run_with<M: SourceMeter>(&self, mut meter: M) -> Result {
        let result = if self.test_connection {
            test_connection(&mut meter).await
        } else {
            self.scan(&mut meter).await
        };
        if let Err(error) = meter.close().await {
            warn!("failed to close the instrument: {error:#}");
        }
        result
    }

    #[instrument(skip_all, fields(output = %self.output.display()))]
    async fn scan<M: SourceMeter>(&self, meter: &mut M) -> Result {
        let procedure = Procedure::from(&self.procedure);
        let results = ResultsFile::new(self.output.clone());
        scan(meter, &procedure, &results, BufReader::new(stdin())).await
    }
}

/// Characterize the scanned cells until `q` or end of input.
///
/// A failed cell is logged, and the loop goes on with the output switched off.
async fn scan<M: SourceMeter, R: AsyncBufRead + Unpin>(
    meter: &mut M,
    procedure: &Procedure,
    results: &ResultsFile,
    reader: R,
) -> Result {
    let mut lines = reader.lines();
    loop {
        print!("Scan barcode (or 'q' to quit): ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let serial_number = line.trim();
        if serial_number.eq_ignore_ascii_case("q") {
            break;
        }
        if serial_number.is_empty() {
            continue;
        }
        match measure_cell(meter, procedure, results, serial_number).await {
            Ok(()) => println!("Test complete for {serial_number}, results saved."),
            Err(error) => {
                error!(serial_number, "failed to test the cell: {error:#}");
                if let Err(error) = meter.output_off().await {
                    warn!("failed to switch the output off: {error:#}");
                }
            }
        }
    }
    Ok(())
}

async fn measure_cell<M: SourceMeter>(
    meter: &mut M,
    procedure: &Procedure,
    results: &ResultsFile,
    serial_number: &str,
) -> Result {
    let characterization = procedure.run(meter, serial_number).await?;
    results.append(&characterization)?;
    meter.beep_success().await?;
    Ok(())
}

#[instrument(skip_all)]
async fn test_connection<M: SourceMeter>(meter: &mut M) -> Result {
    let id = meter.identify().await.context("connection test failed")?;
    meter.beep_success().await?;
    info!(%id, "connection successful");
    println!("Connection successful, instrument ID: {id}");
    Ok(())
}
