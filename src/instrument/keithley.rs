use std::time::Duration;

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufStream},
    net::TcpStream,
    time::timeout,
};

use crate::{
    instrument::{SourceMeter, Terminals, reading::Reading},
    prelude::*,
    quantity::{current::Amperes, voltage::Volts},
};

/// Keithley 2430 pulse source meter speaking SCPI over a line-oriented byte stream.
pub struct Keithley2430<S> {
    stream: BufStream<S>,
}

impl Keithley2430<TcpStream> {
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connect to the instrument via a raw SCPI socket, for example, a LAN-to-GPIB gateway.
    #[instrument(skip_all, fields(address = address))]
    pub async fn connect(address: &str, terminals: Terminals) -> Result<Self> {
        let stream = timeout(Self::CONNECT_TIMEOUT, TcpStream::connect(address))
            .await
            .with_context(|| format!("timed out connecting to `{address}`"))?
            .with_context(|| format!("failed to connect to `{address}`"))?;
        stream.set_nodelay(true)?;
        info!("connected");
        Self::initialize(stream, terminals).await
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Keithley2430<S> {
    const READ_TIMEOUT: Duration = Duration::from_secs(30);

    /// Reset the instrument and select 4-wire sensing on the requested terminals.
    pub async fn initialize(stream: S, terminals: Terminals) -> Result<Self> {
        let mut this = Self { stream: BufStream::new(stream) };
        this.write("*RST").await?;
        this.write(":SYST:RSEN ON").await?;
        this.write(match terminals {
            Terminals::Front => ":ROUT:TERM FRONT",
            Terminals::Rear => ":ROUT:TERM REAR",
        })
        .await?;
        Ok(this)
    }

    async fn write(&mut self, command: &str) -> Result {
        trace!(command, "writing…");
        self.stream.write_all(command.as_bytes()).await?;
        self.stream.write_all(b"\n").await?;
        self.stream.flush().await.with_context(|| format!("failed to send `{command}`"))
    }

    async fn query(&mut self, command: &str) -> Result<String> {
        self.write(command).await?;
        let mut response = Vec::new();
        let n_bytes = timeout(Self::READ_TIMEOUT, self.stream.read_until(b'\n', &mut response))
            .await
            .with_context(|| format!("timed out waiting for a response to `{command}`"))??;
        ensure!(n_bytes != 0, "connection closed while waiting for a response to `{command}`");
        let response = String::from_utf8_lossy(&response).into_owned();
        trace!(command, %response, "queried");
        Ok(response)
    }

    async fn query_reading(&mut self, command: &str) -> Result<Reading> {
        let reading: Reading = self.query(command).await?.parse()?;
        debug!(
            command,
            voltage = ?reading.voltage,
            current = ?reading.current,
            resistance = ?reading.resistance,
            timestamp = reading.timestamp,
            status = reading.status,
            "reading",
        );
        Ok(reading)
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> SourceMeter for Keithley2430<S> {
    async fn identify(&mut self) -> Result<String> {
        Ok(self.query("*IDN?").await?.trim().to_string())
    }

    async fn measure_voltage(&mut self) -> Result<Volts> {
        self.write(":SOUR:FUNC:SHAP DC").await?;
        Ok(self.query_reading(":MEAS:VOLT?").await?.voltage)
    }

    async fn source_current(&mut self, current: Amperes, voltage_limit: Volts) -> Result {
        self.write(":SOUR:FUNC:SHAP DC").await?;
        self.write(":SOUR:FUNC CURR").await?;
        self.write(&format!(":SOUR:CURR {}", current.0)).await?;
        self.write(&format!(":SENS:VOLT:PROT {}", voltage_limit.0)).await
    }

    async fn pulse_current(
        &mut self,
        current: Amperes,
        voltage_limit: Volts,
        width: Duration,
    ) -> Result<Volts> {
        self.write(":SOUR:FUNC:SHAP PULS").await?;
        self.write(":SOUR:FUNC:MODE CURR").await?;
        self.write(":SENS:VOLT:RANG 20").await?;
        self.write(&format!(":SOUR:CURR:LEV {}", current.0)).await?;
        self.write(&format!(":SENS:VOLT:PROT {}", voltage_limit.0)).await?;
        self.write(":SENS:FUNC \"VOLT\"").await?;
        self.write(&format!(":SOUR:PULS:WIDT {}", width.as_secs_f64())).await?;
        self.write(":SOUR:PULS:DEL 0").await?;

        // Exactly one pulse, the output is switched on and off by the instrument:
        self.write(":TRIG:CLE").await?;
        self.write(":ARM:COUN 1").await?;
        self.write(":TRIG:COUN 1").await?;
        Ok(self.query_reading(":READ?").await?.voltage)
    }

    async fn output_on(&mut self) -> Result {
        self.write(":OUTP ON").await
    }

    async fn output_off(&mut self) -> Result {
        self.write(":OUTP OFF").await
    }

    async fn beep_success(&mut self) -> Result {
        self.write(":SYST:BEEP:IMM 1400, 0.1").await?;
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.write(":SYST:BEEP:IMM 2000, 0.05").await?;
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(())
    }

    async fn close(&mut self) -> Result {
        let output_off = self.output_off().await;
        let shutdown = self.stream.shutdown().await.context("failed to close the connection");
        output_off.and(shutdown)
    }
}
