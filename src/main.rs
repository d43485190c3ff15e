use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::PathBuf;
use std::time::Duration;
use tokio::{signal, task, time::sleep};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use ut61e_lib::constants::{BAUD_RATE, READ_RETRIES};
use ut61e_lib::serial::list_ports;
use ut61e_lib::{Measurement, SerialConfig, Transport, Ut61e};

/// Reads a UNI-T UT61E over its serial cable and prints every measurement.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Serial port of the meter's cable (defaults to COM3 on Windows, /dev/ttyUSB0 elsewhere)
    port: Option<String>,
    /// Baud rate of the cable.
    #[arg(long, default_value_t = BAUD_RATE)]
    baud: u32,
    /// Timeout of one read attempt in milliseconds. On Ctrl+C the read in progress still runs to its end.
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,
    /// Read attempts per cycle before reporting no reading.
    #[arg(long, default_value_t = READ_RETRIES)]
    retries: usize,
    /// Pause between cycles in milliseconds.
    #[arg(short, long, default_value_t = 250)]
    interval_ms: u64,
    /// Stop after this many cycles instead of running until Ctrl+C.
    #[arg(short = 'n', long)]
    samples: Option<u32>,
    /// Also print the value in base units (V, A, Ohm, F, Hz).
    #[arg(long)]
    normalized: bool,
    /// Print the raw frame as hex instead of decoding it.
    #[arg(long, conflicts_with = "json")]
    raw: bool,
    /// Print one JSON object per cycle.
    #[arg(long)]
    json: bool,
    /// List available serial ports and exit.
    #[arg(long)]
    list_ports: bool,
    /// Also write logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

impl Cli {
    fn serial_config(&self) -> SerialConfig {
        let mut config = match &self.port {
            Some(port) => SerialConfig::new(port.clone()),
            None => SerialConfig::default(),
        };
        config.baud_rate = self.baud;
        config.timeout = Duration::from_millis(self.timeout_ms);
        config.retries = self.retries;
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(&cli)?;

    if cli.list_ports {
        for port in list_ports().context("Failed to list serial ports")? {
            println!("{}", port);
        }
        return Ok(());
    }

    tokio::select! {
        res = run(cli) => res?,
        _ = signal::ctrl_c() => {
            info!("Ctrl+C received, exiting UT61E monitor.");
        }
    }
    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::builder()
        .with_default_directive(cli.verbose.tracing_level_filter().into())
        .from_env_lossy();

    let (file_layer, guard) = match &cli.log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let name = path.file_name().context("--log-file must name a file")?;
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.serial_config();
    debug!(?config, "Serial configuration");
    let mut dmm =
        Ut61e::open(&config).with_context(|| format!("Failed to open UT61E on {}", config.port))?;

    info!("Starting UT61E monitor...");
    let mut cycle = 0u32;
    while cli.samples.is_none_or(|n| cycle < n) {
        cycle += 1;

        let (returned, sample) = read_cycle(dmm, cli.raw).await?;
        dmm = returned;
        match sample {
            Sample::Raw(hex) => {
                println!("{}\t{}", Local::now(), if hex.is_empty() { "-" } else { hex.as_str() });
            }
            Sample::Decoded(measurement) => report(&cli, measurement.as_ref())?,
        }

        sleep(Duration::from_millis(cli.interval_ms)).await;
    }

    info!(cycles = cycle, "Finished polling.");
    Ok(())
}

#[derive(Debug)]
enum Sample {
    Raw(String),
    Decoded(Option<Measurement>),
}

/// Runs one blocking read cycle on the blocking pool so the runtime keeps
/// serving Ctrl+C, then hands the device back.
async fn read_cycle<T>(mut dmm: Ut61e<T>, raw: bool) -> Result<(Ut61e<T>, Sample)>
where
    T: Transport + Send + 'static,
{
    let (dmm, sample) = task::spawn_blocking(move || {
        let sample = if raw {
            dmm.read_hex_str_data().map(Sample::Raw)
        } else {
            dmm.get_measurement().map(Sample::Decoded)
        };
        (dmm, sample)
    })
    .await
    .context("Read task panicked")?;

    Ok((dmm, sample?))
}

fn report(cli: &Cli, measurement: Option<&Measurement>) -> Result<()> {
    let now = Local::now();

    if cli.json {
        let line = serde_json::json!({
            "timestamp": now.to_rfc3339(),
            "measurement": measurement,
            "normalized": measurement.and_then(|m| m.normalized()),
        });
        println!("{}", serde_json::to_string(&line)?);
        return Ok(());
    }

    println!();
    println!("{}", now);
    match measurement {
        Some(m) => println!("{}", m.to_readable(cli.normalized)),
        None => println!("UT61E is not connected."),
    }
    Ok(())
}
