use std::io;

use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audio_converter_core::{
    ConversionDriver, ConversionRequest, ConverterConfig, DriverError, FfmpegEncoder,
};

const USAGE: &str = "Usage: audio-converter <input-file> <output-file>
Example: audio-converter input.wav output.mp3";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Logs go to stderr so the progress output on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run().await {
        report_error(&e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let request = ConversionRequest::from_args(std::env::args_os().skip(1))?;

    let config = ConverterConfig::default();
    debug!(?config, "Encoder configuration");

    let driver = ConversionDriver::new(FfmpegEncoder::new(config));
    let summary = driver.convert(&request, &mut io::stdout()).await?;

    info!(
        format = summary.format.extension(),
        elapsed_ms = summary.elapsed.as_millis() as u64,
        input_size = summary.input_size,
        output_size = summary.output_size,
        "Conversion finished"
    );
    Ok(())
}

/// Prints a failure the way the user should see it.
fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<DriverError>() {
        Some(DriverError::Usage { .. }) => eprintln!("{}", USAGE),
        Some(driver_err) if driver_err.is_validation() => eprintln!("Error: {}", driver_err),
        Some(DriverError::Encoding(encoder_err)) => {
            debug!("Conversion failed: {}", encoder_err);
            // ffmpeg diagnostics were already shown as they arrived
            eprintln!("\nError during conversion: {}", encoder_err);
            eprintln!("{:?}", err);
        }
        _ => {
            debug!("Fatal error: {}", err);
            eprintln!("\nUnexpected error: {}", err);
            eprintln!("{:?}", err);
        }
    }
}
