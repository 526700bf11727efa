use log::{error, info};
use std::sync::Arc;

use posconv::prelude::{ConversionReport, ConversionStatus, Converter};

mod cli;
mod compression;

use cli::{Cli, CliError};

fn run(cli: &Cli) -> Result<ConversionReport, CliError> {
    let mut converter = Converter::new(cli.format())
        .with_filter(cli.filter()?)
        .with_style(cli.style()?);

    if let Some(geoid) = cli.geoid()? {
        converter = converter.with_geoid(Arc::new(geoid));
    }

    let (input, output) = (cli.input(), cli.output());
    info!("converting {} to {}", input.display(), output.display());
    let mut report = converter.convert(input, output)?;

    if cli.gzip() {
        report.output = compression::gzip(&report.output).map_err(CliError::Compression)?;
    }
    Ok(report)
}

fn main() {
    pretty_env_logger::init_timed();

    let cli = Cli::new();

    let status = match run(&cli) {
        Ok(report) => {
            info!(
                "{} generated ({} solutions)",
                report.output.display(),
                report.retained
            );
            ConversionStatus::Success
        },
        Err(e) => {
            error!("{}", e);
            e.status()
        },
    };
    std::process::exit(status.code());
}
