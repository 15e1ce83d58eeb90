extern crate env_logger;
#[macro_use]
extern crate log;

use anyhow::Result;
use clap::Parser;

use seqpack::io::{self, EncodeOptions};
use seqpack::unit::FormatOptions;

mod cli;

use cli::Cli;

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_target(false)
        .init();

    info!("seqpack v{}", cli::VERSION);

    let format = FormatOptions {
        line_width: cli.line_width,
        strict_version: cli.strict_version,
        ..FormatOptions::default()
    };

    match &cli.output {
        // two paths: unit -> FASTA
        Some(output) => {
            io::decode_unit(&cli.input, output, &format)?;
        }
        // one path: FASTA -> one unit per record
        None => {
            let opts = EncodeOptions {
                format,
                symbols: cli.symbols,
                on_error: cli.on_error,
                out_dir: cli.out_dir.clone(),
            };
            let summary = io::encode_fasta(&cli.input, &opts)?;

            if let Some(report) = &cli.report {
                io::write_report(&summary, report)?;
                info!("Wrote report to {}", report.display());
            }
        }
    };

    info!("Completed successfully.");
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
