use std::process;

use anyhow::Result;
use clap::Parser;

use intlang_cli::cli::Args;
use intlang_cli::cli::commands::setup::{self, SetupOptions};
use intlang_cli::output::{self, OutputConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::try_parse().unwrap_or_else(|err| {
        // Bad invocations exit 1; --help and --version exit 0.
        let code = i32::from(err.use_stderr());
        let _ = err.print();
        process::exit(code);
    });

    output::init(OutputConfig { quiet: args.quiet });

    setup::run_setup(SetupOptions {
        domain: args.domain,
    })
    .await
}
