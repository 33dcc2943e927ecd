//! Reelpush CLI: compress a video with ffmpeg, then publish it as a Webflow asset.
//!
//! Set WEBFLOW_API_TOKEN and SITE_ID (a `.env` file is read if present).

use std::io;
use std::process::ExitCode;

use clap::Parser;
use reelpush_cli::{init_tracing, normalize_args, run, Cli};
use reelpush_core::Config;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse_from(normalize_args(std::env::args()));

    let stdin = io::stdin();
    let code = run(
        &cli,
        Config::from_env,
        &mut stdin.lock(),
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .await;
    ExitCode::from(code)
}
