pub mod healthcheck;
pub mod sweep;

use clap::Parser;

/// Sweeps expired markdown files out of a vault folder on a schedule.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Probe the running server and exit non-zero when it is unhealthy
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub healthcheck: bool,
    /// Run a single sweep with the saved settings and exit
    #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "healthcheck")]
    pub sweep: bool,
    /// Address probed by --healthcheck, defaults to MDSWEEP_HOST:MDSWEEP_PORT
    #[arg(long)]
    pub check_bind: Option<String>,
}
