//! kvmhost CLI — provision an Apache CloudStack KVM host.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "kvmhost",
    version,
    about = "One-shot provisioning of an Apache CloudStack KVM host"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<kvmhost::cli::Commands>,
}

fn main() {
    let cli = Cli::parse();
    kvmhost::logging::init();
    if let Err(e) = kvmhost::cli::dispatch(cli.command.unwrap_or_default()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
