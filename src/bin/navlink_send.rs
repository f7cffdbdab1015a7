use std::error::Error;

use clap::Parser;
use navlink::{
    Endpoints, Level, Message, Target,
    protocol::{DispatchOutcome, Dispatcher},
};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Datagram endpoint of the interface, host:port
    #[arg(long)]
    interface: String,
    /// Stream endpoint of the AutoNav server, host:port
    #[arg(long)]
    server: String,
    /// Destination subsystem
    #[arg(long, value_enum)]
    target: Target,
    /// Severity of the action
    #[arg(long, value_enum, default_value = "info")]
    level: Level,
    /// Title of the action
    title: String,
    /// Command or action to execute
    body: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let endpoints = Endpoints::resolve(&cli.interface, &cli.server)?;
    let dispatcher = Dispatcher::new(endpoints);

    let message = Message::new(cli.target, cli.level, cli.title, cli.body);
    match dispatcher.dispatch(&message)? {
        DispatchOutcome::Sent => println!("message dispatched to interface"),
        DispatchOutcome::Answered(resp) => println!("{}: {}", resp.code, resp.body),
    }

    Ok(())
}
