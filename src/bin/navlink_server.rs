use std::{error::Error, net::SocketAddr, time::Duration};

use clap::Parser;
use navlink::protocol::CommServer;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Listen for incoming requests at address
    address: SocketAddr,
    /// Close a stalled connection after this many seconds
    #[arg(long)]
    read_timeout: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let timeout = cli.read_timeout.map(Duration::from_secs);
    let server = CommServer::new(cli.address, timeout)?;

    server.listen()?;
    Ok(())
}
