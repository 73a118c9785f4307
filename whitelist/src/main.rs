//! whitelist-ip — allow the caller's public IP through a server's ufw firewall
//!
//! Usage: `whitelist-ip <server_host> <root_password>`
//!
//! Logs in over SSH, checks `ufw status` for the current public address and
//! adds an allow rule when the address is not listed yet.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod firewall;
mod public_ip;
mod ssh;
mod whitelist;

use crate::public_ip::HttpLookup;
use crate::ssh::SshConnector;
use crate::whitelist::{Credentials, Outcome};

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("whitelist-ip failed: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let creds = match Credentials::from_args(std::env::args().skip(1)) {
        Ok(creds) => creds,
        Err(e) if e.is_usage() => {
            eprintln!("{e}");
            eprintln!("usage: whitelist-ip <server_host> <root_password>");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    info!("Target server: {}", creds.host);

    let config = config::load_config()?;
    let connector = SshConnector::new(&config.ssh);
    let lookup = HttpLookup::new(&config.lookup);

    match whitelist::run(&creds, &connector, &lookup, &config.firewall)? {
        Outcome::AlreadyAllowed { ip } => println!("{ip} is already whitelisted"),
        Outcome::Allowed { ip, command } => println!("{ip} whitelisted ({command})"),
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact()
        .init();
}
