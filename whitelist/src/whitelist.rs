//! The whitelisting pass: connect, look up our address, inspect the
//! firewall, and allow the address if it is not already listed.

use anyhow::Result;
use std::fmt;
use std::net::IpAddr;
use tracing::{debug, info, warn};

use crate::config::FirewallConfig;
use crate::error::WhitelistError;
use crate::firewall;
use crate::public_ip::PublicIpLookup;
use crate::ssh::{Connector, RemoteShell};

/// Server address and root password taken from the command line.
#[derive(Clone)]
pub struct Credentials {
    pub host: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// First positional argument is the host, second the password. Anything
    /// after that is ignored.
    pub fn from_args<I>(args: I) -> Result<Self, WhitelistError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let host = args.next().unwrap_or_default();
        let password = args.next().unwrap_or_default();

        if host.trim().is_empty() {
            return Err(WhitelistError::MissingHost);
        }
        // Passwords are taken verbatim; only an absent one is rejected.
        if password.is_empty() {
            return Err(WhitelistError::MissingPassword);
        }

        Ok(Self {
            host: host.trim().to_string(),
            password,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    AlreadyAllowed { ip: IpAddr },
    Allowed { ip: IpAddr, command: String },
}

/// Run one whitelisting pass against the server in `creds`.
pub fn run<C, L>(
    creds: &Credentials,
    connector: &C,
    lookup: &L,
    config: &FirewallConfig,
) -> Result<Outcome>
where
    C: Connector,
    L: PublicIpLookup,
{
    let mut shell = connector.connect(creds)?;
    let result = whitelist_on(&mut shell, lookup, config);

    if let Err(e) = shell.close() {
        warn!("Failed to close session cleanly: {e:#}");
    }

    result
}

fn whitelist_on<S, L>(shell: &mut S, lookup: &L, config: &FirewallConfig) -> Result<Outcome>
where
    S: RemoteShell,
    L: PublicIpLookup,
{
    let ip = lookup.lookup()?;
    info!("Current public IP: {ip}");

    let status = shell.exec(&config.status_command)?;
    debug!("`{}` exited with {}", config.status_command, status.exit_status);
    if !status.stderr.trim().is_empty() {
        return Err(WhitelistError::StatusQuery(status.stderr.trim().to_string()).into());
    }

    info!("Current firewall status:\n{}", status.stdout.trim_end());
    if firewall::is_inactive(&status.stdout) {
        warn!("Firewall is inactive; rules will not be enforced until it is enabled");
    }
    for rule in firewall::parse_ufw_status(&status.stdout) {
        debug!("rule: {} {:?} from {}", rule.to, rule.action, rule.from);
    }

    if firewall::is_whitelisted(&status.stdout, &ip) {
        info!("{ip} is already whitelisted");
        return Ok(Outcome::AlreadyAllowed { ip });
    }

    info!("{ip} is not whitelisted, allowing it");
    let command = firewall::allow_command(&config.allow_command, &ip);
    let output = shell.exec(&command)?;
    if !output.stderr.trim().is_empty() {
        warn!("Allow command reported: {}", output.stderr.trim());
    } else if !output.stdout.trim().is_empty() {
        info!("{}", output.stdout.trim());
    }

    Ok(Outcome::Allowed { ip, command })
}
