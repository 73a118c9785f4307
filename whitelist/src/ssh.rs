//! Remote command execution over SSH with password authentication

use anyhow::{Context, Result};
use ssh2::{HashType, Session};
use std::io::{self, Read};
use std::net::{TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::SshConfig;
use crate::whitelist::Credentials;

/// Captured result of one remote command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: i32,
}

/// A shell session able to run commands on the remote host.
pub trait RemoteShell {
    fn exec(&mut self, command: &str) -> Result<CommandOutput>;

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Opens a [`RemoteShell`] for a set of credentials.
pub trait Connector {
    type Shell: RemoteShell;

    fn connect(&self, creds: &Credentials) -> Result<Self::Shell>;
}

pub struct SshConnector {
    config: SshConfig,
}

impl SshConnector {
    pub fn new(config: &SshConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl Connector for SshConnector {
    type Shell = SshShell;

    fn connect(&self, creds: &Credentials) -> Result<SshShell> {
        let timeout = Duration::from_secs(self.config.connect_timeout_seconds);
        let addr = (creds.host.as_str(), self.config.port)
            .to_socket_addrs()
            .with_context(|| format!("Failed to resolve {}", creds.host))?
            .next()
            .with_context(|| format!("No address found for {}", creds.host))?;

        let tcp = TcpStream::connect_timeout(&addr, timeout)
            .with_context(|| format!("Failed to connect to {addr}"))?;

        let mut session = Session::new().context("Failed to create SSH session")?;
        session.set_tcp_stream(tcp);
        session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));
        session.handshake().context("SSH handshake failed")?;

        // Host keys are accepted without verification; the fingerprint is
        // only logged.
        if let Some(hash) = session.host_key_hash(HashType::Sha256) {
            debug!("Host key SHA256 fingerprint: {}", hex(hash));
        }

        session
            .userauth_password(&self.config.username, &creds.password)
            .with_context(|| {
                format!("Password authentication failed for {}", self.config.username)
            })?;
        if !session.authenticated() {
            anyhow::bail!("SSH authentication was rejected by {}", creds.host);
        }

        info!("Connected to {}@{addr}", self.config.username);
        Ok(SshShell { session, timeout })
    }
}

pub struct SshShell {
    session: Session,
    timeout: Duration,
}

impl RemoteShell for SshShell {
    fn exec(&mut self, command: &str) -> Result<CommandOutput> {
        let mut channel = self
            .session
            .channel_session()
            .context("Failed to open SSH channel")?;
        channel
            .exec(command)
            .with_context(|| format!("Failed to execute remote command: {command}"))?;

        // stdout and stderr share one flow-control window, so both are
        // drained together in non-blocking mode.
        self.session.set_blocking(false);
        let drained = drain_streams(
            &mut channel.stream(0),
            &mut channel.stderr(),
            Instant::now() + self.timeout,
        );
        self.session.set_blocking(true);
        let (stdout, stderr) =
            drained.with_context(|| format!("Failed to read output of: {command}"))?;

        channel.wait_close().context("Failed to close SSH channel")?;
        let exit_status = channel.exit_status().unwrap_or(-1);

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&stdout).to_string(),
            stderr: String::from_utf8_lossy(&stderr).to_string(),
            exit_status,
        })
    }

    fn close(&mut self) -> Result<()> {
        self.session
            .disconnect(None, "bye", None)
            .context("Failed to disconnect SSH session")
    }
}

/// Read both streams to EOF, alternating between them so neither can starve
/// the other. `WouldBlock` counts as "nothing yet".
fn drain_streams<O: Read, E: Read>(
    stdout: &mut O,
    stderr: &mut E,
    deadline: Instant,
) -> io::Result<(Vec<u8>, Vec<u8>)> {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut out_done = false;
    let mut err_done = false;
    let mut buf = [0u8; 8192];

    while !(out_done && err_done) {
        let mut progressed = false;

        for (reader, sink, done) in [
            (&mut *stdout as &mut dyn Read, &mut out, &mut out_done),
            (&mut *stderr as &mut dyn Read, &mut err, &mut err_done),
        ] {
            if *done {
                continue;
            }
            match reader.read(&mut buf) {
                Ok(0) => *done = true,
                Ok(n) => {
                    sink.extend_from_slice(&buf[..n]);
                    progressed = true;
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }

        if !progressed && !(out_done && err_done) {
            if Instant::now() >= deadline {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "timed out waiting for remote command output",
                ));
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    Ok((out, err))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
