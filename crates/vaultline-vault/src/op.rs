//! [`VaultSession`] backed by the 1Password `op` command-line tool.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use tracing::{debug, info, warn};
use vaultline_config::VaultSection;
use vaultline_core::{Cursor, Event};
use zeroize::Zeroizing;

use crate::error::{VaultError, VaultResult};
use crate::parse::{parse_events, parse_users};
use crate::process::{CommandOutput, run_with_timeout};
use crate::session::{VaultSession, VaultUser};

/// Where `op` is expected when it is neither configured nor on `PATH`.
pub const DEFAULT_OP_PATH: &str = "/usr/local/bin/op";

/// Account credentials used for `op signin`.
pub struct Credentials {
    /// Sign-in address.
    pub domain: String,
    /// Account email.
    pub email: String,
    /// Account secret key.
    pub secret: Zeroizing<String>,
    /// Account passphrase, written to the tool's stdin.
    pub passphrase: Zeroizing<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("domain", &self.domain)
            .field("email", &self.email)
            .field("secret", &"[REDACTED]")
            .field("passphrase", &"[REDACTED]")
            .finish()
    }
}

/// A session driven through `op` subprocesses.
///
/// The session token returned by `op signin --raw` lives only in this
/// struct and is passed to each query with `--session`.
pub struct OpCliSession {
    binary: PathBuf,
    credentials: Credentials,
    session_name: String,
    timeout: Duration,
    token: Option<Zeroizing<String>>,
}

impl std::fmt::Debug for OpCliSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpCliSession")
            .field("binary", &self.binary)
            .field("credentials", &self.credentials)
            .field("session_name", &self.session_name)
            .field("timeout", &self.timeout)
            .field("signed_in", &self.token.is_some())
            .finish()
    }
}

impl OpCliSession {
    /// Create a session for the given binary and account.
    #[must_use]
    pub fn new(
        binary: impl Into<PathBuf>,
        credentials: Credentials,
        session_name: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            binary: binary.into(),
            credentials,
            session_name: session_name.into(),
            timeout,
            token: None,
        }
    }

    /// Build a session from the `[vault]` config section.
    #[must_use]
    pub fn from_config(vault: &VaultSection) -> Self {
        let credentials = Credentials {
            domain: vault.domain.clone(),
            email: vault.email.clone(),
            secret: Zeroizing::new(vault.secret.clone()),
            passphrase: Zeroizing::new(vault.passphrase.clone()),
        };
        Self::new(
            resolve_binary(vault.binary.as_deref()),
            credentials,
            vault.session_name.clone(),
            Duration::from_secs(vault.command_timeout_secs),
        )
    }

    /// Path of the `op` binary this session runs.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Whether a session token is currently held.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    fn run(&self, label: &str, args: &[&str], input: Option<&[u8]>) -> VaultResult<CommandOutput> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        run_with_timeout(cmd, label, input, self.timeout)
    }

    fn query(&self, label: &str, args: &[&str]) -> VaultResult<Vec<u8>> {
        let token = self.token.as_ref().ok_or(VaultError::NotSignedIn)?;
        let mut full: Vec<&str> = args.to_vec();
        full.extend(["--session", token.as_str()]);

        let output = self.run(label, &full, None)?;
        if !output.status.success() {
            return Err(VaultError::CommandFailed {
                command: label.to_owned(),
                stderr: output.stderr_text(),
            });
        }
        Ok(output.stdout)
    }
}

impl VaultSession for OpCliSession {
    fn sign_in(&mut self) -> VaultResult<()> {
        let args = [
            "signin",
            self.credentials.domain.as_str(),
            self.credentials.email.as_str(),
            self.credentials.secret.as_str(),
            "--raw",
            "--shorthand",
            self.session_name.as_str(),
        ];
        let mut input = Zeroizing::new(self.credentials.passphrase.as_bytes().to_vec());
        input.push(b'\n');

        let output = self.run("op signin", &args, Some(&input))?;
        if !output.status.success() {
            return Err(VaultError::AuthenticationFailed(output.stderr_text()));
        }

        let stdout = Zeroizing::new(output.stdout);
        let token = String::from_utf8_lossy(&stdout).trim().to_owned();
        if token.is_empty() {
            return Err(VaultError::AuthenticationFailed(
                "sign-in returned no session token".to_owned(),
            ));
        }

        self.token = Some(Zeroizing::new(token));
        debug!(session = %self.session_name, "signed in to vault");
        Ok(())
    }

    fn list_users(&mut self) -> VaultResult<Vec<VaultUser>> {
        let stdout = self.query("op list users", &["list", "users"])?;
        parse_users(&stdout)
    }

    fn list_events(&mut self, cursor: &Cursor) -> VaultResult<Vec<Event>> {
        let stdout = match cursor.event_id() {
            Some(id) => self.query(
                "op list events",
                &["list", "events", "--older", "--eventid", id.as_str()],
            )?,
            None => self.query("op list events", &["list", "events"])?,
        };
        parse_events(&stdout)
    }

    fn sign_out(&mut self) -> VaultResult<()> {
        if self.token.is_none() {
            return Ok(());
        }
        let result = self.query(
            "op signout",
            &[
                "signout",
                "--account",
                self.session_name.as_str(),
                "--forget",
            ],
        );
        // Forget the token even when sign-out fails.
        self.token = None;
        result?;
        info!(session = %self.session_name, "signed out of vault");
        Ok(())
    }
}

/// Pick the `op` binary: explicit path, then `PATH`, then [`DEFAULT_OP_PATH`].
#[must_use]
pub fn resolve_binary(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured.filter(|p| !p.as_os_str().is_empty()) {
        return path.to_path_buf();
    }
    match which::which("op") {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, fallback = DEFAULT_OP_PATH, "op not found on PATH");
            PathBuf::from(DEFAULT_OP_PATH)
        },
    }
}
