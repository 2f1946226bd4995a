//! Mock implementations for testing.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use vaultline_core::{Cursor, Event};
use vaultline_publish::{Forwarder, PublishError, PublishReceipt, PublishResult};
use vaultline_vault::{VaultError, VaultResult, VaultSession, VaultUser};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// One call made against a [`MockVaultSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultCall {
    /// `sign_in`.
    SignIn,
    /// `list_users`.
    ListUsers,
    /// `list_events` with the cursor it was given.
    ListEvents(Cursor),
    /// `sign_out`.
    SignOut,
}

#[derive(Debug)]
enum ScriptedPage {
    Events(Vec<Event>),
    Malformed(String),
}

#[derive(Debug, Default)]
struct VaultState {
    users: Vec<VaultUser>,
    pages: VecDeque<ScriptedPage>,
    calls: Vec<VaultCall>,
    signed_in: bool,
    sign_ins: usize,
    fail_sign_in_at: Option<usize>,
    fail_sign_out: bool,
}

/// Scripted implementation of [`VaultSession`].
///
/// Pages are served in the order they were added, one per `list_events`
/// call; once the script runs out every further call gets an empty page.
/// Clones share state, so a test can keep one handle to inspect the call
/// log while the code under test owns another.
#[derive(Debug, Clone, Default)]
pub struct MockVaultSession {
    state: Arc<Mutex<VaultState>>,
}

impl MockVaultSession {
    /// Create a mock with no users and no events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user listing.
    #[must_use]
    pub fn with_users(self, users: impl IntoIterator<Item = VaultUser>) -> Self {
        lock(&self.state).users = users.into_iter().collect();
        self
    }

    /// Queue a page of events.
    #[must_use]
    pub fn with_page(self, events: impl IntoIterator<Item = Event>) -> Self {
        lock(&self.state)
            .pages
            .push_back(ScriptedPage::Events(events.into_iter().collect()));
        self
    }

    /// Queue a page that fails to parse.
    #[must_use]
    pub fn with_malformed_page(self, reason: impl Into<String>) -> Self {
        lock(&self.state)
            .pages
            .push_back(ScriptedPage::Malformed(reason.into()));
        self
    }

    /// Make the `n`th sign-in (1-based) fail authentication.
    #[must_use]
    pub fn fail_sign_in_at(self, n: usize) -> Self {
        lock(&self.state).fail_sign_in_at = Some(n);
        self
    }

    /// Make sign-out fail.
    #[must_use]
    pub fn fail_sign_out(self) -> Self {
        lock(&self.state).fail_sign_out = true;
        self
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<VaultCall> {
        lock(&self.state).calls.clone()
    }

    /// Cursors passed to `list_events`, in order.
    #[must_use]
    pub fn cursors(&self) -> Vec<Cursor> {
        lock(&self.state)
            .calls
            .iter()
            .filter_map(|call| match call {
                VaultCall::ListEvents(cursor) => Some(cursor.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of times `call` was made.
    #[must_use]
    pub fn count(&self, call: &VaultCall) -> usize {
        lock(&self.state)
            .calls
            .iter()
            .filter(|c| std::mem::discriminant(*c) == std::mem::discriminant(call))
            .count()
    }

    /// Whether the mock currently considers itself signed in.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        lock(&self.state).signed_in
    }
}

impl VaultSession for MockVaultSession {
    fn sign_in(&mut self) -> VaultResult<()> {
        let mut state = lock(&self.state);
        state.calls.push(VaultCall::SignIn);
        state.sign_ins = state.sign_ins.saturating_add(1);
        if state.fail_sign_in_at == Some(state.sign_ins) {
            state.signed_in = false;
            return Err(VaultError::AuthenticationFailed(
                "[ERROR] invalid credentials".to_owned(),
            ));
        }
        state.signed_in = true;
        Ok(())
    }

    fn list_users(&mut self) -> VaultResult<Vec<VaultUser>> {
        let mut state = lock(&self.state);
        state.calls.push(VaultCall::ListUsers);
        if !state.signed_in {
            return Err(VaultError::NotSignedIn);
        }
        Ok(state.users.clone())
    }

    fn list_events(&mut self, cursor: &Cursor) -> VaultResult<Vec<Event>> {
        let mut state = lock(&self.state);
        state.calls.push(VaultCall::ListEvents(cursor.clone()));
        if !state.signed_in {
            return Err(VaultError::NotSignedIn);
        }
        match state.pages.pop_front() {
            Some(ScriptedPage::Events(events)) => Ok(events),
            Some(ScriptedPage::Malformed(reason)) => Err(VaultError::MalformedResponse(reason)),
            None => Ok(Vec::new()),
        }
    }

    fn sign_out(&mut self) -> VaultResult<()> {
        let mut state = lock(&self.state);
        state.calls.push(VaultCall::SignOut);
        let was_signed_in = std::mem::replace(&mut state.signed_in, false);
        if state.fail_sign_out && was_signed_in {
            return Err(VaultError::CommandFailed {
                command: "op signout".to_owned(),
                stderr: "[ERROR] session not found".to_owned(),
            });
        }
        Ok(())
    }
}

/// Scripted result for one [`RecordingForwarder::forward`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardScript {
    /// Answer 200 and keep the file.
    Deliver,
    /// Answer 200 and delete the file.
    DeliverAndRemove,
    /// Answer with a non-200 status.
    Reject(u16),
    /// Fail with an error instead of a response.
    Fail,
}

#[derive(Debug, Default)]
struct ForwarderState {
    script: VecDeque<ForwardScript>,
    default: Option<ForwardScript>,
    forwarded: Vec<(PathBuf, Vec<u8>)>,
}

/// [`Forwarder`] that records every file it is given.
///
/// Scripted outcomes are consumed in order; after that the default
/// outcome ([`ForwardScript::Deliver`] unless changed) applies.
#[derive(Debug, Clone, Default)]
pub struct RecordingForwarder {
    state: Arc<Mutex<ForwarderState>>,
}

impl RecordingForwarder {
    /// Create a forwarder that delivers everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for the next unscripted call.
    #[must_use]
    pub fn then(self, outcome: ForwardScript) -> Self {
        lock(&self.state).script.push_back(outcome);
        self
    }

    /// Outcome once the script is exhausted.
    #[must_use]
    pub fn otherwise(self, outcome: ForwardScript) -> Self {
        lock(&self.state).default = Some(outcome);
        self
    }

    /// Paths forwarded so far, in order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        lock(&self.state)
            .forwarded
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// File contents as they were when forwarded.
    #[must_use]
    pub fn bodies(&self) -> Vec<Vec<u8>> {
        lock(&self.state)
            .forwarded
            .iter()
            .map(|(_, body)| body.clone())
            .collect()
    }
}

impl Forwarder for RecordingForwarder {
    fn forward(&self, path: &Path) -> PublishResult<PublishReceipt> {
        let mut state = lock(&self.state);
        let outcome = state
            .script
            .pop_front()
            .or(state.default)
            .unwrap_or(ForwardScript::Deliver);

        let body = fs::read(path).map_err(|source| PublishError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        state.forwarded.push((path.to_path_buf(), body));

        match outcome {
            ForwardScript::Deliver => Ok(PublishReceipt::Delivered { removed: false }),
            ForwardScript::DeliverAndRemove => {
                let removed = fs::remove_file(path).is_ok();
                Ok(PublishReceipt::Delivered { removed })
            },
            ForwardScript::Reject(status) => Ok(PublishReceipt::Rejected { status }),
            ForwardScript::Fail => Err(PublishError::ReadFile {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "injected failure"),
            }),
        }
    }
}
