//! CLI subcommands.

pub(crate) mod config;
pub(crate) mod init;
pub(crate) mod manifest;
pub(crate) mod publish_pending;
pub(crate) mod run;
