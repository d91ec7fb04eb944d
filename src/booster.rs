//! The boost feature: wraps a language server launch with the external
//! `lsp-booster` process and installs the dual-format read path for the
//! resulting connection.
//!
//! Three seams, wired by `app::run` in order: `launch_command` rewrites
//! the spawn argv, `observe_connection` classifies the spawned process and
//! tags its channel, `decoder` supplies the payload decoder the client
//! reads through. While the feature is disabled every seam is the
//! identity/baseline, so a disabled run is indistinguishable from one
//! where the feature never existed.

pub mod channel;
pub mod classify;
pub mod codec;
pub mod command;
pub mod reader;

use anyhow::Context;

use crate::booster::reader::{DualFormatDecoder, MessageDecoder, PlainDecoder};
use crate::lsp::transport::LspTransport;

/// The two user-facing switches from the configuration surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoostOptions {
    /// Run the booster in stream-buffering mode, without payload
    /// translation.
    pub io_only: bool,
    /// Never wrap servers that run against a remote workspace.
    pub no_remote_boost: bool,
}

/// Explicit activate/deactivate lifecycle around the boost seams.
pub struct BoostFeature {
    options: BoostOptions,
    enabled: bool,
}

impl BoostFeature {
    /// A new feature starts disabled; `activate` turns it on.
    pub fn new(options: BoostOptions) -> Self {
        BoostFeature {
            options,
            enabled: false,
        }
    }

    /// Enable the feature. The booster executable must be resolvable on
    /// PATH; when it is not, the error is returned and the feature stays
    /// disabled.
    pub fn activate(&mut self) -> anyhow::Result<()> {
        self.activate_program(command::BOOSTER_PROGRAM)
    }

    fn activate_program(&mut self, program: &str) -> anyhow::Result<()> {
        let resolved = which::which(program)
            .with_context(|| format!("{program} is not on PATH; boosting unavailable"))?;
        self.enabled = true;
        tracing::info!(booster = %resolved.display(), "boost activated");
        Ok(())
    }

    pub fn deactivate(&mut self) {
        if self.enabled {
            tracing::info!("boost deactivated");
        }
        self.enabled = false;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The launch vector to actually spawn for `command`.
    pub fn launch_command(&self, command: &[String], remote: bool) -> Vec<String> {
        if !self.enabled {
            return command.to_vec();
        }
        command::rewrite(
            command,
            remote,
            self.options.io_only,
            self.options.no_remote_boost,
        )
    }

    /// Connection-created hook: classify the spawned process and tag the
    /// transport's channel. Never fails the connection; a transport that
    /// cannot report its spawn argv is skipped and stays unboosted.
    pub fn observe_connection(&self, transport: &mut dyn LspTransport) {
        if !self.enabled {
            return;
        }
        let cmdline = match transport.spawned_command() {
            Some(cmdline) => cmdline.to_vec(),
            None => {
                tracing::debug!("spawn argv unavailable, skipping boost classification");
                return;
            }
        };
        classify::classify(&cmdline, transport.channel_mut());
    }

    /// The payload decoder to install for new connections.
    pub fn decoder(&self) -> Box<dyn MessageDecoder> {
        if self.enabled {
            Box::new(DualFormatDecoder::new())
        } else {
            Box::new(PlainDecoder)
        }
    }
}
