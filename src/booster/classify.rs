// Post-spawn classification: was the server actually launched through the
// booster? Runs once, right after the spawn, before the first read.

use crate::booster::channel::ChannelState;
use crate::booster::command::BOOSTER_PROGRAM;

/// Inspect the argv the subprocess was actually started with and mark the
/// channel boosted when any token contains the booster program name.
///
/// Substring containment, not equality: the token may be an absolute path
/// like `/usr/local/bin/lsp-booster`. The inspected vector is the spawned
/// one, not the requested one, since another layer may rewrite commands
/// too. A non-matching command line leaves the channel untouched.
pub fn classify(cmdline: &[String], channel: &mut ChannelState) {
    if cmdline.iter().any(|token| token.contains(BOOSTER_PROGRAM)) {
        channel.mark_boosted();
        tracing::info!(command = %cmdline.join(" "), "server connection is boosted");
    }
}
