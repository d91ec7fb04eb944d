// Launch-vector rewriting: decide whether the server command gets wrapped
// by the booster executable, and build the wrapped argument vector.

/// Name of the external accelerator executable. Classification matches on
/// substring containment because the spawned token may be an absolute path.
pub const BOOSTER_PROGRAM: &str = "lsp-booster";

/// Symbolic token the booster emits for JSON `false` in its compact
/// encoding. Passed to the booster at launch and honored by the decoder.
pub const FALSE_TOKEN: &str = ":json-false";

/// Separator between booster arguments and the wrapped server command.
const WRAP_SEPARATOR: &str = "--";

/// Full translation profile: payloads are re-encoded into the compact
/// binary format.
const FULL_PROFILE: [&str; 4] = [BOOSTER_PROGRAM, "--false-token", FALSE_TOKEN, WRAP_SEPARATOR];

/// I/O-only profile: the booster only buffers the stream, payloads stay
/// plain JSON.
const IO_ONLY_PROFILE: [&str; 3] = [BOOSTER_PROGRAM, "--io-only", WRAP_SEPARATOR];

/// Rewrite a server launch vector, prepending the booster invocation.
///
/// Fail open: a malformed vector (empty, or empty program token) is
/// returned unchanged so the caller's launch fails the same way it would
/// have without us. Remote targets are left unwrapped when
/// `no_remote_boost` is set. The original command is never reordered or
/// altered. Pure; `app::run` invokes it exactly once per launch.
pub fn rewrite(
    command: &[String],
    remote: bool,
    io_only: bool,
    no_remote_boost: bool,
) -> Vec<String> {
    if command.is_empty() || command[0].is_empty() {
        tracing::debug!("launch vector malformed, leaving it unwrapped");
        return command.to_vec();
    }

    if no_remote_boost && remote {
        tracing::debug!("remote target, leaving launch vector unwrapped");
        return command.to_vec();
    }

    let profile: &[&str] = if io_only { &IO_ONLY_PROFILE } else { &FULL_PROFILE };

    let mut wrapped = Vec::with_capacity(profile.len() + command.len());
    wrapped.extend(profile.iter().map(|a| a.to_string()));
    wrapped.extend(command.iter().cloned());
    wrapped
}

/// Whether a workspace string names a remote host. An `ssh://` URL or an
/// scp-style `user@host:path` counts as remote; anything else is local.
pub fn remote_workspace(workspace: &str) -> bool {
    if workspace.starts_with("ssh://") {
        return true;
    }
    match (workspace.find('@'), workspace.find(':')) {
        (Some(at), Some(colon)) => at < colon,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn wraps_with_full_profile_by_default() {
        let command = cmd(&["rust-analyzer", "--log-file", "/tmp/ra.log"]);
        let wrapped = rewrite(&command, false, false, false);
        assert_eq!(
            wrapped,
            cmd(&[
                "lsp-booster",
                "--false-token",
                ":json-false",
                "--",
                "rust-analyzer",
                "--log-file",
                "/tmp/ra.log",
            ])
        );
    }

    #[test]
    fn original_arguments_survive_in_order() {
        let command = cmd(&["srv", "b", "a", "c"]);
        let wrapped = rewrite(&command, false, false, false);
        assert_eq!(&wrapped[wrapped.len() - command.len()..], &command[..]);
    }

    #[test]
    fn io_only_selects_io_profile() {
        let wrapped = rewrite(&cmd(&["clangd"]), false, true, false);
        assert_eq!(wrapped, cmd(&["lsp-booster", "--io-only", "--", "clangd"]));
        assert!(!wrapped.contains(&"--false-token".to_string()));
    }

    #[test]
    fn remote_opt_out_is_identity() {
        let command = cmd(&["rust-analyzer"]);
        assert_eq!(rewrite(&command, true, false, true), command);
        // without the opt-out a remote target is still wrapped
        assert_eq!(rewrite(&command, true, false, false)[0], "lsp-booster");
    }

    #[test]
    fn malformed_vectors_pass_through() {
        assert!(rewrite(&[], false, false, false).is_empty());
        let no_program = cmd(&["", "arg"]);
        assert_eq!(rewrite(&no_program, false, false, false), no_program);
    }

    #[test]
    fn remote_workspace_detection() {
        assert!(remote_workspace("ssh://build-host/src/proj"));
        assert!(remote_workspace("dev@build-host:src/proj"));
        assert!(!remote_workspace("/home/dev/src/proj"));
        assert!(!remote_workspace("C:/Users/dev/proj"));
    }
}
