use clap::Parser;

use crate::booster::BoostOptions;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_command: Vec<String>,
    pub workspace: String,
    pub boost: bool,
    pub options: BoostOptions,
}

#[derive(Parser, Debug)]
#[command(name = "lsp_boost")]
#[command(about = "Launch a language server through the lsp-booster wire accelerator", long_about = None)]
pub struct Cli {
    /// Workspace root sent to the server during initialize
    #[arg(long)]
    workspace: Option<String>,

    /// Launch the server directly, without the booster
    #[arg(long)]
    no_boost: bool,

    /// Never wrap servers running against a remote workspace
    #[arg(long)]
    no_remote_boost: bool,

    /// Stream buffering only, no payload translation
    #[arg(long)]
    io_only: bool,

    /// Server command and its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    server_command: Vec<String>,
}

impl Cli {
    pub fn from_args() -> Self {
        Self::parse()
    }

    pub fn into_config(self) -> Config {
        Config {
            server_command: self.server_command,
            workspace: self.workspace.unwrap_or_else(|| {
                std::env::current_dir()
                    .ok()
                    .and_then(|p| p.to_str().map(|s| s.to_string()))
                    .unwrap_or_else(|| String::from("."))
            }),
            boost: !self.no_boost,
            options: BoostOptions {
                io_only: self.io_only,
                no_remote_boost: self.no_remote_boost,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn parses_flags_and_server_command() {
        let cli = Cli::parse_from([
            "lsp_boost",
            "--io-only",
            "--workspace",
            "/home/dev/proj",
            "rust-analyzer",
            "--log-file",
            "/tmp/ra.log",
        ]);
        let config = cli.into_config();
        assert!(config.boost);
        assert!(config.options.io_only);
        assert!(!config.options.no_remote_boost);
        assert_eq!(config.workspace, "/home/dev/proj");
        assert_eq!(
            config.server_command,
            vec!["rust-analyzer", "--log-file", "/tmp/ra.log"]
        );
    }

    #[test]
    fn no_boost_disables_the_feature() {
        let config = Cli::parse_from(["lsp_boost", "--no-boost", "clangd"]).into_config();
        assert!(!config.boost);
    }
}
