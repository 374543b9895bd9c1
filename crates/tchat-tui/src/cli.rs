//! Command line and environment configuration.

use std::path::PathBuf;

use clap::Parser;
use tchat_app::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_PASSWORD};

/// In-chat commands, shown after the option list.
const COMMANDS_HELP: &str = "\
In-chat commands:
  :list    List users online

Esc or Ctrl+C quits.";

/// tchat terminal client
#[derive(Parser, Debug, Clone)]
#[command(name = "tchat")]
#[command(about = "Terminal client for a WebSocket chat relay")]
#[command(version)]
#[command(after_help = COMMANDS_HELP)]
pub struct Args {
    /// Relay WebSocket URL
    #[arg(long, env = "TCHAT_URL", default_value = DEFAULT_ENDPOINT)]
    pub url: String,

    /// Shared relay password
    #[arg(long, env = "TCHAT_PASS", default_value = DEFAULT_PASSWORD, hide_env_values = true)]
    pub pass: String,

    /// Show the send time under every chat line
    #[arg(long, env = "TCHAT_TIMESTAMP")]
    pub timestamp: bool,

    /// Append logs to this file. Nothing is logged without it.
    #[arg(long, env = "TCHAT_LOG_PATH")]
    pub log_file: Option<PathBuf>,

    /// Log level filter, overridden by `RUST_LOG`
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Resolve into the runtime configuration.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.url.clone(),
            password: self.pass.clone(),
            timestamps: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn help_lists_chat_commands() {
        let help = Args::command().render_long_help().to_string();
        assert!(help.contains(":list"));
        assert!(help.contains("List users online"));
    }

    #[test]
    fn defaults_match_public_relay() {
        let args = Args::try_parse_from(["tchat"]).unwrap();
        let config = args.client_config();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.password, DEFAULT_PASSWORD);
        assert!(!config.timestamps);
        assert!(args.log_file.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "tchat",
            "--url",
            "ws://localhost:8080/api/chat",
            "--pass",
            "secret",
            "--timestamp",
            "--log-file",
            "tchat.log",
        ])
        .unwrap();

        assert_eq!(args.client_config(), ClientConfig {
            endpoint: "ws://localhost:8080/api/chat".into(),
            password: "secret".into(),
            timestamps: true,
        });
        assert_eq!(args.log_file, Some(PathBuf::from("tchat.log")));
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
