//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "uplink",
    version,
    about = "Upload files straight to object storage with presigned POSTs"
)]
pub struct Cli {
    /// Backend GraphQL endpoint (overrides the config file)
    #[arg(long, global = true, env = "UPLINK_BACKEND_URL", value_name = "URL")]
    pub backend_url: Option<String>,

    /// Path to the configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Upload one file, optionally viewing or deleting it afterwards
    Upload {
        /// Path to the file to upload
        path: PathBuf,
        /// Override the detected content type
        #[arg(long, value_name = "TYPE")]
        content_type: Option<String>,
        /// Print a signed read link once uploaded
        #[arg(long)]
        view: bool,
        /// Delete the file once uploaded (after --view, if given)
        #[arg(long)]
        delete: bool,
    },
    /// Interactive session: select, view, delete, status, quit
    Shell,
    /// Print the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_with_flags() {
        let cli = Cli::try_parse_from([
            "uplink",
            "upload",
            "report.pdf",
            "--content-type",
            "application/pdf",
            "--view",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Commands::Upload {
                path: PathBuf::from("report.pdf"),
                content_type: Some("application/pdf".into()),
                view: true,
                delete: false,
            }
        );
    }

    #[test]
    fn global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "uplink",
            "shell",
            "--backend-url",
            "http://api.local:4000",
            "--config",
            "/tmp/u.toml",
        ])
        .unwrap();
        assert_eq!(cli.command, Commands::Shell);
        assert_eq!(cli.backend_url.as_deref(), Some("http://api.local:4000"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/u.toml")));
    }

    #[test]
    fn upload_requires_path() {
        assert!(Cli::try_parse_from(["uplink", "upload"]).is_err());
    }
}
