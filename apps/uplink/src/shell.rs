//! Interactive shell over one upload session.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use uplink_session::{SessionError, UploadSession};
use uplink_transfer::LocalFile;

use crate::render;

const HELP: &str = "commands: select <path> | view | delete | status | help | quit";

/// A parsed shell line.
#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Select(PathBuf),
    View,
    Delete,
    Status,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "select" if rest.is_empty() => Err("usage: select <path>".into()),
            "select" => Ok(Self::Select(PathBuf::from(rest))),
            "view" => Ok(Self::View),
            "delete" => Ok(Self::Delete),
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Reads commands from stdin until `quit` or end of input.
///
/// Uploads run in the background so `status` can be checked mid-transfer.
pub async fn run(session: Arc<UploadSession>) -> anyhow::Result<()> {
    eprintln!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(usage) => {
                eprintln!("{usage}");
                continue;
            }
        };

        match command {
            ShellCommand::Select(path) => {
                let file = match LocalFile::open(&path).await {
                    Ok(file) => file,
                    Err(e) => {
                        eprintln!("cannot open {}: {e}", path.display());
                        continue;
                    }
                };
                let session = Arc::clone(&session);
                tokio::spawn(async move {
                    if let Err(e) = session.select_file(file).await {
                        report(&e);
                    }
                });
            }
            ShellCommand::View => {
                if let Err(e) = session.view_current_file().await {
                    report(&e);
                }
            }
            ShellCommand::Delete => {
                if let Err(e) = session.delete_current_file().await {
                    report(&e);
                }
            }
            ShellCommand::Status => eprintln!("{}", render::describe_snapshot(&session.snapshot())),
            ShellCommand::Help => eprintln!("{HELP}"),
            ShellCommand::Quit => break,
        }
    }
    Ok(())
}

/// Prints errors the session did not already surface as a status message.
fn report(err: &SessionError) {
    if err.is_reported() {
        debug!(error = %err, "action failed");
    } else {
        eprintln!("{err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(
            ShellCommand::parse("select  ./my report.pdf "),
            Ok(ShellCommand::Select(PathBuf::from("./my report.pdf")))
        );
        assert_eq!(ShellCommand::parse("view"), Ok(ShellCommand::View));
        assert_eq!(ShellCommand::parse(" delete"), Ok(ShellCommand::Delete));
        assert_eq!(ShellCommand::parse("status"), Ok(ShellCommand::Status));
        assert_eq!(ShellCommand::parse("exit"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(ShellCommand::parse("select").is_err());
        assert_eq!(
            ShellCommand::parse("upload x"),
            Err("unknown command: upload".to_string())
        );
    }
}
