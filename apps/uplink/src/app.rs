//! Command dispatch.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use uplink_presign::{Client, ClientOptions};
use uplink_session::{SessionError, UploadSession};
use uplink_transfer::{LocalFile, StorageClient, StorageOptions};

use crate::cli::Commands;
use crate::config::Config;
use crate::render::{self, Renderer};
use crate::shell;

/// Builds a session wired to the configured backend and to storage.
pub fn build_session(config: &Config) -> anyhow::Result<UploadSession> {
    let client = Client::new(
        &config.backend_url,
        ClientOptions {
            timeout: config.request_timeout(),
        },
    )
    .context("failed to create backend client")?;
    let storage = StorageClient::new(StorageOptions {
        timeout: config.upload_timeout(),
    })
    .context("failed to create storage client")?;

    Ok(UploadSession::new(Arc::new(client), Arc::new(storage)))
}

/// Runs one command against `config`.
pub async fn run(
    command: Commands,
    config: Config,
    config_path: &Path,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Upload {
            path,
            content_type,
            view,
            delete,
        } => upload(&config, &path, content_type, view, delete).await,
        Commands::Shell => {
            let session = Arc::new(build_session(&config)?);
            let events = session
                .take_events()
                .context("session events already taken")?;
            let renderer = tokio::spawn(render::run(events, Renderer::terminal()));
            let result = shell::run(Arc::clone(&session)).await;
            // Background uploads keep rendering until they finish.
            drop(session);
            renderer.await?;
            result.map(|()| ExitCode::SUCCESS)
        }
        Commands::Config => {
            println!("# {}", config_path.display());
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn upload(
    config: &Config,
    path: &Path,
    content_type: Option<String>,
    view: bool,
    delete: bool,
) -> anyhow::Result<ExitCode> {
    let mut file = LocalFile::open(path)
        .await
        .with_context(|| format!("cannot open {}", path.display()))?;
    if let Some(content_type) = content_type {
        file = file.with_content_type(content_type);
    }

    let session = build_session(config)?;
    let events = session
        .take_events()
        .context("session events already taken")?;
    let renderer = tokio::spawn(render::run(events, Renderer::terminal()));

    let result = upload_cycle(&session, file, view, delete).await;

    // Dropping the session closes the event stream.
    drop(session);
    renderer.await?;
    exit_code(result)
}

async fn upload_cycle(
    session: &UploadSession,
    file: LocalFile,
    view: bool,
    delete: bool,
) -> Result<(), SessionError> {
    session.select_file(file).await?;
    if view {
        session.view_current_file().await?;
    }
    if delete {
        session.delete_current_file().await?;
    }
    Ok(())
}

/// Failures the renderer already printed only set the exit status.
fn exit_code(result: Result<(), SessionError>) -> anyhow::Result<ExitCode> {
    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is_reported() => {
            tracing::debug!(error = %e, "upload cycle failed");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uplink_presign::AuthorizationError;
    use uplink_transfer::TransferError;

    #[test]
    fn success_exits_zero() {
        let code = exit_code(Ok(())).unwrap();
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));
    }

    #[test]
    fn shown_failures_exit_nonzero_without_error() {
        let rejected = SessionError::Transfer(TransferError::Rejected {
            status: 403,
            body: "Access Denied".into(),
        });
        let code = exit_code(Err(rejected)).unwrap();
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::FAILURE));

        let denied = SessionError::Authorization(AuthorizationError::Rejected("nope".into()));
        assert!(exit_code(Err(denied)).is_ok());
    }

    #[test]
    fn unshown_failures_propagate() {
        let err = exit_code(Err(SessionError::NoUploadedFile)).unwrap_err();
        assert_eq!(err.to_string(), "no uploaded file");
    }
}
