//! Terminal rendering of session state.
//!
//! Progress and messages go to stderr; read links go to stdout so they
//! can be piped.

use std::io::{self, Write};

use tokio::sync::mpsc;
use uplink_session::{MessageKind, SessionEvent, SessionSnapshot, StatusMessage};

const BAR_WIDTH: usize = 30;

/// Formats a fixed-width progress bar.
pub fn progress_bar(percent: u8) -> String {
    let percent = percent.min(100);
    let filled = BAR_WIDTH * usize::from(percent) / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        percent
    )
}

/// One-line summary of a snapshot, used by `status`.
pub fn describe_snapshot(snapshot: &SessionSnapshot) -> String {
    let mut line = format!("status: {}", snapshot.status);
    if let Some(pct) = snapshot.percent_complete {
        line.push_str(&format!(" {pct}%"));
    }
    match &snapshot.record {
        Some(record) => line.push_str(&format!(" | file: {} ({})", record.name, record.status)),
        None => line.push_str(" | file: none"),
    }
    if let Some(message) = &snapshot.message {
        line.push_str(&format!(" | {}", message_line(message)));
    }
    line
}

fn message_line(message: &StatusMessage) -> String {
    let tag = match message.kind {
        MessageKind::Success => "ok",
        MessageKind::Error => "error",
    };
    format!("{tag}: {}", message.text)
}

/// Writes session events to a pair of streams.
pub struct Renderer<O, E> {
    out: O,
    err: E,
    progress_active: bool,
}

impl Renderer<io::Stdout, io::Stderr> {
    pub fn terminal() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Renderer<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            progress_active: false,
        }
    }

    pub fn handle(&mut self, event: &SessionEvent) -> io::Result<()> {
        match event {
            SessionEvent::Progress(Some(pct)) => {
                write!(self.err, "\r{}", progress_bar(*pct))?;
                self.err.flush()?;
                self.progress_active = true;
            }
            SessionEvent::Progress(None) => self.end_progress()?,
            SessionEvent::MessageChanged(Some(message)) => {
                self.end_progress()?;
                writeln!(self.err, "{}", message_line(message))?;
            }
            SessionEvent::LinkReady { link, .. } => {
                self.end_progress()?;
                writeln!(self.out, "{link}")?;
                self.out.flush()?;
            }
            SessionEvent::FileDeleted { name } => {
                self.end_progress()?;
                writeln!(self.err, "deleted {name}")?;
            }
            // Status and record changes are visible through `status`.
            _ => {}
        }
        Ok(())
    }

    fn end_progress(&mut self) -> io::Result<()> {
        if self.progress_active {
            writeln!(self.err)?;
            self.progress_active = false;
        }
        Ok(())
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

/// Renders events until the session is dropped.
pub async fn run<O: Write, E: Write>(
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    mut renderer: Renderer<O, E>,
) {
    while let Some(event) = events.recv().await {
        if let Err(e) = renderer.handle(&event) {
            tracing::warn!(error = %e, "failed to render session event");
        }
    }
}
