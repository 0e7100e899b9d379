//! Interactive shell over one tracker instance.

use std::fmt::Write as _;
use anyhow::{anyhow, bail, Result};
use psalms_core::{ChapterNumber, SessionId};
use psalms_progress::{ChapterTracker, DrawOutcome, SharedTracker, TrackerError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info};

use crate::numeral::format_hebrew_numeral;

const HELP: &str = "\
Commands:
  draw                 draw a random chapter
  again                turn down the drawn chapter and draw another
  select <n>           pick a chapter yourself
  take                 take the pending chapter for reading
  reject               drop the pending chapter
  complete <id|#>      mark a session finished (# is its position in `list`)
  resume <id|#>        mark a session as reading again
  list                 show sessions being read
  available            show chapters that can be drawn
  show <n>             print a chapter
  status               show counters
  clear                dismiss the current error
  help                 show this text
  quit                 leave";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Draw a random chapter
    Draw,
    /// Draw again after turning down the previous result
    Again,
    /// Select a chapter explicitly
    Select(ChapterNumber),
    /// Confirm the pending selection
    Take,
    /// Drop the pending selection
    Reject,
    /// Complete a session
    Complete(SessionRef),
    /// Put a session back into reading
    Resume(SessionRef),
    /// List active sessions
    List,
    /// List available chapters
    Available,
    /// Print a chapter
    Show(ChapterNumber),
    /// Print counters
    Status,
    /// Clear the error
    Clear,
    /// Print help
    Help,
    /// Leave the shell
    Quit,
}

/// How a command names a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRef {
    /// Full session id
    Id(SessionId),
    /// 1-based position in the session list
    Position(usize),
}

impl Command {
    /// Parse one input line.
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or_else(|| anyhow!("empty command"))?;
        let arg = words.next();

        let command = match name.to_lowercase().as_str() {
            "draw" => Self::Draw,
            "again" => Self::Again,
            "select" => Self::Select(parse_chapter(arg)?),
            "take" | "confirm" => Self::Take,
            "reject" => Self::Reject,
            "complete" | "done" => Self::Complete(parse_session(arg)?),
            "resume" => Self::Resume(parse_session(arg)?),
            "list" => Self::List,
            "available" => Self::Available,
            "show" => Self::Show(parse_chapter(arg)?),
            "status" => Self::Status,
            "clear" => Self::Clear,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command `{}` (try `help`)", other),
        };

        Ok(command)
    }
}

fn parse_chapter(arg: Option<&str>) -> Result<ChapterNumber> {
    let arg = arg.ok_or_else(|| anyhow!("missing chapter number"))?;
    arg.parse()
        .map_err(|_| anyhow!("`{}` is not a chapter number", arg))
}

fn parse_session(arg: Option<&str>) -> Result<SessionRef> {
    let arg = arg.ok_or_else(|| anyhow!("missing session id or position"))?;
    if let Ok(position) = arg.parse::<usize>() {
        return Ok(SessionRef::Position(position));
    }
    arg.parse()
        .map(SessionRef::Id)
        .map_err(|_| anyhow!("`{}` is not a session id or position", arg))
}

/// Whether the shell keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command
    Continue,
    /// Stop
    Quit,
}

/// Interactive shell.
pub struct Shell {
    tracker: SharedTracker,
}

impl Shell {
    /// Create a shell over a tracker.
    pub fn new(tracker: SharedTracker) -> Self {
        Self { tracker }
    }

    /// Read commands from stdin until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        let mut stdout = BufWriter::new(tokio::io::stdout());

        let banner = self.status().await;
        stdout.write_all(format!("{}\n> ", banner).as_bytes()).await?;
        stdout.flush().await?;

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                stdout.write_all(b"> ").await?;
                stdout.flush().await?;
                continue;
            }

            let (output, flow) = match Command::parse(&line) {
                Ok(command) => {
                    debug!("Executing {:?}", command);
                    if matches!(command, Command::Draw | Command::Again) {
                        stdout.write_all("drawing...\n".as_bytes()).await?;
                        stdout.flush().await?;
                    }
                    self.execute(command).await
                }
                Err(e) => (format!("error: {}", e), Flow::Continue),
            };

            stdout.write_all(output.as_bytes()).await?;
            if flow == Flow::Quit {
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
                break;
            }
            stdout.write_all(b"\n> ").await?;
            stdout.flush().await?;
        }

        info!("Shell closed");
        Ok(())
    }

    /// Execute one command and return the text to print.
    pub async fn execute(&mut self, command: Command) -> (String, Flow) {
        let output = match command {
            Command::Draw => self.draw(false).await,
            Command::Again => self.draw(true).await,
            Command::Select(chapter) => {
                let mut tracker = self.tracker.lock().await;
                match tracker.select_available_chapter(chapter) {
                    Ok(()) => format!(
                        "selected {} - `take` to start reading",
                        chapter_label(&tracker, chapter)
                    ),
                    Err(e) => format!("error: {}", e),
                }
            }
            Command::Take => {
                let mut tracker = self.tracker.lock().await;
                match tracker.confirm_selected_chapter() {
                    Some(id) => {
                        let chapter = tracker.session(&id).map(|s| s.chapter).unwrap_or_default();
                        format!("reading {} (session {})", chapter_label(&tracker, chapter), id)
                    }
                    None => "nothing selected".to_string(),
                }
            }
            Command::Reject => {
                self.tracker.lock().await.clear_selection();
                "selection dropped".to_string()
            }
            Command::Complete(session) => {
                let mut tracker = self.tracker.lock().await;
                match resolve_session(&tracker, &session) {
                    Some(id) => match tracker.complete_chapter(&id) {
                        Some(completion) => {
                            let mut out = format!(
                                "finished {}",
                                chapter_label(&tracker, completion.session.chapter)
                            );
                            if completion.cycle_completed {
                                let _ = write!(
                                    out,
                                    "\nthe whole book is done! completed cycles: {}",
                                    tracker.completed_cycles()
                                );
                            }
                            out
                        }
                        None => "no such session".to_string(),
                    },
                    None => "no such session".to_string(),
                }
            }
            Command::Resume(session) => {
                let mut tracker = self.tracker.lock().await;
                match resolve_session(&tracker, &session) {
                    Some(id) if tracker.resume_session(&id) => "session resumed".to_string(),
                    _ => "no such session".to_string(),
                }
            }
            Command::List => self.list().await,
            Command::Available => {
                let tracker = self.tracker.lock().await;
                let available = tracker.available_chapters();
                if available.is_empty() {
                    "no chapters available".to_string()
                } else {
                    let numbers: Vec<String> = available.iter().map(ToString::to_string).collect();
                    format!("{} available: {}", available.len(), numbers.join(" "))
                }
            }
            Command::Show(chapter) => self.show(chapter).await,
            Command::Status => self.status().await,
            Command::Clear => {
                self.tracker.lock().await.clear_error();
                "error cleared".to_string()
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return ("bye".to_string(), Flow::Quit),
        };

        (output, Flow::Continue)
    }

    async fn draw(&self, again: bool) -> String {
        let outcome = if again {
            self.tracker.draw_new_chapter().await
        } else {
            self.tracker.draw_random_chapter().await
        };

        let tracker = self.tracker.lock().await;
        match outcome {
            DrawOutcome::Drawn(chapter) => format!(
                "drew {} - `take` to start reading, `again` to draw another",
                chapter_label(&tracker, chapter)
            ),
            DrawOutcome::NothingAvailable => match tracker.error() {
                Some(e) => error_text(e),
                None => "no chapters available".to_string(),
            },
            DrawOutcome::Superseded => "draw replaced by a newer one".to_string(),
        }
    }

    async fn list(&self) -> String {
        let tracker = self.tracker.lock().await;
        let sessions = tracker.active_sessions();
        if sessions.is_empty() {
            return "no chapters being read".to_string();
        }

        let mut out = format!("chapters being read ({}):", sessions.len());
        for (index, session) in sessions.iter().enumerate() {
            let _ = write!(
                out,
                "\n  {}. {} | {} | {} | since {}",
                index + 1,
                chapter_label(&tracker, session.chapter),
                session.status,
                session.id,
                session.created_at.format("%H:%M"),
            );
        }
        out
    }

    async fn show(&self, chapter: ChapterNumber) -> String {
        let tracker = self.tracker.lock().await;
        let Some(content) = tracker.chapter(chapter) else {
            return format!("chapter {} is not in the catalog", chapter);
        };

        let mut out = chapter_label(&tracker, chapter);
        if !content.name.is_empty() {
            let _ = write!(out, " - {}", content.name);
        }
        for (index, verse) in content.verses.lines().enumerate() {
            let _ = write!(out, "\n{:>3} {}", index + 1, verse);
        }
        out
    }

    async fn status(&self) -> String {
        let tracker = self.tracker.lock().await;
        let snapshot = tracker.snapshot();

        let mut out = format!(
            "read {} of {} | left to draw {} | being read {} | books completed {}",
            snapshot.read_count,
            snapshot.total_chapters,
            snapshot.unread_count,
            snapshot.active_count,
            snapshot.completed_cycles,
        );
        if let Some(chapter) = snapshot.selected_chapter {
            let _ = write!(out, "\npending: {}", chapter_label(&tracker, chapter));
        }
        if let Some(error) = snapshot.error {
            let _ = write!(out, "\nerror: {}", error);
        }
        out
    }
}

fn resolve_session(tracker: &ChapterTracker, session: &SessionRef) -> Option<SessionId> {
    match session {
        SessionRef::Id(id) => tracker.session(id).map(|s| s.id),
        SessionRef::Position(position) => position
            .checked_sub(1)
            .and_then(|index| tracker.active_sessions().get(index))
            .map(|s| s.id),
    }
}

fn error_text(error: &TrackerError) -> String {
    match error.hebrew_message() {
        Some(hebrew) => format!("error: {} ({})", error, hebrew),
        None => format!("error: {}", error),
    }
}

fn chapter_label(tracker: &ChapterTracker, chapter: ChapterNumber) -> String {
    let numeral = tracker
        .chapter(chapter)
        .and_then(|c| c.hebrew_number.clone())
        .unwrap_or_else(|| format_hebrew_numeral(chapter));
    format!("chapter {} ({})", chapter, numeral)
}
