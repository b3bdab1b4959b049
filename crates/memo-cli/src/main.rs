//! memo CLI - interactive session over a note collection
//!
//! The original memo client is a single-page app; this binary is its
//! terminal equivalent. One process is one session: notes are loaded
//! through the service boundary, pins live only for the session, and the
//! prompt loop drives the same `NoteListView` state the other clients
//! use.

use std::io::{self, BufRead, Write};

use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use memo_core::view::{DeleteOutcome, NoteListView};
use memo_core::{InMemoryNoteService, Note, NoteId, NoteService, PinTarget};
use serde::Serialize;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "memo")]
#[command(about = "Manage a session's note collection from the terminal")]
#[command(version)]
struct Cli {
    /// Seed the session with demo notes
    #[arg(long)]
    seed: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] memo_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Unknown command: {0} (try 'help')")]
    UnknownCommand(String),
    #[error("Invalid note ID: {0}")]
    InvalidNoteId(String),
    #[error("No note with ID {0} in this session")]
    NoteNotFound(NoteId),
    #[error("Note title cannot be empty")]
    EmptyTitle,
    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// One parsed prompt line
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List { json: bool },
    Search { query: String },
    Add { title: String, pinned: bool },
    Edit { id: NoteId, title: String },
    Pin { id: NoteId },
    Delete { id: NoteId },
    Reload,
    Help,
    Quit,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("memo=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let service = if cli.seed {
        InMemoryNoteService::with_notes(demo_notes())
    } else {
        InMemoryNoteService::new()
    };

    let mut view = NoteListView::new(service);
    view.load().await?;
    view.search("");
    tracing::info!(count = view.notes().len(), "session loaded");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock().lines();
    let mut out = stdout.lock();

    writeln!(out, "memo session - type 'help' for commands")?;
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = input.next() else { break };
        match parse_command(&line?) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(error) = execute(command, &mut view, &mut input, &mut out).await {
                    writeln!(out, "Error: {error}")?;
                }
            }
            Err(error) => writeln!(out, "Error: {error}")?,
        }
    }

    Ok(())
}

fn parse_command(line: &str) -> Result<Option<Command>, CliError> {
    let mut parts = line.split_whitespace();
    let Some(keyword) = parts.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = parts.collect();

    let command = match keyword {
        "list" | "ls" => Command::List {
            json: rest.first() == Some(&"--json"),
        },
        "search" | "find" => Command::Search {
            query: rest.join(" "),
        },
        "add" | "new" => {
            let pinned = rest.first() == Some(&"--pin");
            let title_parts = if pinned { &rest[1..] } else { &rest[..] };
            let title = title_parts.join(" ");
            if title.is_empty() {
                return Err(CliError::EmptyTitle);
            }
            Command::Add { title, pinned }
        }
        "edit" => {
            let (raw_id, title_parts) = rest
                .split_first()
                .ok_or(CliError::Usage("edit <id> <new title>"))?;
            let title = title_parts.join(" ");
            if title.is_empty() {
                return Err(CliError::EmptyTitle);
            }
            Command::Edit {
                id: parse_note_id(raw_id)?,
                title,
            }
        }
        "pin" | "unpin" => Command::Pin {
            id: parse_note_id(rest.first().ok_or(CliError::Usage("pin <id>"))?)?,
        },
        "delete" | "rm" => Command::Delete {
            id: parse_note_id(rest.first().ok_or(CliError::Usage("delete <id>"))?)?,
        },
        "reload" | "load" => Command::Reload,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CliError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

fn parse_note_id(raw: &str) -> Result<NoteId, CliError> {
    raw.parse()
        .map_err(|_| CliError::InvalidNoteId(raw.to_string()))
}

async fn execute<S, I, W>(
    command: Command,
    view: &mut NoteListView<S>,
    input: &mut I,
    out: &mut W,
) -> Result<(), CliError>
where
    S: NoteService,
    I: Iterator<Item = io::Result<String>>,
    W: Write,
{
    match command {
        Command::List { json } => run_list(view, json, out),
        Command::Search { query } => {
            view.search(&query);
            run_list(view, false, out)
        }
        Command::Add { title, pinned } => run_add(view, title, pinned, input, out).await,
        Command::Edit { id, title } => run_edit(view, id, &title, out).await,
        Command::Pin { id } => run_pin(view, id, out),
        Command::Delete { id } => run_delete(view, id, input, out).await,
        Command::Reload => {
            view.load().await?;
            refresh(view);
            writeln!(out, "Loaded {} notes (pins reset)", view.notes().len())?;
            Ok(())
        }
        Command::Help => print_help(out),
        // Quit is handled by the prompt loop
        Command::Quit => Ok(()),
    }
}

#[derive(Debug, Serialize)]
struct NoteListItem {
    id: Option<u64>,
    title: String,
    preview: String,
    created_at: String,
    relative_time: String,
    pinned: bool,
}

fn run_list<S: NoteService, W: Write>(
    view: &NoteListView<S>,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let now = Utc::now();

    if json {
        let items = view
            .pinned()
            .iter()
            .map(|note| note_to_list_item(note, true, now))
            .chain(
                view.filtered()
                    .iter()
                    .map(|note| note_to_list_item(note, false, now)),
            )
            .collect::<Vec<NoteListItem>>();
        writeln!(out, "{}", serde_json::to_string_pretty(&items)?)?;
        return Ok(());
    }

    if view.pinned().is_empty() && view.filtered().is_empty() {
        writeln!(out, "No notes")?;
        return Ok(());
    }

    for note in view.pinned() {
        writeln!(out, "{}", format_note_line(note, true, now))?;
    }
    for note in view.filtered() {
        writeln!(out, "{}", format_note_line(note, false, now))?;
    }
    Ok(())
}

async fn run_add<S, I, W>(
    view: &mut NoteListView<S>,
    title: String,
    pinned: bool,
    input: &mut I,
    out: &mut W,
) -> Result<(), CliError>
where
    S: NoteService,
    I: Iterator<Item = io::Result<String>>,
    W: Write,
{
    let target = if pinned {
        PinTarget::Pinned
    } else {
        PinTarget::Normal
    };
    view.begin_create(target);

    write!(out, "Body (empty for none): ")?;
    out.flush()?;
    let body = input.next().transpose()?.unwrap_or_default();

    if let Some(draft) = view.create_draft_mut() {
        draft.note.title = title;
        draft.note.content = normalize_content(&body);
    }

    if let Some(created) = view.commit_create().await? {
        refresh(view);
        let id = created.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        writeln!(out, "Created note {id}")?;
    }
    Ok(())
}

async fn run_edit<S: NoteService, W: Write>(
    view: &mut NoteListView<S>,
    id: NoteId,
    title: &str,
    out: &mut W,
) -> Result<(), CliError> {
    let note = view.find(id).cloned().ok_or(CliError::NoteNotFound(id))?;

    view.begin_edit(&note);
    if let Some(draft) = view.edit_draft_mut() {
        draft.title = title.to_string();
    }
    view.commit_edit();
    refresh(view);

    let applied = view
        .notes()
        .iter()
        .any(|entry| entry.id == Some(id) && entry.title == title);
    if applied {
        writeln!(out, "Updated note {id}")?;
    } else {
        // Committed edits only apply to the normal collection.
        writeln!(out, "Note {id} is pinned; unpin it to edit")?;
    }
    Ok(())
}

fn run_pin<S: NoteService, W: Write>(
    view: &mut NoteListView<S>,
    id: NoteId,
    out: &mut W,
) -> Result<(), CliError> {
    if view.find(id).is_none() {
        return Err(CliError::NoteNotFound(id));
    }

    view.toggle_pin(id);
    refresh(view);

    let now_pinned = view.pinned().iter().any(|note| note.id == Some(id));
    if now_pinned {
        writeln!(out, "Pinned note {id}")?;
    } else {
        writeln!(out, "Unpinned note {id}")?;
    }
    Ok(())
}

async fn run_delete<S, I, W>(
    view: &mut NoteListView<S>,
    id: NoteId,
    input: &mut I,
    out: &mut W,
) -> Result<(), CliError>
where
    S: NoteService,
    I: Iterator<Item = io::Result<String>>,
    W: Write,
{
    let note = view.find(id).cloned().ok_or(CliError::NoteNotFound(id))?;

    let outcome = {
        let mut confirm = |target: &Note| {
            let _ = write!(out, "Delete '{}'? [y/N] ", target.title);
            let _ = out.flush();
            matches!(
                input.next(),
                Some(Ok(answer)) if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
            )
        };
        view.delete_note(&note, &mut confirm).await?
    };

    match outcome {
        DeleteOutcome::Deleted => {
            refresh(view);
            writeln!(out, "Deleted note {id}")?;
        }
        DeleteOutcome::Cancelled => writeln!(out, "Deletion cancelled")?,
    }
    Ok(())
}

fn print_help<W: Write>(out: &mut W) -> Result<(), CliError> {
    writeln!(
        out,
        "Commands:\n  \
         list [--json]        show pinned notes, then the filtered view\n  \
         search <query>       filter by title/content substring (empty clears)\n  \
         add [--pin] <title>  create a note; prompts for an optional body\n  \
         edit <id> <title>    retitle a note in the normal collection\n  \
         pin <id>             toggle a note between normal and pinned\n  \
         delete <id>          delete a note (asks for confirmation)\n  \
         reload               refetch from the service; pins reset\n  \
         quit                 end the session"
    )?;
    Ok(())
}

/// Re-derive the filtered view after a mutation so the next `list` is
/// current; the view itself only refilters on `search`.
fn refresh<S: NoteService>(view: &mut NoteListView<S>) {
    let query = view.query().to_string();
    view.search(&query);
}

fn note_to_list_item(note: &Note, pinned: bool, now: DateTime<Utc>) -> NoteListItem {
    NoteListItem {
        id: note.id.map(NoteId::as_u64),
        title: note.title.clone(),
        preview: note.preview(80),
        created_at: note.created_at.to_rfc3339(),
        relative_time: format_relative_time(note.created_at, now),
        pinned,
    }
}

fn format_note_line(note: &Note, pinned: bool, now: DateTime<Utc>) -> String {
    let id = note.id.map_or_else(|| "-".to_string(), |id| id.to_string());
    let marker = if pinned { "*" } else { " " };
    let title = truncate_chars(&note.title, 28);
    let preview = note.preview(32);
    let relative_time = format_relative_time(note.created_at, now);

    if preview.is_empty() {
        format!("{id:>4} {marker} {title:<28}  {relative_time}")
    } else {
        format!("{id:>4} {marker} {title:<28}  {preview:<32}  {relative_time}")
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = text.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_milliseconds().max(0);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn demo_notes() -> Vec<Note> {
    let now = Utc::now();
    let note = |title: &str, content: Option<&str>, age_hours: i64| Note {
        id: None,
        title: title.to_string(),
        content: content.map(ToString::to_string),
        created_at: now - Duration::hours(age_hours),
    };

    vec![
        note("Shopping", Some("milk, eggs, bread"), 30),
        note("Standup notes", Some("demo the session shell"), 5),
        note("Call the landlord", None, 1),
    ]
}

#[cfg(test)]
mod tests {
    use std::io;

    use chrono::{Duration, TimeZone, Utc};
    use memo_core::view::NoteListView;
    use memo_core::{InMemoryNoteService, Note, NoteId};
    use pretty_assertions::assert_eq;

    use super::{
        execute, format_note_line, format_relative_time, normalize_content, parse_command,
        truncate_chars, CliError, Command,
    };

    fn note(id: u64, title: &str, content: Option<&str>) -> Note {
        Note {
            id: Some(NoteId::new(id)),
            title: title.to_string(),
            content: content.map(ToString::to_string),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    async fn session(seed: Vec<Note>) -> NoteListView<InMemoryNoteService> {
        let mut view = NoteListView::new(InMemoryNoteService::with_notes(seed));
        view.load().await.unwrap();
        view.search("");
        view
    }

    fn scripted(lines: &[&str]) -> std::vec::IntoIter<io::Result<String>> {
        lines
            .iter()
            .map(|line| Ok((*line).to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn parse_command_covers_the_command_set() {
        assert_eq!(
            parse_command("list --json").unwrap(),
            Some(Command::List { json: true })
        );
        assert_eq!(
            parse_command("search milk and eggs").unwrap(),
            Some(Command::Search {
                query: "milk and eggs".to_string()
            })
        );
        assert_eq!(
            parse_command("add --pin Big idea").unwrap(),
            Some(Command::Add {
                title: "Big idea".to_string(),
                pinned: true
            })
        );
        assert_eq!(
            parse_command("edit 3 New title").unwrap(),
            Some(Command::Edit {
                id: NoteId::new(3),
                title: "New title".to_string()
            })
        );
        assert_eq!(
            parse_command("pin 7").unwrap(),
            Some(Command::Pin { id: NoteId::new(7) })
        );
        assert_eq!(
            parse_command("rm 2").unwrap(),
            Some(Command::Delete { id: NoteId::new(2) })
        );
        assert_eq!(parse_command("quit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn parse_command_empty_line_is_none() {
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn parse_command_rejects_unknown_and_malformed() {
        assert!(matches!(
            parse_command("frobnicate"),
            Err(CliError::UnknownCommand(_))
        ));
        assert!(matches!(parse_command("add"), Err(CliError::EmptyTitle)));
        assert!(matches!(parse_command("pin"), Err(CliError::Usage(_))));
        assert!(matches!(
            parse_command("delete abc"),
            Err(CliError::InvalidNoteId(_))
        ));
    }

    #[test]
    fn search_command_allows_empty_query_to_clear_filter() {
        assert_eq!(
            parse_command("search").unwrap(),
            Some(Command::Search {
                query: String::new()
            })
        );
    }

    #[test]
    fn format_relative_time_units() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            format_relative_time(now - Duration::seconds(30), now),
            "just now"
        );
        assert_eq!(
            format_relative_time(now - Duration::minutes(2), now),
            "2m ago"
        );
        assert_eq!(format_relative_time(now - Duration::hours(2), now), "2h ago");
        assert_eq!(format_relative_time(now - Duration::days(3), now), "3d ago");
    }

    #[test]
    fn normalize_content_trims_and_rejects_empty() {
        assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
        assert_eq!(normalize_content(" \t "), None);
    }

    #[test]
    fn truncate_chars_adds_ellipsis() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("a very long note title", 10), "a very ...");
    }

    #[test]
    fn format_note_line_marks_pinned_entries() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let line = format_note_line(&note(1, "Shopping", Some("milk")), true, now);
        assert!(line.contains('*'));
        assert!(line.contains("Shopping"));
        assert!(line.contains("milk"));
    }

    #[tokio::test]
    async fn add_command_creates_note_with_body() {
        let mut view = session(Vec::new()).await;
        let mut input = scripted(&["milk and eggs"]);
        let mut out = Vec::new();

        execute(
            Command::Add {
                title: "Shopping".to_string(),
                pinned: false,
            },
            &mut view,
            &mut input,
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(view.notes().len(), 1);
        assert_eq!(view.notes()[0].title, "Shopping");
        assert_eq!(view.notes()[0].content, Some("milk and eggs".to_string()));
        assert!(String::from_utf8(out).unwrap().contains("Created note 1"));
    }

    #[tokio::test]
    async fn add_command_with_pin_lands_in_pinned_collection() {
        let mut view = session(Vec::new()).await;
        let mut input = scripted(&[""]);
        let mut out = Vec::new();

        execute(
            Command::Add {
                title: "Sticky".to_string(),
                pinned: true,
            },
            &mut view,
            &mut input,
            &mut out,
        )
        .await
        .unwrap();

        assert!(view.notes().is_empty());
        assert_eq!(view.pinned().len(), 1);
        assert_eq!(view.pinned()[0].content, None);
    }

    #[tokio::test]
    async fn delete_command_denied_keeps_note() {
        let mut view = session(vec![note(1, "keep me", None)]).await;
        let mut input = scripted(&["n"]);
        let mut out = Vec::new();

        execute(
            Command::Delete { id: NoteId::new(1) },
            &mut view,
            &mut input,
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(view.notes().len(), 1);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Delete 'keep me'?"));
        assert!(printed.contains("cancelled"));
    }

    #[tokio::test]
    async fn delete_command_confirmed_removes_note() {
        let mut view = session(vec![note(1, "goner", None)]).await;
        let mut input = scripted(&["y"]);
        let mut out = Vec::new();

        execute(
            Command::Delete { id: NoteId::new(1) },
            &mut view,
            &mut input,
            &mut out,
        )
        .await
        .unwrap();

        assert!(view.notes().is_empty());
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Deleted note 1"));
    }

    #[tokio::test]
    async fn delete_command_unknown_id_is_reported() {
        let mut view = session(Vec::new()).await;
        let mut input = scripted(&[]);
        let mut out = Vec::new();

        let error = execute(
            Command::Delete { id: NoteId::new(9) },
            &mut view,
            &mut input,
            &mut out,
        )
        .await
        .unwrap_err();

        assert!(matches!(error, CliError::NoteNotFound(id) if id == NoteId::new(9)));
    }

    #[tokio::test]
    async fn edit_command_on_pinned_note_reports_no_effect() {
        let mut view = session(vec![note(1, "pinned title", None)]).await;
        view.toggle_pin(NoteId::new(1));
        let mut input = scripted(&[]);
        let mut out = Vec::new();

        execute(
            Command::Edit {
                id: NoteId::new(1),
                title: "new title".to_string(),
            },
            &mut view,
            &mut input,
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(view.pinned()[0].title, "pinned title");
        assert!(String::from_utf8(out).unwrap().contains("is pinned"));
    }

    #[tokio::test]
    async fn list_json_output_is_parseable_and_flags_pins() {
        let mut view = session(vec![note(1, "plain", None), note(2, "stuck", None)]).await;
        view.toggle_pin(NoteId::new(2));
        view.search("");
        let mut input = scripted(&[]);
        let mut out = Vec::new();

        execute(
            Command::List { json: true },
            &mut view,
            &mut input,
            &mut out,
        )
        .await
        .unwrap();

        let items: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let items = items.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["title"], "stuck");
        assert_eq!(items[0]["pinned"], true);
        assert_eq!(items[1]["pinned"], false);
    }

    #[tokio::test]
    async fn search_command_narrows_then_clears() {
        let mut view = session(vec![
            note(1, "Shopping", Some("milk")),
            note(2, "Work", None),
        ])
        .await;
        let mut input = scripted(&[]);
        let mut out = Vec::new();

        execute(
            Command::Search {
                query: "milk".to_string(),
            },
            &mut view,
            &mut input,
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(view.filtered().len(), 1);

        execute(
            Command::Search {
                query: String::new(),
            },
            &mut view,
            &mut input,
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(view.filtered().len(), 2);
    }
}
