//! Interactive shell.
//!
//! Each input line is split into words (single or double quotes keep
//! spaces together) and parsed with clap in multicall mode, so the first
//! word is the command. Items are referred to by 1-based position or by a
//! prefix of their id.

use clap::{Parser, Subcommand};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::error::{PdfStitchError, Result};
use crate::output::{
    ListingJson, MergeReportJson, OutputFormatter, render_item, render_summary, to_json,
};
use crate::session::{MergeStatus, Session};
use crate::store::{ItemId, ItemStore};

/// Prompt shown before each command.
pub const PROMPT: &str = "pdfstitch> ";

#[derive(Parser, Debug)]
#[command(multicall = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum ShellCommand {
    /// Add files to the end of the list (paths or glob patterns)
    Add {
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<String>,
    },
    /// Show the list with sizes and totals
    #[command(visible_alias = "ls")]
    List {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Move an item to the position of another
    #[command(visible_alias = "mv")]
    Move {
        /// Item to move (position or id prefix)
        item: String,
        /// Item whose position it takes
        target: String,
    },
    /// Remove an item
    #[command(visible_alias = "rm")]
    Remove {
        /// Item to remove (position or id prefix)
        item: String,
    },
    /// Remove every item
    Clear,
    /// Merge the list and write merged_<date>.pdf
    Merge,
    /// Dismiss the last message
    Dismiss,
    /// Leave the shell
    #[command(visible_alias = "exit")]
    Quit,
}

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop.
    Quit,
}

/// Line-oriented front end over a [`Session`].
pub struct Shell<W: Write> {
    session: Session,
    formatter: OutputFormatter,
    out: W,
    json: bool,
}

impl<W: Write> Shell<W> {
    /// Create a shell writing listings and reports to `out`.
    pub fn new(session: Session, formatter: OutputFormatter, out: W, json: bool) -> Self {
        Self {
            session,
            formatter,
            out,
            json,
        }
    }

    /// The underlying session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Writer the shell prints to.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Read and execute commands until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing the prompt fails;
    /// command errors become the session notice and the shell carries on.
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();

        loop {
            if self.formatter.should_print() {
                write!(self.out, "{PROMPT}")?;
                self.out.flush()?;
            }

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match self.execute(&line).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => {
                    self.session.report_error(&err);
                    self.show_notice();
                }
            }
        }

        Ok(())
    }

    /// Execute one command line.
    ///
    /// # Errors
    ///
    /// Returns the command's error; the list is unchanged when a command
    /// fails.
    pub async fn execute(&mut self, line: &str) -> Result<Flow> {
        let words = split_words(line)?;
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        let command = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                // Help and usage errors are shown as they are.
                write!(self.out, "{}", err.render())?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?command, "shell command");

        match command {
            ShellCommand::Add { paths } => {
                self.session.add_paths(&paths).await?;
                self.show_notice();
            }
            ShellCommand::List { json } => self.list(json || self.json)?,
            ShellCommand::Move { item, target } => {
                let id = resolve_item(self.session.store(), &item)?;
                let target = resolve_item(self.session.store(), &target)?;
                if self.session.move_item(&id, &target) {
                    self.list(self.json)?;
                }
            }
            ShellCommand::Remove { item } => {
                let id = resolve_item(self.session.store(), &item)?;
                self.session.remove(&id);
                self.show_notice();
            }
            ShellCommand::Clear => {
                self.session.clear();
                self.show_notice();
            }
            ShellCommand::Merge => self.merge().await?,
            ShellCommand::Dismiss => self.session.dismiss(),
            ShellCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    async fn merge(&mut self) -> Result<()> {
        let job = self.session.begin_merge()?;
        self.formatter
            .info(&format!("Merging {} file(s)...", job.items().len()));

        let outcome = job.run().await;
        let report = self.session.complete_merge(outcome)?;

        if self.json {
            writeln!(self.out, "{}", to_json(&MergeReportJson::from(&report))?)?;
        } else {
            self.show_notice();
            self.formatter.merge_report(&report);
        }
        Ok(())
    }

    fn show_notice(&self) {
        if let Some(notice) = self.session.notice() {
            self.formatter.notice(notice);
        }
    }

    fn list(&mut self, json: bool) -> Result<()> {
        let store = self.session.store();

        if json {
            let listing = ListingJson {
                items: store.views(),
                summary: store.summary(),
            };
            writeln!(self.out, "{}", to_json(&listing)?)?;
            return Ok(());
        }

        if let Some(notice) = self.session.notice() {
            self.formatter.notice(notice);
        }
        if store.is_empty() {
            writeln!(self.out, "No files yet. Use 'add <path>'.")?;
            return Ok(());
        }

        for view in store.views() {
            writeln!(self.out, "{}", render_item(&view))?;
        }
        writeln!(self.out, "{}", render_summary(&store.summary()))?;

        if self.session.status() == MergeStatus::Merging {
            writeln!(self.out, "Merging...")?;
        }
        Ok(())
    }
}

/// Split a command line into words, honoring single and double quotes.
///
/// # Errors
///
/// Returns an error for an unterminated quote.
pub fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(PdfStitchError::other("Unterminated quote"));
    }
    if in_word {
        words.push(current);
    }

    Ok(words)
}

/// Resolve a 1-based position or an id prefix to an item id.
///
/// A reference made only of digits is always a position, never an id
/// prefix.
///
/// # Errors
///
/// Returns an error if the reference matches no item or more than one.
pub fn resolve_item(store: &ItemStore, reference: &str) -> Result<ItemId> {
    if let Ok(position) = reference.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|i| store.items().get(i))
            .map(|item| item.id)
            .ok_or_else(|| {
                PdfStitchError::other(format!(
                    "No item at position {position} (list has {})",
                    store.len()
                ))
            });
    }

    let mut matches = store
        .items()
        .iter()
        .filter(|item| item.id.matches_prefix(reference));

    match (matches.next(), matches.next()) {
        (Some(item), None) => Ok(item.id),
        (Some(_), Some(_)) => Err(PdfStitchError::other(format!(
            "'{reference}' matches more than one item"
        ))),
        (None, _) => Err(PdfStitchError::other(format!(
            "No item at position or with id '{reference}'"
        ))),
    }
}
