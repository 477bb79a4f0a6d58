//! pdfstitch - Reorder PDF files and merge them into a single document.
//!
//! Files are collected into an ordered list, rearranged, and merged in list
//! order into one PDF that is written locally as `merged_<YYYY-MM-DD>.pdf`.
//! Nothing leaves the machine.
//!
//! - [`store`]: the ordered item list
//! - [`merge`]: page copying and serialization
//! - [`session`]: the merge state machine around a list
//! - [`shell`]: the interactive front end
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::config::Config;
//! use pdfstitch::session::Session;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::from_config(&Config::default());
//! session.add_paths(["cover.pdf", "chapters/*.pdf"]).await?;
//!
//! let report = session.run_merge().await?;
//! println!("Wrote {}", report.receipt.path.display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod merge;
pub mod output;
pub mod session;
pub mod shell;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{PdfStitchError, Result};

use tokio::io::BufReader;

use crate::output::{MergeReportJson, OutputFormatter, to_json};
use crate::session::Session;
use crate::shell::Shell;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Run pdfstitch with a validated configuration.
///
/// Starts the shell when the configuration is interactive, otherwise merges
/// the configured inputs once.
///
/// # Errors
///
/// In one-shot mode, returns the first error; in the shell, only input or
/// output failures end the session. With `json` set, stdout carries only
/// the JSON document.
pub async fn run(config: Config) -> Result<()> {
    let formatter = OutputFormatter::from_config(&config);
    let mut session = Session::from_config(&config);

    if config.is_interactive() {
        if !config.inputs.is_empty() {
            // Failures are kept as the session notice; the shell still starts.
            let _ = session.add_paths(&config.inputs).await;
            if let Some(notice) = session.notice() {
                formatter.notice(notice);
            }
        }

        formatter.info(&format!(
            "{NAME} v{VERSION}. Type 'help' for commands, 'quit' to leave."
        ));
        let mut shell = Shell::new(session, formatter, std::io::stdout(), config.json);
        return shell.run(BufReader::new(tokio::io::stdin())).await;
    }

    let ids = session.add_paths(&config.inputs).await?;
    formatter.info(&format!("Merging {} file(s)...", ids.len()));
    let report = session.run_merge().await?;

    if config.json {
        println!("{}", to_json(&MergeReportJson::from(&report))?);
    } else {
        if let Some(notice) = session.notice() {
            formatter.notice(notice);
        }
        formatter.merge_report(&report);
    }

    Ok(())
}
