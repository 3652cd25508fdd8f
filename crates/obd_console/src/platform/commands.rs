//! Operator command line grammar.

use std::path::PathBuf;

use obd_core::{CampaignSchedule, Filter, Msg};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  login <username> <password>   sign in
  logout                        sign out and discard session data
  upload <path>                 upload a lead file (scrubs automatically)
  toggle <dnd|sub|unsub|operator> <on|off>
  operator [name]               set or clear the target operator
  scrub                         re-run the scrub pipeline
  export                        save the cleaned list as CSV
  copy                          print the cleaned list for copying
  log                           append the last scrub to history
  history | stats | health      fetch server-side information
  launch project=<p> flow=<f> msc=<ip> cli=<mask> [chunk=<n>]
                                quote values containing spaces: project=\"Summer 2024\"
  dismiss                       clear a finished campaign attempt
  back                          leave the pipeline, discarding the list
  show | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command {0:?}; type 'help'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown filter {0:?}")]
    UnknownFilter(String),
    #[error("unknown launch field {0:?}")]
    UnknownField(String),
}

pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    let Some((verb, rest)) = split_verb(line) else {
        return Ok(None);
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "login" => match args.as_slice() {
            [username, password] => Command::Dispatch(Msg::LoginSubmitted {
                username: (*username).to_string(),
                password: (*password).to_string(),
            }),
            _ => return Err(CommandError::Usage("login <username> <password>")),
        },
        "logout" => Command::Dispatch(Msg::LogoutClicked),
        "upload" if !rest.is_empty() => Command::Dispatch(Msg::FileChosen {
            path: PathBuf::from(rest),
        }),
        "upload" => return Err(CommandError::Usage("upload <path>")),
        "toggle" => parse_toggle(&args)?,
        "operator" => Command::Dispatch(Msg::TargetOperatorChanged(rest.to_string())),
        "scrub" => Command::Dispatch(Msg::RunScrubClicked),
        "export" => Command::Dispatch(Msg::ExportClicked),
        "copy" => Command::Dispatch(Msg::CopyAllClicked),
        "log" => Command::Dispatch(Msg::LogEntryClicked),
        "history" => Command::Dispatch(Msg::HistoryRequested),
        "stats" => Command::Dispatch(Msg::DbStatsRequested),
        "health" => Command::Dispatch(Msg::HealthCheckRequested),
        "launch" => parse_launch(rest)?,
        "dismiss" => Command::Dispatch(Msg::ScheduleDismissed),
        "back" => Command::Dispatch(Msg::NavigatedAway),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(verb.to_string())),
    };
    Ok(Some(command))
}

fn split_verb(line: &str) -> Option<(&str, &str)> {
    if line.is_empty() {
        return None;
    }
    Some(match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    })
}

fn parse_toggle(args: &[&str]) -> Result<Command, CommandError> {
    const USAGE: &str = "toggle <dnd|sub|unsub|operator> <on|off>";
    let [name, state] = args else {
        return Err(CommandError::Usage(USAGE));
    };
    let filter =
        Filter::from_key(name).ok_or_else(|| CommandError::UnknownFilter(name.to_string()))?;
    let enabled = match state.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => true,
        "off" | "false" | "no" => false,
        _ => return Err(CommandError::Usage(USAGE)),
    };
    Ok(Command::Dispatch(Msg::FilterToggled { filter, enabled }))
}

// Missing fields stay blank so the core reports which one is required.
fn parse_launch(rest: &str) -> Result<Command, CommandError> {
    const USAGE: &str = "launch project=<p> flow=<f> msc=<ip> cli=<mask> [chunk=<n>]";
    let mut schedule = CampaignSchedule::default();
    let mut chunk_size_input = String::new();
    for field in split_fields(rest).ok_or(CommandError::Usage(USAGE))? {
        let Some((key, value)) = field.split_once('=') else {
            return Err(CommandError::Usage(USAGE));
        };
        let slot = match key.to_ascii_lowercase().as_str() {
            "project" => &mut schedule.project_name,
            "flow" => &mut schedule.flow_name,
            "msc" => &mut schedule.msc_ip,
            "cli" => &mut schedule.cli_mask,
            "chunk" => &mut chunk_size_input,
            _ => return Err(CommandError::UnknownField(key.to_string())),
        };
        *slot = value.to_string();
    }
    Ok(Command::Dispatch(Msg::LaunchClicked {
        schedule,
        chunk_size_input,
    }))
}

/// Splits on whitespace outside double quotes; quotes are removed.
/// Returns `None` for an unterminated quote.
fn split_fields(input: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut started = false;
    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                started = true;
            }
            ch if ch.is_whitespace() && !in_quotes => {
                if started {
                    fields.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            ch => {
                current.push(ch);
                started = true;
            }
        }
    }
    if in_quotes {
        return None;
    }
    if started {
        fields.push(current);
    }
    Some(fields)
}
