//! Interactive session shell
//!
//! One command per line. Errors are printed and the session carries on;
//! only `quit` or end of input ends it.

use crate::callbacks::ConsoleNotifier;
use crate::events::FeedPump;
use crate::report::{AlertTable, Dashboard, DetailsView};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use mine_safety_core::{AlertId, MineSite, Position, Role, SafetyError, Transition, WorkerRef};
use std::io::{BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

const HELP: &str = "\
Commands:
  dashboard                       Show the dashboard for the current role
  alerts                          List emergency alerts (newest first)
  sos <location>                  Raise an SOS as the logged-in worker
  raise <worker_id> <location>    Raise an alert for a crew member
  respond <alert_id>              Mark an active alert as responding
  resolve <alert_id>              Mark a responding alert as resolved
  click <x> <y>                   Click the mine map
  tick [n]                        Advance the random alert feed n ticks
  tasks                           List my tasks
  toggle <task_id>                Toggle a task between pending and done
  hazard <location> | <details>   File a hazard report
  attend                          Mark today's attendance
  leave <from> <to> <reason>      Request leave (dates as YYYY-MM-DD)
  approve-leave <id>              Approve a pending leave request
  reject-leave <id>               Reject a pending leave request
  present <worker_id>             Toggle a crew member's attendance
  validate <task_id>              Validate a logged task
  reject <task_id>                Reject a logged task
  export <report_id>              Print a ready compliance report as JSON
  help                            Show this help
  quit                            Leave the shell";

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (try 'help')")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// A parsed shell command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    Dashboard,
    Alerts,
    Sos { location: String },
    Raise { worker_id: u32, location: String },
    Respond(AlertId),
    Resolve(AlertId),
    Click(Position),
    Tick(u32),
    Tasks,
    Toggle(u32),
    Hazard { location: String, description: String },
    Attend,
    Leave { from: NaiveDate, to: NaiveDate, reason: String },
    ApproveLeave(u32),
    RejectLeave(u32),
    Present(u32),
    Validate(u32),
    Reject(u32),
    Export(u32),
}

fn number<T: FromStr>(arg: Option<&str>, usage: &'static str) -> Result<T, ParseError> {
    let arg = arg.ok_or(ParseError::Usage(usage))?;
    arg.parse().map_err(|_| ParseError::InvalidNumber(arg.to_string()))
}

fn date(arg: Option<&str>, usage: &'static str) -> Result<NaiveDate, ParseError> {
    let arg = arg.ok_or(ParseError::Usage(usage))?;
    NaiveDate::parse_from_str(arg, "%Y-%m-%d").map_err(|_| ParseError::InvalidDate(arg.to_string()))
}

fn rest(words: &[&str], usage: &'static str) -> Result<String, ParseError> {
    if words.is_empty() {
        return Err(ParseError::Usage(usage));
    }
    Ok(words.join(" "))
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, ParseError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            return Err(ParseError::Empty);
        };
        let arg = |i: usize| args.get(i).copied();

        let command = match name.to_ascii_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "dashboard" => Command::Dashboard,
            "alerts" => Command::Alerts,
            "sos" => Command::Sos {
                location: rest(args, "sos <location>")?,
            },
            "raise" => {
                const USAGE: &str = "raise <worker_id> <location>";
                let worker_id = number(arg(0), USAGE)?;
                Command::Raise {
                    worker_id,
                    location: rest(&args[1..], USAGE)?,
                }
            }
            "respond" => Command::Respond(AlertId(number(arg(0), "respond <alert_id>")?)),
            "resolve" => Command::Resolve(AlertId(number(arg(0), "resolve <alert_id>")?)),
            "click" => {
                const USAGE: &str = "click <x> <y>";
                Command::Click(Position::new(number(arg(0), USAGE)?, number(arg(1), USAGE)?))
            }
            "tick" => match arg(0) {
                Some(_) => Command::Tick(number(arg(0), "tick [n]")?),
                None => Command::Tick(1),
            },
            "tasks" => Command::Tasks,
            "toggle" => Command::Toggle(number(arg(0), "toggle <task_id>")?),
            "hazard" => {
                const USAGE: &str = "hazard <location> | <details>";
                let text = rest(args, USAGE)?;
                let (location, description) = text.split_once('|').ok_or(ParseError::Usage(USAGE))?;
                Command::Hazard {
                    location: location.trim().to_string(),
                    description: description.trim().to_string(),
                }
            }
            "attend" => Command::Attend,
            "leave" => {
                const USAGE: &str = "leave <from> <to> <reason>";
                Command::Leave {
                    from: date(arg(0), USAGE)?,
                    to: date(arg(1), USAGE)?,
                    reason: rest(args.get(2..).unwrap_or_default(), USAGE)?,
                }
            }
            "approve-leave" => Command::ApproveLeave(number(arg(0), "approve-leave <id>")?),
            "reject-leave" => Command::RejectLeave(number(arg(0), "reject-leave <id>")?),
            "present" => Command::Present(number(arg(0), "present <worker_id>")?),
            "validate" => Command::Validate(number(arg(0), "validate <task_id>")?),
            "reject" => Command::Reject(number(arg(0), "reject <task_id>")?),
            "export" => Command::Export(number(arg(0), "export <report_id>")?),
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };

        Ok(command)
    }
}

/// Whether the session keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive session over one site
pub struct Session {
    role: Role,
    site: MineSite,
    pump: FeedPump,
    notifier: ConsoleNotifier,
}

impl Session {
    pub fn new(role: Role, site: MineSite, notifier: ConsoleNotifier) -> Result<Self> {
        let pump = FeedPump::new(&site.config.feed)?;
        Ok(Self {
            role,
            site,
            pump,
            notifier,
        })
    }

    pub fn site(&self) -> &MineSite {
        &self.site
    }

    /// Read commands until `quit` or end of input
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> Result<()> {
        writeln!(out, "{} session. Type 'help' for commands.", self.role.dashboard_title())?;

        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "✗ {}", e)?;
                    continue;
                }
            };

            log::debug!("Shell command: {:?}", command);
            match self.execute(command, &mut out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => writeln!(out, "✗ {:#}", e)?,
            }
            out.flush()?;
        }

        Ok(())
    }

    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow> {
        match command {
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Dashboard => write!(out, "{}", Dashboard { role: self.role, site: &self.site })?,
            Command::Alerts => write!(out, "{}", AlertTable(&self.site.alerts))?,
            Command::Sos { location } => {
                let alert = self.site.raise_sos(&location, &mut self.notifier)?;
                writeln!(out, "Alert #{} raised", alert.id)?;
            }
            Command::Raise { worker_id, location } => {
                let worker = self
                    .site
                    .supervisor
                    .crew
                    .iter()
                    .find(|m| m.id == worker_id)
                    .map(|m| WorkerRef::new(m.id, m.name.clone()))
                    .ok_or(SafetyError::WorkerNotFound(worker_id))?;
                let alert = self.site.raise_for(worker, &location, &mut self.notifier)?;
                writeln!(out, "Alert #{} raised", alert.id)?;
            }
            Command::Respond(id) => {
                let outcome = self.site.respond(id, &mut self.notifier);
                report_transition(out, id, outcome)?;
            }
            Command::Resolve(id) => {
                let outcome = self.site.resolve(id, &mut self.notifier);
                report_transition(out, id, outcome)?;
            }
            Command::Click(point) => {
                write!(out, "{}", DetailsView(self.site.click(point)))?;
            }
            Command::Tick(n) => {
                let summary = self.pump.run(&mut self.site, n, false, &mut self.notifier)?;
                writeln!(
                    out,
                    "{} ticks, {} alerts raised, {} dropped",
                    summary.ticks, summary.raised, summary.dropped
                )?;
            }
            Command::Tasks => {
                for task in &self.site.worker.tasks {
                    writeln!(out, "  {:<2} {:<8} {}", task.id, task.status.to_string(), task.title)?;
                }
            }
            Command::Toggle(id) => {
                let status = self.site.worker.toggle_task(id)?;
                writeln!(out, "Task {} is now {}", id, status)?;
            }
            Command::Hazard { location, description } => {
                let report = self.site.worker.submit_hazard(&description, &location, Utc::now())?;
                writeln!(out, "Hazard report #{} submitted", report.id)?;
            }
            Command::Attend => {
                if self.site.worker.mark_attendance() {
                    writeln!(out, "✓ Attendance marked for today")?;
                } else {
                    writeln!(out, "Attendance already marked")?;
                }
            }
            Command::Leave { from, to, reason } => {
                let request = self.site.request_leave(from, to, &reason)?;
                writeln!(
                    out,
                    "Leave request #{} submitted ({} days)",
                    request.id,
                    request.days()
                )?;
            }
            Command::ApproveLeave(id) => {
                let status = self.site.approve_leave(id)?;
                writeln!(out, "Leave request #{} is {}", id, status)?;
            }
            Command::RejectLeave(id) => {
                let status = self.site.reject_leave(id)?;
                writeln!(out, "Leave request #{} is {}", id, status)?;
            }
            Command::Present(id) => {
                let present = self.site.supervisor.toggle_attendance(id)?;
                writeln!(
                    out,
                    "Worker {} marked {}",
                    id,
                    if present { "present" } else { "absent" }
                )?;
            }
            Command::Validate(id) => {
                self.site.supervisor.validate_task(id)?;
                writeln!(out, "Task #{} validated", id)?;
            }
            Command::Reject(id) => {
                let entry = self.site.supervisor.reject_task(id)?;
                writeln!(out, "Task #{} ({}) rejected", entry.id, entry.title)?;
            }
            Command::Export(id) => {
                let json = self.site.regulator.export_report(id)?;
                writeln!(out, "{}", json)?;
            }
        }

        Ok(Flow::Continue)
    }
}

fn report_transition(out: &mut impl Write, id: AlertId, outcome: Transition) -> Result<()> {
    match outcome {
        Transition::Applied { status } => writeln!(out, "Alert #{} is now {}", id, status)?,
        Transition::Unchanged { status } => writeln!(out, "Alert #{} is {}; nothing to do", id, status)?,
        Transition::NotFound => writeln!(out, "No alert #{} in the log", id)?,
    }
    Ok(())
}
