//! Interactive picker: one command per input line.
//!
//! The loop is single-threaded. Load completions are applied between
//! commands, so a click issued while data is still loading is ignored.

use crate::highlight::HighlightRole;
use crate::loader::Loader;
use crate::logger::ConsoleLog;
use crate::ops;
use crate::session::{ClickOutcome, PickerSession};
use kemetdata::PlayerCount;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

const WAIT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, PartialEq)]
pub enum ConsoleCmd {
    Players(PlayerCount),
    Click {
        x: f64,
        y: f64,
        width: Option<f64>,
        height: Option<f64>,
    },
    Wait,
    Status,
    Log,
    Help,
    Quit,
}

impl ConsoleCmd {
    pub fn parse(input: &str) -> Result<ConsoleCmd, String> {
        let mut words = input.split_whitespace();
        let cmd = words.next().unwrap_or("");
        let args: Vec<&str> = words.collect();
        let number = |s: &str| {
            s.parse::<f64>()
                .map_err(|_| format!("not a number: {}", s))
        };

        match (cmd, args.as_slice()) {
            ("players", [n]) => n
                .parse::<PlayerCount>()
                .map(ConsoleCmd::Players)
                .map_err(|e| e.to_string()),
            ("click", [x, y]) => Ok(ConsoleCmd::Click {
                x: number(x)?,
                y: number(y)?,
                width: None,
                height: None,
            }),
            ("click", [x, y, w, h]) => Ok(ConsoleCmd::Click {
                x: number(x)?,
                y: number(y)?,
                width: Some(number(w)?),
                height: Some(number(h)?),
            }),
            ("wait", []) => Ok(ConsoleCmd::Wait),
            ("status", []) => Ok(ConsoleCmd::Status),
            ("log", []) => Ok(ConsoleCmd::Log),
            ("help", []) => Ok(ConsoleCmd::Help),
            ("quit" | "exit", []) => Ok(ConsoleCmd::Quit),
            _ => Err(format!("cmd not recognized: {}", input.trim())),
        }
    }
}

const HELP: &str = "\
players N        switch player count (reloads map data)
click X Y [W H]  click at X,Y on the map displayed at WxH (default: native size)
wait             wait for loading to finish
status           show selection and load state
log              show recent log lines
quit             leave";

pub struct Console<W: Write> {
    session: PickerSession,
    loader: Loader,
    log: ConsoleLog,
    out: W,
}

impl<W: Write> Console<W> {
    /// Starts a session and kicks off loading for its initial player count.
    pub fn new(session: PickerSession, loader: Loader, log: ConsoleLog, out: W) -> Self {
        let mut console = Self {
            session,
            loader,
            log,
            out,
        };
        let players = console.session.players();
        console.select(players);
        console
    }

    pub fn session(&self) -> &PickerSession {
        &self.session
    }

    fn select(&mut self, players: PlayerCount) {
        let request = self.session.select(players);
        self.loader.request(request);
    }

    /// Applies whatever completions have arrived.
    fn pump(&mut self) {
        for event in self.loader.poll() {
            self.session.apply(event);
        }
    }

    /// Blocks until the current selection is usable or one of its loads failed.
    fn wait_ready(&mut self) {
        let deadline = Instant::now() + WAIT_TIMEOUT;
        while !self.session.is_ready() && !self.session.load_failed() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                log::warn!("Still loading after {:?}", WAIT_TIMEOUT);
                return;
            }
            if let Some(event) = self.loader.wait(remaining) {
                self.session.apply(event);
            }
        }
    }

    pub fn run<R: BufRead>(&mut self, input: R) -> std::io::Result<()> {
        writeln!(self.out, "{}", self.session.panel())?;
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            self.pump();

            let cmd = match ConsoleCmd::parse(&line) {
                Ok(cmd) => cmd,
                Err(e) => {
                    writeln!(self.out, "{}", e)?;
                    continue;
                }
            };
            if cmd == ConsoleCmd::Quit {
                break;
            }
            self.execute(cmd)?;
        }
        self.out.flush()
    }

    fn execute(&mut self, cmd: ConsoleCmd) -> std::io::Result<()> {
        match cmd {
            ConsoleCmd::Players(players) => {
                self.select(players);
                writeln!(self.out, "{}", self.session.panel())?;
            }
            ConsoleCmd::Click {
                x,
                y,
                width,
                height,
            } => {
                let (point, size) = ops::display_click(&self.session, x, y, width, height);
                match self.session.click(point, size) {
                    ClickOutcome::Ignored if self.session.load_failed() => {
                        writeln!(self.out, "{}", self.session.panel())?;
                    }
                    ClickOutcome::Ignored if !self.session.is_ready() => {
                        writeln!(self.out, "Map is still loading")?;
                    }
                    ClickOutcome::Ignored => {
                        writeln!(self.out, "Click ({}, {}) is outside the map", x, y)?;
                    }
                    ClickOutcome::Selected(_) => {
                        writeln!(self.out, "{}", self.session.panel())?;
                        if self.session.highlights().is_empty() {
                            return Ok(());
                        }
                        let layers: Vec<String> = self
                            .session
                            .highlights()
                            .layers()
                            .iter()
                            .map(|h| match h.role {
                                HighlightRole::Selected => format!("{} (selected)", h.region),
                                HighlightRole::Adjacent => h.region.clone(),
                            })
                            .collect();
                        writeln!(self.out, "Highlights: {}", layers.join(", "))?;
                    }
                    ClickOutcome::Empty | ClickOutcome::Unknown(_) => {
                        writeln!(self.out, "{}", self.session.panel())?;
                    }
                }
            }
            ConsoleCmd::Wait => {
                self.wait_ready();
                writeln!(self.out, "{}", self.status_line())?;
                if !self.session.is_ready() {
                    writeln!(self.out, "{}", self.session.panel())?;
                }
            }
            ConsoleCmd::Status => {
                writeln!(self.out, "{}", self.status_line())?;
            }
            ConsoleCmd::Log => {
                for (level, msg) in self.log.get_lines() {
                    writeln!(self.out, "[{}] {}", level, msg)?;
                }
            }
            ConsoleCmd::Help => {
                writeln!(self.out, "{}", HELP)?;
            }
            ConsoleCmd::Quit => {}
        }
        Ok(())
    }

    fn status_line(&self) -> String {
        let state = if self.session.is_ready() {
            let regions = self.session.catalog().map_or(0, |c| c.len());
            match self.session.native_size() {
                Some((w, h)) => format!("ready, {} regions, hitbox {}x{}", regions, w, h),
                None => format!("ready, {} regions", regions),
            }
        } else if self.session.load_failed() {
            self.session.panel().to_string()
        } else {
            "loading".to_string()
        };
        format!(
            "Players: {} (request {:?}): {}",
            self.session.players(),
            self.session.latest_token(),
            state
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{create_mock_assets, three_players};
    use std::io::Cursor;
    use tempfile::tempdir;

    fn run_script(script: &str) -> String {
        let dir = tempdir().unwrap();
        let layout = create_mock_assets(dir.path());
        let session = PickerSession::new(layout.clone(), three_players());
        let mut out = Vec::new();
        {
            let mut console =
                Console::new(session, Loader::new(layout), ConsoleLog::new(10), &mut out);
            console.run(Cursor::new(script)).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            ConsoleCmd::parse("players 4").unwrap(),
            ConsoleCmd::Players(PlayerCount::new(4).unwrap())
        );
        assert_eq!(
            ConsoleCmd::parse("click 1.5 2").unwrap(),
            ConsoleCmd::Click {
                x: 1.5,
                y: 2.0,
                width: None,
                height: None
            }
        );
        assert_eq!(
            ConsoleCmd::parse("  click 1 2 800 600 ").unwrap(),
            ConsoleCmd::Click {
                x: 1.0,
                y: 2.0,
                width: Some(800.0),
                height: Some(600.0)
            }
        );
        assert!(ConsoleCmd::parse("click 1").is_err());
        assert!(ConsoleCmd::parse("click a b").is_err());
        assert!(ConsoleCmd::parse("players 0").is_err());
        assert!(ConsoleCmd::parse("dance").is_err());
    }

    #[test]
    fn test_script_select_and_click() {
        let out = run_script("wait\nclick 0.5 0.5\nclick 2.5 0.5\nclick 3.5 0.5\nquit\n");
        assert!(out.starts_with("Click on the map to select a region\n"));
        assert!(out.contains("Players: 3"));
        assert!(out.contains("ID: A\nName: Thebes"));
        assert!(out.contains("Highlights: B, A (selected)"));
        assert!(out.contains("Empty area"));
        assert!(out.contains("Unknown region (color: #123456)"));
    }

    #[test]
    fn test_script_failed_count_then_recover() {
        let out = run_script("players 7\nwait\nplayers 3\nwait\nclick 0 1\n");
        assert!(out.contains("Failed to load map data"));
        assert!(out.contains("Name: Desert"));
    }

    #[test]
    fn test_script_missing_hitbox_reports_failure() {
        // 4 players has map data but no hitbox image
        let out = run_script("players 4\nwait\nclick 0 0 4 2\nstatus\n");
        assert!(!out.contains("Map is still loading"));
        assert!(!out.contains(": loading"));

        let tail: Vec<&str> = out.lines().rev().take(2).collect();
        assert_eq!(
            tail,
            vec![
                "Players: 4 (request RequestToken(2)): Failed to load map data",
                "Failed to load map data",
            ]
        );
    }

    #[test]
    fn test_console_session_state() {
        let dir = tempdir().unwrap();
        let layout = create_mock_assets(dir.path());
        let session = PickerSession::new(layout.clone(), three_players());
        let mut out = Vec::new();
        let mut console =
            Console::new(session, Loader::new(layout), ConsoleLog::new(10), &mut out);
        console.run(Cursor::new("wait\nclick 1 0\n")).unwrap();
        assert!(console.session().is_ready());
        assert!(!console.session().highlights().is_empty());
    }
}
