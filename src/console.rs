//! Terminal front end: modal dialogs, admin commands and plain-text views.

use crate::admin::VehicleTable;
use crate::recognition::RecognitionPanel;
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Blocking user dialogs, like the browser's `alert` and `confirm`.
pub trait Dialogs {
    fn alert(&mut self, message: &str);
    fn confirm(&mut self, question: &str) -> bool;
}

pub struct TerminalDialogs<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalDialogs<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalDialogs { input, output }
    }

    /// Prints `prompt` and reads one line; `None` on end of input.
    pub fn prompt(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.output, "{}", prompt);
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Dialogs for TerminalDialogs<R, W> {
    fn alert(&mut self, message: &str) {
        let _ = writeln!(self.output, "! {}", message);
        let _ = self.output.flush();
    }

    fn confirm(&mut self, question: &str) -> bool {
        let _ = write!(self.output, "{} [y/N] ", question);
        let _ = self.output.flush();
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add { plate: String, note: String },
    Delete(String),
    Click(usize),
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.find(char::is_whitespace) {
            Some(i) => (&line[..i], line[i..].trim()),
            None => (line, ""),
        };
        match word {
            "list" | "ls" => Ok(Command::List),
            "add" => {
                let (plate, note) = match rest.find(char::is_whitespace) {
                    Some(i) => (&rest[..i], rest[i..].trim()),
                    None => (rest, ""),
                };
                Ok(Command::Add {
                    plate: plate.to_string(),
                    note: note.to_string(),
                })
            }
            "delete" | "rm" if !rest.is_empty() => Ok(Command::Delete(rest.to_string())),
            "click" => rest
                .parse()
                .map(Command::Click)
                .map_err(|_| format!("Not a row number: '{}'", rest)),
            "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(format!("Unknown command: '{}'", line)),
        }
    }
}

pub const HELP: &str = "\
list                 reload the vehicle list
add <plate> [note]   add a plate to the whitelist
delete <plate>       remove a plate (asks first)
click <row>          press the delete button of a row (0-based)
show                 print the page as HTML
quit                 leave";

pub fn render_table_text(table: &VehicleTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<4} {:<16} {}\n", "#", "Plate", "Note"));
    let mut row = 0;
    while let Some(cells) = table.cells(row) {
        let plate = cells.get(0).map(String::as_str).unwrap_or("");
        let note = cells.get(1).map(String::as_str).unwrap_or("");
        out.push_str(&format!("{:<4} {:<16} {}\n", row, plate, note));
        row += 1;
    }
    if row == 0 {
        out.push_str("(no vehicles)\n");
    }
    out
}

pub fn render_panel_text(panel: &RecognitionPanel) -> String {
    let mut out = format!(
        "Plate: {}  Confidence: {}  Status: {}\n",
        panel.plate(),
        panel.confidence(),
        panel.status()
    );
    for line in panel.recent() {
        out.push_str("  ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}
