//! Input and output ports
//!
//! The engine never touches the console. Every decision point reads from an
//! [`InputSource`] and every player-facing line goes to an [`OutputSink`]:
//! - [`ConsoleInput`] / [`ConsoleOutput`] for interactive play
//! - [`ScriptedInput`] / [`RecordingOutput`] for tests and replays

use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Source of player decisions
pub trait InputSource {
    /// Show `prompt` and read one trimmed line; None when input is exhausted
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// Sink for player-facing text
pub trait OutputSink {
    fn emit(&mut self, line: &str);
}

/// Ask a yes/no question until it gets an answer; None when input closes
pub fn confirm(input: &mut dyn InputSource, output: &mut dyn OutputSink, question: &str) -> Option<bool> {
    loop {
        let answer = input.read_line(&format!("{} (y/n) ", question))?;
        match answer.to_lowercase().as_str() {
            "y" | "yes" => return Some(true),
            "n" | "no" => return Some(false),
            _ => output.emit("Please answer y or n."),
        }
    }
}

/// Reads lines from any buffered reader (stdin in the binary)
pub struct ConsoleInput<R: BufRead> {
    reader: R,
}

impl<R: BufRead> ConsoleInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> InputSource for ConsoleInput<R> {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let mut stdout = std::io::stdout();
        // a failed prompt flush is not worth aborting the read
        let _ = write!(stdout, "{}", prompt);
        let _ = stdout.flush();

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

/// Writes each line to stdout
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl OutputSink for ConsoleOutput {
    fn emit(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Replays a fixed list of answers
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    /// Answers not yet consumed
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    /// Every prompt shown so far
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.lines.pop_front().map(|l| l.trim().to_string())
    }
}

/// Keeps every emitted line
#[derive(Debug, Default, Clone)]
pub struct RecordingOutput {
    lines: Vec<String>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines.iter().filter(|l| l.contains(needle)).count()
    }
}

impl OutputSink for RecordingOutput {
    fn emit(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
