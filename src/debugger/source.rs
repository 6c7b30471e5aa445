use std::io::{self, BufRead, IsTerminal};

use console::Term;

use super::interrupt::{Interrupt, Signal};

#[derive(Debug)]
pub enum Source {
    Argument(Argument),
    Stdin(Stdin),
    Terminal(Terminal),
}

/// Command-line argument, lines separated by `\n` or `;`.
#[derive(Debug)]
pub struct Argument {
    buffer: String,
    /// Byte index
    cursor: usize,
}

/// Stdin which is not attached to a terminal, i.e. piped.
///
/// Shares the process-wide stdin buffer with program input.
#[derive(Debug)]
pub struct Stdin {
    buffer: String,
}

/// Interactive terminal, with line editing.
#[derive(Debug)]
pub struct Terminal {
    term: Term,
    buffer: String,
    /// Raw mode delivers Ctrl-C here instead of to the signal handler.
    interrupt: Interrupt,
}

pub trait SourceReader {
    /// `None` indicates EOF
    /// Returned string slice MAY include leading or trailing whitespace
    fn read(&mut self, prompt: &str) -> Option<&str>;
}

impl Source {
    pub fn from(argument: Option<String>, interrupt: Interrupt) -> Self {
        if let Some(argument) = argument {
            return Source::Argument(Argument::from(argument));
        }
        if io::stdin().is_terminal() && io::stderr().is_terminal() {
            return Source::Terminal(Terminal::new(interrupt));
        }
        Source::Stdin(Stdin::new())
    }
}

impl SourceReader for Source {
    fn read(&mut self, prompt: &str) -> Option<&str> {
        let line = match self {
            Self::Argument(argument) => argument.read(prompt),
            Self::Stdin(stdin) => stdin.read(prompt),
            Self::Terminal(terminal) => return terminal.read(prompt),
        }?;
        // Echo prompt and line for non-terminal sources, so transcripts read like a session
        dprintln!(Always, Special, "{}{}", prompt, line.trim());
        Some(line)
    }
}

impl Argument {
    pub fn from(source: String) -> Self {
        Self {
            buffer: source,
            cursor: 0,
        }
    }
}

impl SourceReader for Argument {
    fn read(&mut self, _prompt: &str) -> Option<&str> {
        if self.cursor >= self.buffer.len() {
            return None;
        }

        let start = self.cursor;
        let rest = &self.buffer[start..];
        let len = rest.find(['\n', ';']).unwrap_or(rest.len());
        // Skip delimiter
        self.cursor = start + len + 1;

        self.buffer.get(start..start + len)
    }
}

impl Stdin {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }
}

impl SourceReader for Stdin {
    fn read(&mut self, _prompt: &str) -> Option<&str> {
        self.buffer.clear();
        match io::stdin().lock().read_line(&mut self.buffer) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(self.buffer.trim_end_matches(['\n', '\r'])),
        }
    }
}

impl Terminal {
    pub fn new(interrupt: Interrupt) -> Self {
        Self {
            term: Term::stderr(),
            buffer: String::new(),
            interrupt,
        }
    }

    /// Store a line read from the terminal, or act on Ctrl-C.
    ///
    /// Returns `Some(false)` if the prompt should be shown again, `None` on EOF.
    fn accept(&mut self, line: io::Result<String>) -> Option<bool> {
        match line {
            Ok(line) => {
                self.buffer = line;
                Some(true)
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => match self.interrupt.raise() {
                Signal::Pause => {
                    dprintln!(Always, Warning, "^C");
                    dprintln!(
                        Always,
                        Warning,
                        "Will pause again after resuming. Press Ctrl-C again to exit."
                    );
                    Some(false)
                }
                Signal::Exit { .. } => {
                    dprintln!(Always, Warning, "^C");
                    self.buffer = "x".to_string();
                    Some(true)
                }
            },
            Err(_) => None,
        }
    }
}

impl SourceReader for Terminal {
    fn read(&mut self, prompt: &str) -> Option<&str> {
        loop {
            let _ = self.term.write_str(prompt);
            let line = self.term.read_line();
            if self.accept(line)? {
                return Some(&self.buffer);
            }
        }
    }
}
