use std::collections::VecDeque;
use std::io::{self, IsTerminal, Read, Write};

use console::Term;

use crate::debugger::Interrupt;

/// Byte stream used by the `in` and `out` instructions.
pub trait CharDevice {
    fn write_byte(&mut self, byte: u8);
    /// Blocks until a byte is available, input ends, or the read is interrupted.
    fn read_byte(&mut self) -> Input;
    fn flush(&mut self);
}

/// Outcome of [`CharDevice::read_byte`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Byte(u8),
    End,
    /// No byte was consumed. The `in` instruction runs again after the next checkpoint.
    Interrupted,
}

/// Standard output, and standard input or an interactive terminal.
pub struct Terminal {
    stdout: io::Stdout,
    /// Set if stdin is an interactive terminal.
    term: Option<Term>,
    /// Remainder of the last line read from `term`.
    line: VecDeque<u8>,
    /// Raw mode delivers Ctrl-C to `term` instead of the signal handler.
    interrupt: Interrupt,
}

impl Terminal {
    pub fn new(interrupt: Interrupt) -> Self {
        let term = io::stdin().is_terminal().then(Term::stdout);
        Self {
            stdout: io::stdout(),
            term,
            line: VecDeque::new(),
            interrupt,
        }
    }

    /// Queue a line read from the terminal, followed by a newline.
    ///
    /// Returns the outcome of the read if nothing was queued.
    fn queue_line(&mut self, line: io::Result<String>) -> Option<Input> {
        match line {
            Ok(line) => {
                self.line.extend(line.bytes());
                self.line.push_back(b'\n');
                None
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                self.interrupt.raise();
                Some(Input::Interrupted)
            }
            Err(_) => Some(Input::End),
        }
    }
}

impl CharDevice for Terminal {
    fn write_byte(&mut self, byte: u8) {
        // Nothing sensible to do if stdout is closed
        let _ = self.stdout.write_all(&[byte]);
    }

    fn read_byte(&mut self) -> Input {
        // Program may have prompted without a trailing newline
        self.flush();

        let Some(term) = &self.term else {
            let mut buf = [0; 1];
            return match io::stdin().read(&mut buf) {
                Ok(1) => Input::Byte(buf[0]),
                // Signal handler has already seen the signal
                Err(err) if err.kind() == io::ErrorKind::Interrupted => Input::Interrupted,
                _ => Input::End,
            };
        };

        // Read whole lines so the terminal handles echo and editing
        if self.line.is_empty() {
            let line = term.read_line();
            if let Some(input) = self.queue_line(line) {
                return input;
            }
        }
        self.line.pop_front().map_or(Input::End, Input::Byte)
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

/// In-memory device, for running programs without a terminal.
#[derive(Debug, Default)]
pub struct BufferDevice {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl BufferDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: impl AsRef<[u8]>) -> Self {
        Self {
            input: input.as_ref().iter().copied().collect(),
            output: Vec::new(),
        }
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl CharDevice for BufferDevice {
    fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }

    fn read_byte(&mut self) -> Input {
        self.input.pop_front().map_or(Input::End, Input::Byte)
    }

    fn flush(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_device_round_trips_bytes() {
        let mut device = BufferDevice::with_input("ab");
        assert_eq!(device.read_byte(), Input::Byte(b'a'));
        assert_eq!(device.read_byte(), Input::Byte(b'b'));
        assert_eq!(device.read_byte(), Input::End);

        device.write_byte(b'h');
        device.write_byte(b'i');
        assert_eq!(device.output_string(), "hi");
    }

    #[test]
    fn terminal_ctrl_c_interrupts_instead_of_ending_input() {
        let interrupt = Interrupt::new();
        let mut terminal = Terminal::new(interrupt.clone());

        let ctrl_c = Err(io::Error::from(io::ErrorKind::Interrupted));
        assert_eq!(terminal.queue_line(ctrl_c), Some(Input::Interrupted));
        assert!(interrupt.is_pending());
        assert!(terminal.line.is_empty());

        assert_eq!(terminal.queue_line(Ok("ok".to_string())), None);
        assert_eq!(terminal.line, [b'o', b'k', b'\n']);

        let eof = Err(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert_eq!(terminal.queue_line(eof), Some(Input::End));
    }
}
