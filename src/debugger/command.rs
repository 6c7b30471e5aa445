use std::fmt;
use std::vec;

/// A debugger command, selected by the first character of a line.
///
/// Arguments may follow on the same line, separated by whitespace. Missing arguments are prompted
/// for by the debugger.
#[derive(Debug)]
pub struct Command {
    pub name: CommandName,
    pub args: vec::IntoIter<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandName {
    /// `q`, or an empty line
    Resume,
    /// `s`
    Step,
    /// `x`
    Exit,
    /// `h`
    Help,
    /// `r`
    ReadRegister,
    /// `w`
    WriteRegister,
    /// `a`
    Jump,
    /// `b`
    Break,
    /// `d`
    Trace,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommandError {
    Unknown(char),
    /// A token which could not be read as a decimal word.
    InvalidInteger(String),
    OutOfRange { value: u16, max: u16 },
}

impl CommandName {
    fn from_char(ch: char) -> Option<Self> {
        let name = match ch {
            'q' => Self::Resume,
            's' => Self::Step,
            'x' => Self::Exit,
            'h' | '?' => Self::Help,
            'r' => Self::ReadRegister,
            'w' => Self::WriteRegister,
            'a' => Self::Jump,
            'b' => Self::Break,
            'd' => Self::Trace,
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resume => write!(f, "resume"),
            Self::Step => write!(f, "step"),
            Self::Exit => write!(f, "exit"),
            Self::Help => write!(f, "help"),
            Self::ReadRegister => write!(f, "read register"),
            Self::WriteRegister => write!(f, "write register"),
            Self::Jump => write!(f, "jump"),
            Self::Break => write!(f, "breakpoint"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

impl TryFrom<&str> for Command {
    type Error = CommandError;

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let line = line.trim();
        let mut chars = line.chars();
        let name = match chars.next() {
            None => CommandName::Resume,
            Some(ch) => CommandName::from_char(ch).ok_or(CommandError::Unknown(ch))?,
        };
        Ok(Command {
            name,
            args: chars
                .as_str()
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
                .into_iter(),
        })
    }
}

/// Parse a decimal word no greater than `max`.
pub fn parse_integer(token: &str, max: u16) -> Result<u16, CommandError> {
    let token = token.trim();
    let value: u16 = token
        .parse()
        .map_err(|_| CommandError::InvalidInteger(token.to_string()))?;
    if value > max {
        return Err(CommandError::OutOfRange { value, max });
    }
    Ok(value)
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(ch) => write!(f, "Unknown command `{}`.", ch),
            Self::InvalidInteger(token) => {
                write!(f, "`{}` is not a decimal integer in range 0 to 65535.", token)
            }
            Self::OutOfRange { value, max } => {
                write!(f, "{} is out of range. Must be at most {}.", value, max)
            }
        }
    }
}
