use std::cell::RefCell;
use std::str::Chars;

use colored::{ColoredString, Colorize};

use crate::memory::MEMORY_SIZE;
use crate::runtime::RunState;

/// Print debugger text to stderr.
///
/// Takes a [`Condition`] and a [`Kind`], then format arguments.
#[macro_export]
macro_rules! dprint {
    ( $cond:ident, $kind:ident, $fmt:literal $($tt:tt)* ) => {{
        let s = format!($fmt $($tt)*);
        $crate::output::Output::Debugger(
            $crate::output::Condition::$cond,
            $crate::output::Kind::$kind,
        )
        .print_str(&s);
    }};
}

#[macro_export]
macro_rules! dprintln {
    ( $cond:ident ) => {{
        $crate::output::Output::Debugger(
            $crate::output::Condition::$cond,
            $crate::output::Kind::Normal,
        )
        .print_str("\n");
    }};
    ( $cond:ident, $kind:ident, $fmt:literal $($tt:tt)* ) => {{
        let s = format!(concat!($fmt, "\n") $($tt)*);
        $crate::output::Output::Debugger(
            $crate::output::Condition::$cond,
            $crate::output::Kind::$kind,
        )
        .print_str(&s);
    }};
}

#[derive(Clone, Copy, Debug)]
pub enum Output {
    Debugger(Condition, Kind),
}

/// Whether text survives `--minimal`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    Always,
    Sometimes,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Kind {
    #[default]
    Normal,
    Info,
    Warning,
    Error,
    Trace,
    Special,
}

struct Decolored<'a> {
    chars: Chars<'a>,
}

impl Output {
    thread_local! {
        static IS_LINE_START: RefCell<bool> = const { RefCell::new(true) };
        static IS_MINIMAL: RefCell<bool> = const { RefCell::new(false) };
    }

    pub fn set_minimal(new_value: bool) -> bool {
        Self::IS_MINIMAL.with(|value| value.replace(new_value))
    }
    pub fn is_minimal() -> bool {
        Self::IS_MINIMAL.with(|value| *value.borrow())
    }

    /// Program output on stdout moves the shared cursor too.
    pub fn set_line_start(new_value: bool) -> bool {
        Self::IS_LINE_START.with(|value| value.replace(new_value))
    }
    fn is_line_start() -> bool {
        Self::IS_LINE_START.with(|value| *value.borrow())
    }

    fn set_line_start_from_str(string: &str) {
        if let Some(ch) = Decolored::new(string).last() {
            Output::set_line_start(ch == '\n');
        }
    }

    pub fn print_str(&self, string: &str) {
        let Self::Debugger(condition, kind) = *self;
        match (Self::is_minimal(), condition) {
            (false, _) => {
                eprint!("{}", kind.paint(string));
            }
            // Always remove color if `--minimal`
            (true, Condition::Always) => {
                eprint!("{}", Decolored::new(string).collect::<String>());
            }
            (true, Condition::Sometimes) => return,
        }
        Self::set_line_start_from_str(string);
    }

    pub fn start_new_line(&self) {
        if !Self::is_line_start() {
            self.print_str("\n");
        }
    }

    /// Registers, stack, instruction pointer and breakpoint.
    pub fn print_state(&self, state: &RunState, breakpoint: u16) {
        let registers = state.space().registers();

        if Self::is_minimal() {
            let registers: Vec<_> = registers.iter().map(u16::to_string).collect();
            let stack: Vec<_> = state.stack().iter().map(u16::to_string).collect();
            self.print_str(&format!("Registers: [{}]\n", registers.join(" ")));
            self.print_str(&format!("Stack: [{}]\n", stack.join(" ")));
            self.print_str(&format!("Pointer: {}\n", state.pc()));
            self.print_str(&format!("Breakpoint: {}\n", breakpoint));
            return;
        }

        self.print_str("\x1b[2m┌─────────────────────────────────┐\x1b[0m\n");
        self.print_str("\x1b[2m│        \x1b[3mdec     hex    char\x1b[0m\x1b[2m      │\x1b[0m\n");
        for (i, value) in registers.iter().enumerate() {
            self.print_str("\x1b[2m│\x1b[0m");
            self.print_str(&format!(" \x1b[1mr{}\x1b[0m  ", i));
            self.print_integer(*value);
            self.print_str(" \x1b[2m│\x1b[0m\n");
        }
        self.print_str("\x1b[2m├─────────────────────────────────┤\x1b[0m\n");
        let breakpoint = if (breakpoint as usize) < MEMORY_SIZE {
            format!("{:>5}", breakpoint)
        } else {
            "  off".to_string()
        };
        self.print_str(&format!(
            "\x1b[2m│\x1b[0m \x1b[1mip\x1b[0m  {:>5}            \x1b[1mbp\x1b[0m  {} \x1b[2m│\x1b[0m\n",
            state.pc(),
            breakpoint,
        ));
        self.print_str("\x1b[2m└─────────────────────────────────┘\x1b[0m\n");

        self.print_str(&format!(" \x1b[1mstack\x1b[0m ({})", state.stack().depth()));
        for value in state.stack() {
            self.print_str(&format!(" {}", value));
        }
        self.print_str("\n");
    }

    pub fn print_integer(&self, value: u16) {
        if Self::is_minimal() {
            self.print_str(&format!("{}", value));
            return;
        }
        self.print_str(&format!("{:>5}  ", value));
        self.print_str(&format!("0x{:04x}  ", value));
        self.print_char_display(value);
    }

    fn print_char_display(&self, value: u16) {
        match value {
            0x00 => self.print_str("NUL  "),
            0x09 => self.print_str("HT   "),
            0x0a => self.print_str("LF   "),
            0x0d => self.print_str("CR   "),
            0x1b => self.print_str("ESC  "),
            0x7f => self.print_str("DEL  "),
            0x20 => self.print_str("[_]  "),
            0x21..=0x7e => self.print_str(&format!("{:<5}", value as u8 as char)),
            0x00..=0x7f => self.print_str("\x1b[2m───\x1b[0m  "),
            0x0080.. => self.print_str("\x1b[2m┄┄┄\x1b[0m  "),
        }
    }
}

impl Kind {
    fn paint(self, string: &str) -> ColoredString {
        let string = ColoredString::from(string);
        match self {
            Self::Normal => string,
            Self::Info => string.blue(),
            Self::Warning => string.yellow(),
            Self::Error => string.red(),
            Self::Trace => string.dimmed(),
            Self::Special => string.cyan(),
        }
    }
}

impl<'a> Decolored<'a> {
    pub fn new(string: &'a str) -> Self {
        Self {
            chars: string.chars(),
        }
    }
}

impl<'a> Iterator for Decolored<'a> {
    type Item = char;
    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ch) = self.chars.next() {
            // Drop escape sequences up to and including the final 'm'
            if ch == '\x1b' {
                while self.chars.next().is_some_and(|ch| ch != 'm') {}
                continue;
            }
            return Some(ch);
        }
        None
    }
}
