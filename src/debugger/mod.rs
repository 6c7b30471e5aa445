mod command;
mod interrupt;
mod source;

pub use self::interrupt::{Interrupt, Signal};
use self::command::{parse_integer, Command, CommandName};
use self::source::{Source, SourceReader};
use crate::device::CharDevice;
use crate::memory::{MEMORY_SIZE, MODULUS, REGISTER_COUNT};
use crate::output::{Condition, Kind, Output};
use crate::runtime::RunState;

/// Breakpoint which can never be reached.
pub const NO_BREAKPOINT: u16 = MEMORY_SIZE as u16;

#[derive(Debug, Default)]
pub struct DebuggerOptions {
    /// Read session commands from this string instead of stdin.
    pub command: Option<String>,
    pub breakpoint: Option<u16>,
    pub trace: bool,
}

pub struct Debugger {
    interrupt: Interrupt,
    command_source: Source,

    /// Address at which execution pauses, before the instruction there is fetched.
    breakpoint: u16,
    /// Print every instruction before it executes.
    tracing: bool,
    /// Pause before the next instruction.
    stepping: bool,
}

/// An action, which the debugger passes to the runtime loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Keep executing as normal.
    Proceed,
    /// Stop executing the program.
    ExitProgram,
}

/// Why the session was entered.
#[derive(Clone, Copy, Debug)]
enum Pause {
    Interrupt,
    Breakpoint,
    Step,
}

impl Debugger {
    pub fn new(opts: DebuggerOptions, interrupt: Interrupt) -> Self {
        Self {
            command_source: Source::from(opts.command, interrupt.clone()),
            interrupt,
            breakpoint: opts.breakpoint.unwrap_or(NO_BREAKPOINT),
            tracing: opts.trace,
            stepping: false,
        }
    }

    pub fn breakpoint(&self) -> u16 {
        self.breakpoint
    }

    pub fn is_tracing(&self) -> bool {
        self.tracing
    }

    /// Must be called between instructions, before the next fetch.
    ///
    /// Runs a command session if a pause was requested or the breakpoint is reached.
    pub fn checkpoint(&mut self, state: &mut RunState, device: &mut impl CharDevice) -> Action {
        let pause = if self.interrupt.should_exit() {
            return Action::ExitProgram;
        } else if self.interrupt.is_pending() {
            Pause::Interrupt
        } else if state.pc() == self.breakpoint {
            Pause::Breakpoint
        } else if self.stepping {
            Pause::Step
        } else {
            return Action::Proceed;
        };

        // A second signal may have arrived since the check above
        if !self.interrupt.pause() {
            return Action::ExitProgram;
        }
        self.stepping = false;
        device.flush();

        match self.session(state, pause) {
            Action::Proceed if self.interrupt.resume() => Action::Proceed,
            _ => Action::ExitProgram,
        }
    }

    fn session(&mut self, state: &mut RunState, pause: Pause) -> Action {
        Output::Debugger(Condition::Always, Kind::Normal).start_new_line();
        match pause {
            Pause::Interrupt => {
                dprintln!(Always, Warning, "Interrupted at {}. Pausing execution.", state.pc())
            }
            Pause::Breakpoint => {
                dprintln!(Always, Warning, "Reached breakpoint at {}. Pausing execution.", state.pc())
            }
            Pause::Step => dprintln!(Sometimes, Info, "Stepped to {}.", state.pc()),
        }

        loop {
            // Convert `EOF` to resume
            let Some(line) = self.command_source.read("Debugger> ") else {
                return Action::Proceed;
            };
            let command = match Command::try_from(line) {
                Ok(command) => command,
                Err(error) => {
                    dprintln!(Always, Error, "{}", error);
                    dprintln!(Always, Error, "Type `h` for a list of commands.");
                    continue;
                }
            };

            let action = self.run_command(command, state);
            Output::Debugger(Condition::Always, Kind::Normal).print_state(state, self.breakpoint);
            if let Some(action) = action {
                return action;
            }
        }
    }

    fn run_command(&mut self, mut command: Command, state: &mut RunState) -> Option<Action> {
        match command.name {
            CommandName::Resume => {
                dprintln!(Sometimes, Info, "Continuing...");
                return Some(Action::Proceed);
            }
            CommandName::Step => {
                self.stepping = true;
                return Some(Action::Proceed);
            }
            CommandName::Exit => {
                dprintln!(Always, Warning, "Exiting program.");
                return Some(Action::ExitProgram);
            }
            CommandName::Help => {
                dprintln!(Always, Special, "\n{}", include_str!("./help.txt"));
            }

            CommandName::ReadRegister => {
                let index = self.argument(&mut command, "Register to read> ", u16::MAX)?;
                match state.space().reg(index as usize) {
                    Some(value) => {
                        dprint!(Sometimes, Info, "Register value: ");
                        Output::Debugger(Condition::Always, Kind::Normal).print_integer(value);
                        dprintln!(Always);
                    }
                    None => dprintln!(Always, Error, "There is no register {}.", index),
                }
            }
            CommandName::WriteRegister => {
                let index = self.argument(&mut command, "Register to write> ", u16::MAX)?;
                let Some(current) = state.space().reg(index as usize) else {
                    dprintln!(
                        Always,
                        Error,
                        "There is no register {}. Registers are 0 to {}.",
                        index,
                        REGISTER_COUNT - 1
                    );
                    return None;
                };
                dprintln!(Always, Info, "Current register value: {}", current);
                let value = self.argument(&mut command, "New value> ", MODULUS - 1)?;
                state.space_mut().set_reg(index as usize, value);
                dprintln!(Always, Warning, "Updated register {}.", index);
            }

            CommandName::Jump => {
                dprintln!(Always, Info, "Current address: {}", state.pc());
                let address = self.argument(&mut command, "New value> ", MODULUS - 1)?;
                *state.pc_mut() = address;
                dprintln!(Always, Warning, "Set instruction pointer to {}.", address);
            }
            CommandName::Break => {
                dprintln!(Always, Info, "Current breakpoint: {}", self.breakpoint);
                self.breakpoint = self.argument(&mut command, "New value> ", u16::MAX)?;
                if self.breakpoint as usize >= MEMORY_SIZE {
                    dprintln!(Always, Warning, "Breakpoint disabled.");
                } else {
                    dprintln!(Always, Warning, "Set breakpoint to {}.", self.breakpoint);
                }
            }
            CommandName::Trace => {
                self.tracing = !self.tracing;
                dprintln!(
                    Always,
                    Warning,
                    "Instruction tracing {}.",
                    if self.tracing { "enabled" } else { "disabled" }
                );
            }
        }
        None
    }

    /// Take the next inline argument of `command`, or prompt for one.
    ///
    /// Returns `None` (abandoning the command) on an invalid value or EOF.
    fn argument(&mut self, command: &mut Command, prompt: &str, max: u16) -> Option<u16> {
        let token = match command.args.next() {
            Some(token) => token,
            None => self.command_source.read(prompt)?.to_string(),
        };
        match parse_integer(&token, max) {
            Ok(value) => Some(value),
            Err(error) => {
                dprintln!(Always, Error, "{}", error);
                None
            }
        }
    }
}
