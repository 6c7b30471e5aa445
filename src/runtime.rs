use std::fmt::Write as _;

use crate::debugger::{Action, Debugger, DebuggerOptions, Interrupt};
use crate::device::{CharDevice, Input};
use crate::memory::{is_memory, Address, AddressSpace, HALT, MODULUS};
use crate::ops::{Instruction, Operand};
use crate::output::Output;
use crate::stack::CallStack;

/// Represents complete machine state during runtime.
#[derive(Clone, Default)]
pub struct RunState {
    /// Memory and registers
    space: AddressSpace,
    /// Shared by `push`/`pop` and `call`/`ret`
    stack: CallStack,
    /// Address of the next opcode
    pc: u16,
    /// Set after the first `in` which hit end of input
    input_exhausted: bool,
}

/// Result of executing a single instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Halt,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// `halt`, `ret` with an empty stack, or the instruction pointer left memory.
    Halted,
    /// Stopped by the debugger or a repeated interrupt.
    Exited,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_image(words: &[u16]) -> Self {
        let mut state = Self::new();
        state.space.load(words);
        state
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn pc_mut(&mut self) -> &mut u16 {
        &mut self.pc
    }

    pub fn space(&self) -> &AddressSpace {
        &self.space
    }

    pub fn space_mut(&mut self) -> &mut AddressSpace {
        &mut self.space
    }

    pub fn stack(&self) -> &CallStack {
        &self.stack
    }

    /// Decode the instruction at the instruction pointer.
    ///
    /// Returns `None` if the opcode is unknown.
    pub fn fetch(&self) -> Option<Instruction> {
        let opcode = self.space.read_resolved(self.pc);
        let operands = [1, 2, 3].map(|offset| self.space.read_raw(self.pc.wrapping_add(offset)));
        Instruction::decode(opcode, operands)
    }

    /// Execute a single instruction.
    pub fn step(&mut self, device: &mut impl CharDevice) -> Step {
        let next = match self.fetch() {
            Some(instr) => self.execute(instr, device),
            // Unknown opcodes are skipped, as data may be mixed with code
            None => self.pc + 1,
        };
        if is_memory(next) {
            self.pc = next;
            Step::Continue
        } else {
            Step::Halt
        }
    }

    /// Run until halted, ignoring breakpoints and interrupts.
    pub fn run(&mut self, device: &mut impl CharDevice) {
        while self.step(device) == Step::Continue {}
        device.flush();
    }

    /// Apply `instr` and return the next instruction pointer.
    fn execute(&mut self, instr: Instruction, device: &mut impl CharDevice) -> u16 {
        let next = self.pc + instr.size();
        match instr {
            Instruction::Halt => return HALT,

            Instruction::Set { dest, src } => {
                self.space.write(dest, self.value(src));
            }
            Instruction::Push { src } => {
                self.stack.push(self.value(src));
            }
            Instruction::Pop { dest } => {
                if !self.stack.is_empty() {
                    let value = self.stack.pop();
                    self.space.write(dest, value);
                }
            }

            Instruction::Eq { dest, lhs, rhs } => {
                let result = self.value(lhs) == self.value(rhs);
                self.space.write(dest, result as u16);
            }
            Instruction::Gt { dest, lhs, rhs } => {
                let result = self.value(lhs) > self.value(rhs);
                self.space.write(dest, result as u16);
            }

            Instruction::Jmp { target } => return self.value(target),
            Instruction::Jt { cond, target } => {
                if self.value(cond) != 0 {
                    return self.value(target);
                }
            }
            Instruction::Jf { cond, target } => {
                if self.value(cond) == 0 {
                    return self.value(target);
                }
            }

            Instruction::Add { dest, lhs, rhs } => {
                let result = self.value(lhs).wrapping_add(self.value(rhs)) % MODULUS;
                self.space.write(dest, result);
            }
            Instruction::Mult { dest, lhs, rhs } => {
                // 2^15 divides 2^16, so wrapping first does not change the result
                let result = self.value(lhs).wrapping_mul(self.value(rhs)) % MODULUS;
                self.space.write(dest, result);
            }
            Instruction::Mod { dest, lhs, rhs } => {
                let divisor = self.value(rhs);
                if divisor == 0 {
                    dprintln!(Sometimes, Warning, "{}: mod by zero, destination left unchanged.", self.pc);
                } else {
                    self.space.write(dest, self.value(lhs) % divisor);
                }
            }
            Instruction::And { dest, lhs, rhs } => {
                self.space.write(dest, self.value(lhs) & self.value(rhs));
            }
            Instruction::Or { dest, lhs, rhs } => {
                self.space.write(dest, self.value(lhs) | self.value(rhs));
            }
            Instruction::Not { dest, src } => {
                self.space.write(dest, !self.value(src) & (MODULUS - 1));
            }

            Instruction::Rmem { dest, addr } => {
                let value = self.space.read_raw(self.value(addr));
                self.space.write(dest, value);
            }
            Instruction::Wmem { addr, src } => {
                self.space.write(self.value(addr), self.value(src));
            }

            Instruction::Call { target } => {
                self.stack.push(next);
                return self.value(target);
            }
            Instruction::Ret => {
                if self.stack.is_empty() {
                    return HALT;
                }
                return self.stack.pop();
            }

            Instruction::Out { src } => {
                let byte = self.value(src) as u8;
                device.write_byte(byte);
                Output::set_line_start(byte == b'\n');
            }
            Instruction::In { dest } => {
                let byte = match device.read_byte() {
                    Input::Byte(byte) => byte,
                    // Nothing read: stay on this instruction so the pause happens before it
                    Input::Interrupted => return self.pc,
                    Input::End => {
                        if !self.input_exhausted {
                            dprintln!(Always, Warning, "Reached end of input. Reading zeros.");
                            self.input_exhausted = true;
                        }
                        0
                    }
                };
                self.space.write(dest, byte as u16);
            }

            Instruction::Noop => (),
        }
        next
    }

    /// Resolve an operand to a concrete word.
    fn value(&self, operand: u16) -> u16 {
        self.space.resolve(operand)
    }

    /// The next instruction, with register operands followed by their current value.
    pub fn describe_next(&self) -> String {
        let mut line = format!("{:>5}  ", self.pc);
        let Some(instr) = self.fetch() else {
            let _ = write!(line, ".word {}", self.space.read_resolved(self.pc));
            return line;
        };
        line.push_str(instr.opcode().mnemonic());
        for operand in instr.operands() {
            let _ = match Address::from(operand) {
                Address::Register(index) => {
                    write!(line, " r{}({})", index, self.space.registers()[index])
                }
                _ => write!(line, " {}", Operand(operand)),
            };
        }
        line
    }
}

/// A loaded program, with a debugger attached.
pub struct RunEnvironment {
    state: RunState,
    debugger: Debugger,
}

impl RunEnvironment {
    pub fn new(state: RunState, opts: DebuggerOptions, interrupt: Interrupt) -> Self {
        Self {
            state,
            debugger: Debugger::new(opts, interrupt),
        }
    }

    pub fn from_image(words: &[u16], opts: DebuggerOptions, interrupt: Interrupt) -> Self {
        Self::new(RunState::from_image(words), opts, interrupt)
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Run until halted or stopped by the debugger.
    ///
    /// Device output is flushed on every path.
    pub fn run(&mut self, device: &mut impl CharDevice) -> Exit {
        let exit = loop {
            if self.debugger.checkpoint(&mut self.state, device) == Action::ExitProgram {
                break Exit::Exited;
            }
            if self.debugger.is_tracing() {
                device.flush();
                dprintln!(Always, Trace, "{}", self.state.describe_next());
            }
            if self.state.step(device) == Step::Halt {
                break Exit::Halted;
            }
        };
        device.flush();
        exit
    }
}
