use std::fmt;

use crate::memory::Address;

/// The 22 operations understood by the machine, numbered as they appear in memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Halt,
    Set,
    Push,
    Pop,
    Eq,
    Gt,
    Jmp,
    Jt,
    Jf,
    Add,
    Mult,
    Mod,
    And,
    Or,
    Not,
    Rmem,
    Wmem,
    Call,
    Ret,
    Out,
    In,
    Noop,
}

impl Opcode {
    const ALL: [Opcode; 22] = [
        Self::Halt,
        Self::Set,
        Self::Push,
        Self::Pop,
        Self::Eq,
        Self::Gt,
        Self::Jmp,
        Self::Jt,
        Self::Jf,
        Self::Add,
        Self::Mult,
        Self::Mod,
        Self::And,
        Self::Or,
        Self::Not,
        Self::Rmem,
        Self::Wmem,
        Self::Call,
        Self::Ret,
        Self::Out,
        Self::In,
        Self::Noop,
    ];

    /// Amount of operand words following the opcode.
    pub fn arity(self) -> u16 {
        match self {
            Self::Halt | Self::Ret | Self::Noop => 0,
            Self::Push | Self::Pop | Self::Jmp | Self::Call | Self::Out | Self::In => 1,
            Self::Set | Self::Jt | Self::Jf | Self::Not | Self::Rmem | Self::Wmem => 2,
            Self::Eq | Self::Gt | Self::Add | Self::Mult | Self::Mod | Self::And | Self::Or => 3,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Halt => "halt",
            Self::Set => "set",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Eq => "eq",
            Self::Gt => "gt",
            Self::Jmp => "jmp",
            Self::Jt => "jt",
            Self::Jf => "jf",
            Self::Add => "add",
            Self::Mult => "mult",
            Self::Mod => "mod",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Rmem => "rmem",
            Self::Wmem => "wmem",
            Self::Call => "call",
            Self::Ret => "ret",
            Self::Out => "out",
            Self::In => "in",
            Self::Noop => "noop",
        }
    }
}

impl TryFrom<u16> for Opcode {
    type Error = ();
    fn try_from(word: u16) -> Result<Self, Self::Error> {
        Self::ALL.get(word as usize).copied().ok_or(())
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// A decoded instruction.
///
/// Every field holds the *raw* operand word, which is either a literal or a register reference.
/// Resolving operands is left to the runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    Halt,
    Set { dest: u16, src: u16 },
    Push { src: u16 },
    Pop { dest: u16 },
    Eq { dest: u16, lhs: u16, rhs: u16 },
    Gt { dest: u16, lhs: u16, rhs: u16 },
    Jmp { target: u16 },
    Jt { cond: u16, target: u16 },
    Jf { cond: u16, target: u16 },
    Add { dest: u16, lhs: u16, rhs: u16 },
    Mult { dest: u16, lhs: u16, rhs: u16 },
    Mod { dest: u16, lhs: u16, rhs: u16 },
    And { dest: u16, lhs: u16, rhs: u16 },
    Or { dest: u16, lhs: u16, rhs: u16 },
    Not { dest: u16, src: u16 },
    Rmem { dest: u16, addr: u16 },
    Wmem { addr: u16, src: u16 },
    Call { target: u16 },
    Ret,
    Out { src: u16 },
    In { dest: u16 },
    Noop,
}

impl Instruction {
    /// Returns `None` for an unknown opcode.
    ///
    /// `operands` are the three words following the opcode; unused ones are ignored.
    pub fn decode(opcode: u16, operands: [u16; 3]) -> Option<Self> {
        let [a, b, c] = operands;
        let instr = match Opcode::try_from(opcode).ok()? {
            Opcode::Halt => Self::Halt,
            Opcode::Set => Self::Set { dest: a, src: b },
            Opcode::Push => Self::Push { src: a },
            Opcode::Pop => Self::Pop { dest: a },
            Opcode::Eq => Self::Eq { dest: a, lhs: b, rhs: c },
            Opcode::Gt => Self::Gt { dest: a, lhs: b, rhs: c },
            Opcode::Jmp => Self::Jmp { target: a },
            Opcode::Jt => Self::Jt { cond: a, target: b },
            Opcode::Jf => Self::Jf { cond: a, target: b },
            Opcode::Add => Self::Add { dest: a, lhs: b, rhs: c },
            Opcode::Mult => Self::Mult { dest: a, lhs: b, rhs: c },
            Opcode::Mod => Self::Mod { dest: a, lhs: b, rhs: c },
            Opcode::And => Self::And { dest: a, lhs: b, rhs: c },
            Opcode::Or => Self::Or { dest: a, lhs: b, rhs: c },
            Opcode::Not => Self::Not { dest: a, src: b },
            Opcode::Rmem => Self::Rmem { dest: a, addr: b },
            Opcode::Wmem => Self::Wmem { addr: a, src: b },
            Opcode::Call => Self::Call { target: a },
            Opcode::Ret => Self::Ret,
            Opcode::Out => Self::Out { src: a },
            Opcode::In => Self::In { dest: a },
            Opcode::Noop => Self::Noop,
        };
        Some(instr)
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Halt => Opcode::Halt,
            Self::Set { .. } => Opcode::Set,
            Self::Push { .. } => Opcode::Push,
            Self::Pop { .. } => Opcode::Pop,
            Self::Eq { .. } => Opcode::Eq,
            Self::Gt { .. } => Opcode::Gt,
            Self::Jmp { .. } => Opcode::Jmp,
            Self::Jt { .. } => Opcode::Jt,
            Self::Jf { .. } => Opcode::Jf,
            Self::Add { .. } => Opcode::Add,
            Self::Mult { .. } => Opcode::Mult,
            Self::Mod { .. } => Opcode::Mod,
            Self::And { .. } => Opcode::And,
            Self::Or { .. } => Opcode::Or,
            Self::Not { .. } => Opcode::Not,
            Self::Rmem { .. } => Opcode::Rmem,
            Self::Wmem { .. } => Opcode::Wmem,
            Self::Call { .. } => Opcode::Call,
            Self::Ret => Opcode::Ret,
            Self::Out { .. } => Opcode::Out,
            Self::In { .. } => Opcode::In,
            Self::Noop => Opcode::Noop,
        }
    }

    /// Amount of words occupied, including the opcode.
    pub fn size(&self) -> u16 {
        self.opcode().arity() + 1
    }

    /// Raw operand words, in memory order.
    pub fn operands(&self) -> Vec<u16> {
        match *self {
            Self::Halt | Self::Ret | Self::Noop => vec![],
            Self::Push { src } | Self::Out { src } => vec![src],
            Self::Pop { dest } | Self::In { dest } => vec![dest],
            Self::Jmp { target } | Self::Call { target } => vec![target],
            Self::Set { dest, src } | Self::Not { dest, src } => vec![dest, src],
            Self::Jt { cond, target } | Self::Jf { cond, target } => vec![cond, target],
            Self::Rmem { dest, addr } => vec![dest, addr],
            Self::Wmem { addr, src } => vec![addr, src],
            Self::Eq { dest, lhs, rhs }
            | Self::Gt { dest, lhs, rhs }
            | Self::Add { dest, lhs, rhs }
            | Self::Mult { dest, lhs, rhs }
            | Self::Mod { dest, lhs, rhs }
            | Self::And { dest, lhs, rhs }
            | Self::Or { dest, lhs, rhs } => vec![dest, lhs, rhs],
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode())?;
        for operand in self.operands() {
            write!(f, " {}", Operand(operand))?;
        }
        Ok(())
    }
}

/// Displays a raw operand word as a literal, `rN`, or `?N` if out of range.
#[derive(Clone, Copy, Debug)]
pub struct Operand(pub u16);

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Address::from(self.0) {
            Address::Memory(literal) => write!(f, "{}", literal),
            Address::Register(index) => write!(f, "r{}", index),
            Address::Invalid => write!(f, "?{}", self.0),
        }
    }
}
