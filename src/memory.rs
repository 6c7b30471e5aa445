/// Amount of addressable memory words.
pub const MEMORY_SIZE: usize = 1 << 15;
/// Amount of general purpose registers.
pub const REGISTER_COUNT: usize = 8;
/// All arithmetic wraps at this value.
pub const MODULUS: u16 = 1 << 15;
/// Returned as the next instruction pointer to stop the machine.
pub const HALT: u16 = u16::MAX;

const REGISTER_START: u16 = MEMORY_SIZE as u16;
const REGISTER_END: u16 = REGISTER_START + REGISTER_COUNT as u16;

/// What a raw 16-bit value refers to when used as an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Address {
    Memory(u16),
    Register(usize),
    Invalid,
}

impl From<u16> for Address {
    fn from(value: u16) -> Self {
        if value < REGISTER_START {
            Address::Memory(value)
        } else if value < REGISTER_END {
            Address::Register((value - REGISTER_START) as usize)
        } else {
            Address::Invalid
        }
    }
}

/// Program memory and register file.
#[derive(Clone)]
pub struct AddressSpace {
    mem: Box<[u16; MEMORY_SIZE]>,
    reg: [u16; REGISTER_COUNT],
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressSpace {
    pub fn new() -> Self {
        AddressSpace {
            mem: Box::new([0; MEMORY_SIZE]),
            reg: [0; REGISTER_COUNT],
        }
    }

    /// Copy `words` verbatim to the start of memory.
    ///
    /// Words past the end of memory are discarded. Returns the amount of words stored.
    pub fn load(&mut self, words: &[u16]) -> usize {
        let len = words.len().min(MEMORY_SIZE);
        self.mem[..len].copy_from_slice(&words[..len]);
        len
    }

    /// Exactly what is stored at `addr`, without indirection.
    pub fn read_raw(&self, addr: u16) -> u16 {
        match Address::from(addr) {
            Address::Memory(addr) => self.mem[addr as usize],
            Address::Register(index) => self.reg[index],
            Address::Invalid => 0,
        }
    }

    /// Value stored at `addr`, following one register reference if memory holds one.
    pub fn read_resolved(&self, addr: u16) -> u16 {
        match Address::from(addr) {
            Address::Memory(addr) => self.resolve(self.mem[addr as usize]),
            Address::Register(index) => self.reg[index],
            Address::Invalid => 0,
        }
    }

    /// Turn an operand into a concrete word.
    ///
    /// Literals are returned unchanged, register references are replaced by register content
    /// and invalid values become 0. Register content is never followed any further.
    pub fn resolve(&self, value: u16) -> u16 {
        match Address::from(value) {
            Address::Memory(literal) => literal,
            Address::Register(index) => self.reg[index],
            Address::Invalid => 0,
        }
    }

    /// Store the resolved `value` at `addr`. Writing to an invalid address does nothing.
    pub fn write(&mut self, addr: u16, value: u16) {
        let value = self.resolve(value);
        match Address::from(addr) {
            Address::Memory(addr) => self.mem[addr as usize] = value,
            Address::Register(index) => self.reg[index] = value,
            Address::Invalid => (),
        }
    }

    pub fn mem(&self, addr: u16) -> Option<u16> {
        self.mem.get(addr as usize).copied()
    }

    pub fn reg(&self, index: usize) -> Option<u16> {
        self.reg.get(index).copied()
    }

    /// Returns `false` if `index` does not name a register.
    pub fn set_reg(&mut self, index: usize, value: u16) -> bool {
        match self.reg.get_mut(index) {
            Some(reg) => {
                *reg = value % MODULUS;
                true
            }
            None => false,
        }
    }

    pub fn registers(&self) -> &[u16; REGISTER_COUNT] {
        &self.reg
    }
}

pub fn is_memory(addr: u16) -> bool {
    matches!(Address::from(addr), Address::Memory(_))
}
