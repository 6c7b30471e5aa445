//! Static listing of a program image.
//!
//! Uses the same decode table as the runtime, but never resolves registers or executes anything.

use std::fmt;
use std::ops::Range;

use crate::memory::Address;
use crate::ops::Instruction;

/// A single line of a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line {
    pub address: u16,
    pub item: Item,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Item {
    Instruction(Instruction),
    /// A word which is not a known opcode.
    Data(u16),
}

/// Iterator over the lines of a listing.
pub struct Disassembler<'a> {
    words: &'a [u16],
    cursor: usize,
    end: usize,
}

impl<'a> Disassembler<'a> {
    /// List `range` of `words`. The range is clamped to the image.
    pub fn new(words: &'a [u16], range: Range<usize>) -> Self {
        Self {
            words,
            cursor: range.start,
            end: range.end.min(words.len()),
        }
    }

    fn word(&self, index: usize) -> u16 {
        self.words.get(index).copied().unwrap_or(0)
    }
}

impl Iterator for Disassembler<'_> {
    type Item = Line;
    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }
        let address = self.cursor as u16;
        let opcode = self.word(self.cursor);
        let operands = [1, 2, 3].map(|offset| self.word(self.cursor + offset));

        let item = match Instruction::decode(opcode, operands) {
            Some(instr) => {
                self.cursor += instr.size() as usize;
                Item::Instruction(instr)
            }
            None => {
                self.cursor += 1;
                Item::Data(opcode)
            }
        };
        Some(Line { address, item })
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5}  ", self.address)?;
        match self.item {
            Item::Data(word) => write!(f, ".word {}", word),
            Item::Instruction(instr) => {
                write!(f, "{}", instr)?;
                if let Instruction::Out { src } = instr {
                    if let Some(ch) = printable(src) {
                        write!(f, "  ; {:?}", ch)?;
                    }
                }
                Ok(())
            }
        }
    }
}

fn printable(operand: u16) -> Option<char> {
    let Address::Memory(literal) = Address::from(operand) else {
        return None;
    };
    let ch = char::from_u32(literal as u32)?;
    (ch.is_ascii_graphic() || ch == ' ' || ch == '\n').then_some(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(words: &[u16]) -> Vec<String> {
        Disassembler::new(words, 0..words.len())
            .map(|line| line.to_string())
            .collect()
    }

    #[test]
    fn lists_instructions_and_data() {
        let words = [9, 32768, 4, 5, 19, 32768, 19, 72, 19, 10, 12345, 0];
        assert_eq!(
            listing(&words),
            vec![
                "    0  add r0 4 5",
                "    4  out r0",
                "    6  out 72  ; 'H'",
                "    8  out 10  ; '\\n'",
                "   10  .word 12345",
                "   11  halt",
            ]
        );
    }

    #[test]
    fn range_is_clamped() {
        let words = [21, 21, 21];
        let lines: Vec<_> = Disassembler::new(&words, 1..100).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].address, 1);
    }

    #[test]
    fn truncated_operands_read_zero() {
        let words = [1, 32770];
        let lines: Vec<_> = Disassembler::new(&words, 0..2).collect();
        assert_eq!(
            lines,
            vec![Line {
                address: 0,
                item: Item::Instruction(Instruction::Set {
                    dest: 32770,
                    src: 0
                }),
            }]
        );
    }
}
