//! Compiled program plus its source map.

use indexmap::IndexMap;

use crate::opcode::{Instruction, Op};

/// A compiled program.
///
/// The instruction array is flat; jumps address it by index. The last
/// instruction is always [`Op::Halt`]. The source map is sparse:
/// instructions whose originating node had no usable position simply
/// have no entry, and [`line_for`](Bytecode::line_for) reports them
/// as 0.
#[derive(Clone, Debug, PartialEq)]
pub struct Bytecode {
    /// The instructions, in execution order.
    pub instructions: Vec<Instruction>,
    source_map: IndexMap<usize, u32>,
}

impl Bytecode {
    pub(crate) fn new(instructions: Vec<Instruction>, source_map: IndexMap<usize, u32>) -> Bytecode {
        Bytecode {
            instructions,
            source_map,
        }
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the program is empty. Never true for compiler output,
    /// which always ends with `HALT`.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The source line for an instruction index, or 0 when unmapped.
    pub fn line_for(&self, index: usize) -> u32 {
        self.source_map.get(&index).copied().unwrap_or(0)
    }

    /// A disassembly listing for debugging and tests.
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        for (i, instruction) in self.instructions.iter().enumerate() {
            let line = self.line_for(i);
            out.push_str(&format!("{i:4}  {:<24} ; line {line}\n", instruction.op.to_string()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_for_unmapped_is_zero() {
        let mut map = IndexMap::new();
        map.insert(0usize, 3u32);
        let code = Bytecode::new(
            vec![
                Instruction::new(Op::Collect, 3),
                Instruction::new(Op::Halt, 0),
            ],
            map,
        );
        assert_eq!(code.line_for(0), 3);
        assert_eq!(code.line_for(1), 0);
        assert_eq!(code.line_for(99), 0);
    }
}
