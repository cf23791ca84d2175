//! Textual block format
//!
//! One instruction per line:
//!
//! ```text
//! %x = load
//! %y = mul %x %x
//! %z = add %y      # comments run to end of line
//! ```
//!
//! Operands must name instructions defined on earlier lines, which mirrors
//! the def-before-use invariant of the in-memory block.

use crate::block::{Block, InstrId, Opcode};
use crate::error::{Result, ScheduleError};
use indexmap::IndexMap;

/// Parse a block from its textual form
pub fn parse_block(name: &str, source: &str) -> Result<Block> {
    let mut block = Block::new(name);
    let mut names: IndexMap<String, InstrId> = IndexMap::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }

        let (lhs, rhs) = text
            .split_once('=')
            .ok_or_else(|| parse_error(line, "expected `%name = opcode [%operand ...]`"))?;
        let result = lhs
            .trim()
            .strip_prefix('%')
            .ok_or_else(|| parse_error(line, "result name must start with `%`"))?;
        if result.is_empty() {
            return Err(parse_error(line, "empty result name"));
        }
        if names.contains_key(result) {
            return Err(parse_error(line, format!("`%{result}` is defined twice")));
        }

        let mut parts = rhs.trim().split_whitespace();
        let mnemonic = parts
            .next()
            .ok_or_else(|| parse_error(line, "missing opcode"))?;
        let opcode = Opcode::from_mnemonic(mnemonic)
            .ok_or_else(|| parse_error(line, format!("unknown opcode `{mnemonic}`")))?;

        let mut operands = Vec::new();
        for token in parts {
            let operand = token
                .strip_prefix('%')
                .ok_or_else(|| parse_error(line, format!("operand `{token}` must start with `%`")))?;
            let id = names
                .get(operand)
                .copied()
                .ok_or_else(|| parse_error(line, format!("`%{operand}` is not defined yet")))?;
            operands.push(id);
        }

        let id = block.push(opcode, operands);
        names.insert(result.to_string(), id);
    }

    Ok(block)
}

fn parse_error(line: usize, message: impl Into<String>) -> ScheduleError {
    ScheduleError::Parse {
        line,
        message: message.into(),
    }
}
