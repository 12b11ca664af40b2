//! Bit packing for instruction descriptors.
//!
//! The six 32-bit formats follow the standard R/I/S/B/U/J field layouts.
//! The compressed formats pack their immediates into the fixed container
//! fields of the generic `.insn` templates: CI splits imm[5] from imm[4:0],
//! CL/CS split imm[4:2] from imm[1:0], CB splits off[7:5] from off[4:0],
//! and CSS/CIW/CJ hold their immediates contiguously.

use serde::{Deserialize, Serialize};

use crate::riscv::instruction::Instruction;
use crate::riscv::register::Register;

/// An encoded instruction word: 32-bit full or 16-bit compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Word {
    Full(u32),
    Compressed(u16),
}

impl Word {
    /// Size in bytes.
    pub fn size(&self) -> usize {
        match self {
            Word::Full(_) => 4,
            Word::Compressed(_) => 2,
        }
    }

    pub fn value(&self) -> u32 {
        match self {
            Word::Full(w) => *w,
            Word::Compressed(h) => *h as u32,
        }
    }

    /// Append the word to `out` in little-endian byte order.
    pub fn write_le(&self, out: &mut Vec<u8>) {
        match self {
            Word::Full(w) => out.extend_from_slice(&w.to_le_bytes()),
            Word::Compressed(h) => out.extend_from_slice(&h.to_le_bytes()),
        }
    }
}

fn encode_r(opcode: u32, funct3: u32, funct7: u32, rd: Register, rs1: Register, rs2: Register) -> u32 {
    (opcode & 0x7F)
        | (rd as u32 & 0x1F) << 7
        | (funct3 & 0x7) << 12
        | (rs1 as u32 & 0x1F) << 15
        | (rs2 as u32 & 0x1F) << 20
        | (funct7 & 0x7F) << 25
}

fn encode_i(opcode: u32, funct3: u32, rd: Register, rs1: Register, imm: i32) -> u32 {
    (opcode & 0x7F)
        | (rd as u32 & 0x1F) << 7
        | (funct3 & 0x7) << 12
        | (rs1 as u32 & 0x1F) << 15
        | (imm as u32 & 0xFFF) << 20
}

fn encode_s(opcode: u32, funct3: u32, rs2: Register, rs1: Register, imm: i32) -> u32 {
    let imm_4_0 = (imm as u32 & 0x1F) << 7;
    let imm_11_5 = (((imm >> 5) & 0x7F) as u32) << 25;

    imm_11_5
        | (rs2 as u32 & 0x1F) << 20
        | (rs1 as u32 & 0x1F) << 15
        | (funct3 & 0x7) << 12
        | imm_4_0
        | (opcode & 0x7F)
}

fn encode_b(opcode: u32, funct3: u32, rs1: Register, rs2: Register, offset: i32) -> u32 {
    // Shifts happen on i32 to preserve sign, masked back into u32 fields.
    let imm_11 = (((offset >> 11) & 0x1) as u32) << 7;
    let imm_4_1 = (((offset >> 1) & 0xF) as u32) << 8;
    let imm_10_5 = (((offset >> 5) & 0x3F) as u32) << 25;
    let imm_12 = (((offset >> 12) & 0x1) as u32) << 31;

    imm_12
        | imm_10_5
        | (rs2 as u32 & 0x1F) << 20
        | (rs1 as u32 & 0x1F) << 15
        | (funct3 & 0x7) << 12
        | imm_4_1
        | imm_11
        | (opcode & 0x7F)
}

fn encode_u(opcode: u32, rd: Register, imm: i32) -> u32 {
    (opcode & 0x7F) | (rd as u32 & 0x1F) << 7 | (imm as u32 & 0xF_FFFF) << 12
}

fn encode_j(opcode: u32, rd: Register, offset: i32) -> u32 {
    let imm_20 = (((offset >> 20) & 0x1) as u32) << 31;
    let imm_10_1 = (((offset >> 1) & 0x3FF) as u32) << 21;
    let imm_11 = (((offset >> 11) & 0x1) as u32) << 20;
    let imm_19_12 = (((offset >> 12) & 0xFF) as u32) << 12;

    imm_20 | imm_10_1 | imm_11 | imm_19_12 | (rd as u32 & 0x1F) << 7 | (opcode & 0x7F)
}

fn encode_cr(quadrant: u32, funct4: u32, rd_rs1: Register, rs2: Register) -> u16 {
    ((funct4 & 0xF) << 12 | (rd_rs1 as u32 & 0x1F) << 7 | (rs2 as u32 & 0x1F) << 2 | (quadrant & 0x3))
        as u16
}

fn encode_ci(quadrant: u32, funct3: u32, rd_rs1: Register, imm: i32) -> u16 {
    let imm_5 = (((imm >> 5) & 0x1) as u32) << 12;
    let imm_4_0 = ((imm & 0x1F) as u32) << 2;

    ((funct3 & 0x7) << 13 | imm_5 | (rd_rs1 as u32 & 0x1F) << 7 | imm_4_0 | (quadrant & 0x3)) as u16
}

fn encode_css(quadrant: u32, funct3: u32, rs2: Register, imm: i32) -> u16 {
    ((funct3 & 0x7) << 13 | (imm as u32 & 0x3F) << 7 | (rs2 as u32 & 0x1F) << 2 | (quadrant & 0x3))
        as u16
}

fn encode_ciw(quadrant: u32, funct3: u32, rd: Register, imm: i32) -> u16 {
    ((funct3 & 0x7) << 13 | (imm as u32 & 0xFF) << 5 | (rd as u32 & 0x7) << 2 | (quadrant & 0x3))
        as u16
}

fn encode_cl(quadrant: u32, funct3: u32, rd: Register, rs1: Register, imm: i32) -> u16 {
    let imm_4_2 = (((imm >> 2) & 0x7) as u32) << 10;
    let imm_1_0 = ((imm & 0x3) as u32) << 5;

    ((funct3 & 0x7) << 13
        | imm_4_2
        | (rs1 as u32 & 0x7) << 7
        | imm_1_0
        | (rd as u32 & 0x7) << 2
        | (quadrant & 0x3)) as u16
}

fn encode_cs(quadrant: u32, funct3: u32, rs2: Register, rs1: Register, imm: i32) -> u16 {
    let imm_4_2 = (((imm >> 2) & 0x7) as u32) << 10;
    let imm_1_0 = ((imm & 0x3) as u32) << 5;

    ((funct3 & 0x7) << 13
        | imm_4_2
        | (rs1 as u32 & 0x7) << 7
        | imm_1_0
        | (rs2 as u32 & 0x7) << 2
        | (quadrant & 0x3)) as u16
}

fn encode_cb(quadrant: u32, funct3: u32, rs1: Register, offset: i32) -> u16 {
    let off_7_5 = (((offset >> 5) & 0x7) as u32) << 10;
    let off_4_0 = ((offset & 0x1F) as u32) << 2;

    ((funct3 & 0x7) << 13 | off_7_5 | (rs1 as u32 & 0x7) << 7 | off_4_0 | (quadrant & 0x3)) as u16
}

fn encode_cj(quadrant: u32, funct3: u32, offset: i32) -> u16 {
    ((funct3 & 0x7) << 13 | (offset as u32 & 0x7FF) << 2 | (quadrant & 0x3)) as u16
}

/// Pack a descriptor into its instruction word.
pub fn encode_instruction(inst: &Instruction) -> Word {
    match *inst {
        Instruction::R {
            opcode,
            funct3,
            funct7,
            rd,
            rs1,
            rs2,
        } => Word::Full(encode_r(opcode, funct3, funct7, rd, rs1, rs2)),
        Instruction::I {
            opcode,
            funct3,
            rd,
            rs1,
            imm,
        } => Word::Full(encode_i(opcode, funct3, rd, rs1, imm)),
        Instruction::S {
            opcode,
            funct3,
            rs2,
            rs1,
            imm,
        } => Word::Full(encode_s(opcode, funct3, rs2, rs1, imm)),
        Instruction::B {
            opcode,
            funct3,
            rs1,
            rs2,
            offset,
        } => Word::Full(encode_b(opcode, funct3, rs1, rs2, offset)),
        Instruction::U { opcode, rd, imm } => Word::Full(encode_u(opcode, rd, imm)),
        Instruction::J { opcode, rd, offset } => Word::Full(encode_j(opcode, rd, offset)),
        Instruction::Cr {
            quadrant,
            funct4,
            rd_rs1,
            rs2,
        } => Word::Compressed(encode_cr(quadrant, funct4, rd_rs1, rs2)),
        Instruction::Ci {
            quadrant,
            funct3,
            rd_rs1,
            imm,
        } => Word::Compressed(encode_ci(quadrant, funct3, rd_rs1, imm)),
        Instruction::Css {
            quadrant,
            funct3,
            rs2,
            imm,
        } => Word::Compressed(encode_css(quadrant, funct3, rs2, imm)),
        Instruction::Ciw {
            quadrant,
            funct3,
            rd,
            imm,
        } => Word::Compressed(encode_ciw(quadrant, funct3, rd, imm)),
        Instruction::Cl {
            quadrant,
            funct3,
            rd,
            rs1,
            imm,
        } => Word::Compressed(encode_cl(quadrant, funct3, rd, rs1, imm)),
        Instruction::Cs {
            quadrant,
            funct3,
            rs2,
            rs1,
            imm,
        } => Word::Compressed(encode_cs(quadrant, funct3, rs2, rs1, imm)),
        Instruction::Cb {
            quadrant,
            funct3,
            rs1,
            offset,
        } => Word::Compressed(encode_cb(quadrant, funct3, rs1, offset)),
        Instruction::Cj {
            quadrant,
            funct3,
            offset,
        } => Word::Compressed(encode_cj(quadrant, funct3, offset)),
    }
}
