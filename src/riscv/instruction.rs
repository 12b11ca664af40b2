use std::fmt::Display;

use serde::{Deserialize, Serialize};
use variant_count::VariantCount;

use crate::error::EncodeError;
use crate::riscv::encoder::{encode_instruction, Word};
use crate::riscv::register::Register;

/// The 14 instruction format classes: the six standard 32-bit layouts and
/// the eight compressed 16-bit layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, VariantCount)]
pub enum Format {
    R,
    I,
    S,
    B,
    U,
    J,
    Cr,
    Ci,
    Css,
    Ciw,
    Cl,
    Cs,
    Cb,
    Cj,
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::R => "r",
            Format::I => "i",
            Format::S => "s",
            Format::B => "b",
            Format::U => "u",
            Format::J => "j",
            Format::Cr => "cr",
            Format::Ci => "ci",
            Format::Css => "css",
            Format::Ciw => "ciw",
            Format::Cl => "cl",
            Format::Cs => "cs",
            Format::Cb => "cb",
            Format::Cj => "cj",
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(
            self,
            Format::Cr
                | Format::Ci
                | Format::Css
                | Format::Ciw
                | Format::Cl
                | Format::Cs
                | Format::Cb
                | Format::Cj
        )
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        if self.is_compressed() {
            2
        } else {
            4
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A raw instruction descriptor: major opcode (or compressed quadrant),
/// funct field(s), and exactly the operands the format class admits.
///
/// Field widths are debug-asserted at construction and fully checked by
/// [`Instruction::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    R {
        opcode: u32,
        funct3: u32,
        funct7: u32,
        rd: Register,
        rs1: Register,
        rs2: Register,
    },
    I {
        opcode: u32,
        funct3: u32,
        rd: Register,
        rs1: Register,
        imm: i32,
    },
    S {
        opcode: u32,
        funct3: u32,
        rs2: Register,
        rs1: Register,
        imm: i32,
    },
    B {
        opcode: u32,
        funct3: u32,
        rs1: Register,
        rs2: Register,
        offset: i32,
    },
    U {
        opcode: u32,
        rd: Register,
        imm: i32,
    },
    J {
        opcode: u32,
        rd: Register,
        offset: i32,
    },
    Cr {
        quadrant: u32,
        funct4: u32,
        rd_rs1: Register,
        rs2: Register,
    },
    Ci {
        quadrant: u32,
        funct3: u32,
        rd_rs1: Register,
        imm: i32,
    },
    Css {
        quadrant: u32,
        funct3: u32,
        rs2: Register,
        imm: i32,
    },
    Ciw {
        quadrant: u32,
        funct3: u32,
        rd: Register,
        imm: i32,
    },
    Cl {
        quadrant: u32,
        funct3: u32,
        rd: Register,
        rs1: Register,
        imm: i32,
    },
    Cs {
        quadrant: u32,
        funct3: u32,
        rs2: Register,
        rs1: Register,
        imm: i32,
    },
    Cb {
        quadrant: u32,
        funct3: u32,
        rs1: Register,
        offset: i32,
    },
    Cj {
        quadrant: u32,
        funct3: u32,
        offset: i32,
    },
}

impl Instruction {
    pub fn r(opcode: u32, funct3: u32, funct7: u32, rd: Register, rs1: Register, rs2: Register) -> Self {
        debug_assert!(opcode <= 0x7F && opcode & 0x3 == 0x3);
        debug_assert!(funct3 <= 0x7);
        debug_assert!(funct7 <= 0x7F);
        Instruction::R {
            opcode,
            funct3,
            funct7,
            rd,
            rs1,
            rs2,
        }
    }

    pub fn i(opcode: u32, funct3: u32, rd: Register, rs1: Register, imm: i32) -> Self {
        debug_assert!(opcode <= 0x7F && opcode & 0x3 == 0x3);
        debug_assert!(funct3 <= 0x7);
        debug_assert!((-2048..=2047).contains(&imm));
        Instruction::I {
            opcode,
            funct3,
            rd,
            rs1,
            imm,
        }
    }

    /// Argument order mirrors store syntax: `rs2, imm(rs1)`.
    pub fn s(opcode: u32, funct3: u32, rs2: Register, imm: i32, rs1: Register) -> Self {
        debug_assert!(opcode <= 0x7F && opcode & 0x3 == 0x3);
        debug_assert!(funct3 <= 0x7);
        debug_assert!((-2048..=2047).contains(&imm));
        Instruction::S {
            opcode,
            funct3,
            rs2,
            rs1,
            imm,
        }
    }

    pub fn b(opcode: u32, funct3: u32, rs1: Register, rs2: Register, offset: i32) -> Self {
        debug_assert!(opcode <= 0x7F && opcode & 0x3 == 0x3);
        debug_assert!(funct3 <= 0x7);
        debug_assert!(offset & 1 == 0 && (-4096..=4094).contains(&offset));
        Instruction::B {
            opcode,
            funct3,
            rs1,
            rs2,
            offset,
        }
    }

    pub fn u(opcode: u32, rd: Register, imm: i32) -> Self {
        debug_assert!(opcode <= 0x7F && opcode & 0x3 == 0x3);
        debug_assert!((0..=0xF_FFFF).contains(&imm));
        Instruction::U { opcode, rd, imm }
    }

    pub fn j(opcode: u32, rd: Register, offset: i32) -> Self {
        debug_assert!(opcode <= 0x7F && opcode & 0x3 == 0x3);
        debug_assert!(offset & 1 == 0 && (-1048576..=1048574).contains(&offset));
        Instruction::J { opcode, rd, offset }
    }

    pub fn cr(quadrant: u32, funct4: u32, rd_rs1: Register, rs2: Register) -> Self {
        debug_assert!(quadrant <= 0x2);
        debug_assert!(funct4 <= 0xF);
        Instruction::Cr {
            quadrant,
            funct4,
            rd_rs1,
            rs2,
        }
    }

    pub fn ci(quadrant: u32, funct3: u32, rd_rs1: Register, imm: i32) -> Self {
        debug_assert!(quadrant <= 0x2);
        debug_assert!(funct3 <= 0x7);
        debug_assert!((-32..=31).contains(&imm));
        Instruction::Ci {
            quadrant,
            funct3,
            rd_rs1,
            imm,
        }
    }

    pub fn css(quadrant: u32, funct3: u32, rs2: Register, imm: i32) -> Self {
        debug_assert!(quadrant <= 0x2);
        debug_assert!(funct3 <= 0x7);
        debug_assert!((0..=63).contains(&imm));
        Instruction::Css {
            quadrant,
            funct3,
            rs2,
            imm,
        }
    }

    pub fn ciw(quadrant: u32, funct3: u32, rd: Register, imm: i32) -> Self {
        debug_assert!(quadrant <= 0x2);
        debug_assert!(funct3 <= 0x7);
        debug_assert!(rd.compressed_index().is_some());
        debug_assert!((0..=255).contains(&imm));
        Instruction::Ciw {
            quadrant,
            funct3,
            rd,
            imm,
        }
    }

    /// Argument order mirrors load syntax: `rd, imm(rs1)`.
    pub fn cl(quadrant: u32, funct3: u32, rd: Register, imm: i32, rs1: Register) -> Self {
        debug_assert!(quadrant <= 0x2);
        debug_assert!(funct3 <= 0x7);
        debug_assert!(rd.compressed_index().is_some() && rs1.compressed_index().is_some());
        debug_assert!((0..=31).contains(&imm));
        Instruction::Cl {
            quadrant,
            funct3,
            rd,
            rs1,
            imm,
        }
    }

    /// Argument order mirrors store syntax: `rs2, imm(rs1)`.
    pub fn cs(quadrant: u32, funct3: u32, rs2: Register, imm: i32, rs1: Register) -> Self {
        debug_assert!(quadrant <= 0x2);
        debug_assert!(funct3 <= 0x7);
        debug_assert!(rs2.compressed_index().is_some() && rs1.compressed_index().is_some());
        debug_assert!((0..=31).contains(&imm));
        Instruction::Cs {
            quadrant,
            funct3,
            rs2,
            rs1,
            imm,
        }
    }

    pub fn cb(quadrant: u32, funct3: u32, rs1: Register, offset: i32) -> Self {
        debug_assert!(quadrant <= 0x2);
        debug_assert!(funct3 <= 0x7);
        debug_assert!(rs1.compressed_index().is_some());
        debug_assert!((-128..=127).contains(&offset));
        Instruction::Cb {
            quadrant,
            funct3,
            rs1,
            offset,
        }
    }

    pub fn cj(quadrant: u32, funct3: u32, offset: i32) -> Self {
        debug_assert!(quadrant <= 0x2);
        debug_assert!(funct3 <= 0x7);
        debug_assert!((-1024..=1023).contains(&offset));
        Instruction::Cj {
            quadrant,
            funct3,
            offset,
        }
    }

    /// Canonical no-op: `addi x0, x0, 0`.
    pub fn nop() -> Self {
        Instruction::i(0x13, 0x0, Register::X0, Register::X0, 0)
    }

    pub fn is_nop(&self) -> bool {
        matches!(
            self,
            Instruction::I {
                opcode: 0x13,
                funct3: 0,
                rd: Register::X0,
                rs1: Register::X0,
                imm: 0,
            }
        )
    }

    pub fn format(&self) -> Format {
        match self {
            Instruction::R { .. } => Format::R,
            Instruction::I { .. } => Format::I,
            Instruction::S { .. } => Format::S,
            Instruction::B { .. } => Format::B,
            Instruction::U { .. } => Format::U,
            Instruction::J { .. } => Format::J,
            Instruction::Cr { .. } => Format::Cr,
            Instruction::Ci { .. } => Format::Ci,
            Instruction::Css { .. } => Format::Css,
            Instruction::Ciw { .. } => Format::Ciw,
            Instruction::Cl { .. } => Format::Cl,
            Instruction::Cs { .. } => Format::Cs,
            Instruction::Cb { .. } => Format::Cb,
            Instruction::Cj { .. } => Format::Cj,
        }
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        self.format().size()
    }

    /// Pack the descriptor into an instruction word.
    pub fn encode(&self) -> Word {
        encode_instruction(self)
    }

    /// Check every field against the format class: opcode/quadrant shape,
    /// funct widths, immediate ranges, offset alignment, and the x8..x15
    /// restriction of the 3-bit compressed register slots.
    pub fn validate(&self) -> Result<(), EncodeError> {
        let format = self.format();
        match *self {
            Instruction::R {
                opcode,
                funct3,
                funct7,
                ..
            } => {
                check_opcode(opcode)?;
                check_funct(funct3, 3)?;
                check_funct(funct7, 7)
            }
            Instruction::I {
                opcode, funct3, imm, ..
            }
            | Instruction::S {
                opcode, funct3, imm, ..
            } => {
                check_opcode(opcode)?;
                check_funct(funct3, 3)?;
                check_imm(imm, -2048, 2047, format)
            }
            Instruction::B {
                opcode,
                funct3,
                offset,
                ..
            } => {
                check_opcode(opcode)?;
                check_funct(funct3, 3)?;
                check_aligned(offset, format)?;
                check_imm(offset, -4096, 4094, format)
            }
            Instruction::U { opcode, imm, .. } => {
                check_opcode(opcode)?;
                check_imm(imm, 0, 0xF_FFFF, format)
            }
            Instruction::J { opcode, offset, .. } => {
                check_opcode(opcode)?;
                check_aligned(offset, format)?;
                check_imm(offset, -1048576, 1048574, format)
            }
            Instruction::Cr {
                quadrant, funct4, ..
            } => {
                check_quadrant(quadrant)?;
                check_funct(funct4, 4)
            }
            Instruction::Ci {
                quadrant, funct3, imm, ..
            } => {
                check_quadrant(quadrant)?;
                check_funct(funct3, 3)?;
                check_imm(imm, -32, 31, format)
            }
            Instruction::Css {
                quadrant, funct3, imm, ..
            } => {
                check_quadrant(quadrant)?;
                check_funct(funct3, 3)?;
                check_imm(imm, 0, 63, format)
            }
            Instruction::Ciw {
                quadrant,
                funct3,
                rd,
                imm,
            } => {
                check_quadrant(quadrant)?;
                check_funct(funct3, 3)?;
                check_compressed(rd)?;
                check_imm(imm, 0, 255, format)
            }
            Instruction::Cl {
                quadrant,
                funct3,
                rd,
                rs1,
                imm,
            } => {
                check_quadrant(quadrant)?;
                check_funct(funct3, 3)?;
                check_compressed(rd)?;
                check_compressed(rs1)?;
                check_imm(imm, 0, 31, format)
            }
            Instruction::Cs {
                quadrant,
                funct3,
                rs2,
                rs1,
                imm,
            } => {
                check_quadrant(quadrant)?;
                check_funct(funct3, 3)?;
                check_compressed(rs2)?;
                check_compressed(rs1)?;
                check_imm(imm, 0, 31, format)
            }
            Instruction::Cb {
                quadrant,
                funct3,
                rs1,
                offset,
            } => {
                check_quadrant(quadrant)?;
                check_funct(funct3, 3)?;
                check_compressed(rs1)?;
                check_imm(offset, -128, 127, format)
            }
            Instruction::Cj {
                quadrant,
                funct3,
                offset,
            } => {
                check_quadrant(quadrant)?;
                check_funct(funct3, 3)?;
                check_imm(offset, -1024, 1023, format)
            }
        }
    }
}

fn check_opcode(opcode: u32) -> Result<(), EncodeError> {
    if opcode > 0x7F || opcode & 0x3 != 0x3 {
        return Err(EncodeError::InvalidOpcode(opcode));
    }
    Ok(())
}

fn check_quadrant(quadrant: u32) -> Result<(), EncodeError> {
    if quadrant > 0x2 {
        return Err(EncodeError::InvalidQuadrant(quadrant));
    }
    Ok(())
}

fn check_funct(value: u32, width: u32) -> Result<(), EncodeError> {
    if value >= 1 << width {
        return Err(EncodeError::FunctOutOfRange { value, width });
    }
    Ok(())
}

fn check_imm(value: i32, lo: i32, hi: i32, format: Format) -> Result<(), EncodeError> {
    if !(lo..=hi).contains(&value) {
        return Err(EncodeError::ImmediateOutOfRange { value, format });
    }
    Ok(())
}

fn check_aligned(offset: i32, format: Format) -> Result<(), EncodeError> {
    if offset & 1 != 0 {
        return Err(EncodeError::MisalignedOffset(offset, format));
    }
    Ok(())
}

fn check_compressed(reg: Register) -> Result<(), EncodeError> {
    reg.compressed_index()
        .map(|_| ())
        .ok_or(EncodeError::RegisterNotCompressible(reg))
}

impl Display for Instruction {
    /// Renders assembler `.insn`-directive text, with the canonical `nop`
    /// spelling for `addi x0, x0, 0`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_nop() {
            return f.write_str("nop");
        }
        match *self {
            Instruction::R {
                opcode,
                funct3,
                funct7,
                rd,
                rs1,
                rs2,
            } => write!(
                f,
                ".insn r {opcode:#x}, {funct3:#x}, {funct7:#x}, {rd}, {rs1}, {rs2}"
            ),
            Instruction::I {
                opcode,
                funct3,
                rd,
                rs1,
                imm,
            } => write!(f, ".insn i {opcode:#x}, {funct3:#x}, {rd}, {rs1}, {imm}"),
            Instruction::S {
                opcode,
                funct3,
                rs2,
                rs1,
                imm,
            } => write!(f, ".insn s {opcode:#x}, {funct3:#x}, {rs2}, {imm}({rs1})"),
            Instruction::B {
                opcode,
                funct3,
                rs1,
                rs2,
                offset,
            } => write!(
                f,
                ".insn b {opcode:#x}, {funct3:#x}, {rs1}, {rs2}, {offset}"
            ),
            Instruction::U { opcode, rd, imm } => {
                write!(f, ".insn u {opcode:#x}, {rd}, {imm}")
            }
            Instruction::J { opcode, rd, offset } => {
                write!(f, ".insn j {opcode:#x}, {rd}, {offset}")
            }
            Instruction::Cr {
                quadrant,
                funct4,
                rd_rs1,
                rs2,
            } => write!(f, ".insn cr {quadrant:#x}, {funct4:#x}, {rd_rs1}, {rs2}"),
            Instruction::Ci {
                quadrant,
                funct3,
                rd_rs1,
                imm,
            } => write!(f, ".insn ci {quadrant:#x}, {funct3:#x}, {rd_rs1}, {imm}"),
            Instruction::Css {
                quadrant,
                funct3,
                rs2,
                imm,
            } => write!(f, ".insn css {quadrant:#x}, {funct3:#x}, {rs2}, {imm}"),
            Instruction::Ciw {
                quadrant,
                funct3,
                rd,
                imm,
            } => write!(f, ".insn ciw {quadrant:#x}, {funct3:#x}, {rd}, {imm}"),
            Instruction::Cl {
                quadrant,
                funct3,
                rd,
                rs1,
                imm,
            } => write!(f, ".insn cl {quadrant:#x}, {funct3:#x}, {rd}, {imm}({rs1})"),
            Instruction::Cs {
                quadrant,
                funct3,
                rs2,
                rs1,
                imm,
            } => write!(f, ".insn cs {quadrant:#x}, {funct3:#x}, {rs2}, {imm}({rs1})"),
            Instruction::Cb {
                quadrant,
                funct3,
                rs1,
                offset,
            } => write!(f, ".insn cb {quadrant:#x}, {funct3:#x}, {rs1}, {offset}"),
            Instruction::Cj {
                quadrant,
                funct3,
                offset,
            } => write!(f, ".insn cj {quadrant:#x}, {funct3:#x}, {offset}"),
        }
    }
}
