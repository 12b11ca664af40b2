//! The fixed smoke-test sequence and the byte emitter.
//!
//! The sequence exercises every instruction format once: seven wide
//! instructions, a forward branch spanning two filler `nop`s, then one of
//! each compressed format. Emission is a plain in-order concatenation of
//! little-endian instruction words, so the image is deterministic and its
//! disassembly diffs cleanly against a golden reference.

use crate::error::{EncodeError, Result};
use crate::riscv::instruction::Instruction;
use crate::riscv::register::Register::*;

/// Filler `nop`s between the forward branch and its target.
const FILLER_NOPS: usize = 2;

/// Byte distance from the branch to its target, over the fillers.
/// A regression property: this must stay stable across toolchains.
const BRANCH_DISPLACEMENT: i32 = 4 * (1 + FILLER_NOPS as i32);

/// The fixed, ordered instruction sequence.
pub fn smoke_sequence() -> Vec<Instruction> {
    let mut seq = vec![
        Instruction::r(0x63, 0x2, 0x5, X3, X4, X5),
        Instruction::i(0x7b, 0x1, X3, X4, 18),
        Instruction::i(0x5b, 0x5, X7, X8, 25),
        Instruction::s(0x67, 0x5, X9, 17, X10),
        Instruction::j(0x73, X11, 14),
        Instruction::u(0x5b, X12, 15),
        Instruction::b(0x1f, 0x5, X13, X14, BRANCH_DISPLACEMENT),
    ];
    for _ in 0..FILLER_NOPS {
        seq.push(Instruction::nop());
    }
    // The branch target.
    seq.push(Instruction::nop());
    seq.extend([
        Instruction::cr(0x2, 0x9, X1, X2),
        Instruction::ci(0x1, 0x0, X3, 14),
        Instruction::css(0x2, 0x6, X4, 15),
        Instruction::ciw(0x0, 0x0, X8, 16),
        Instruction::cl(0x0, 0x6, X9, 6, X11),
        Instruction::cs(0x1, 0x4, X9, 5, X10),
        Instruction::cb(0x1, 0x6, X9, 8),
        Instruction::cj(0x1, 0x5, 92),
    ]);
    seq
}

/// Validate each descriptor, then append its encoding in declared order.
pub fn emit(program: &[Instruction]) -> Result<Vec<u8>, EncodeError> {
    let mut image = Vec::with_capacity(program.iter().map(Instruction::size).sum());
    for inst in program {
        inst.validate()?;
        inst.encode().write_le(&mut image);
    }
    Ok(image)
}

/// The emitted byte image of the fixed sequence.
pub fn smoke_image() -> Result<Vec<u8>, EncodeError> {
    emit(&smoke_sequence())
}

/// Assembler-style text of the fixed sequence, one instruction per line.
pub fn smoke_listing() -> String {
    smoke_sequence()
        .iter()
        .map(|inst| inst.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::riscv::encoder::Word;
    use crate::riscv::instruction::Format;

    #[test]
    fn test_sequence_covers_all_formats() {
        let seq = smoke_sequence();
        assert_eq!(seq.len(), 18);
        for format in [
            Format::R,
            Format::I,
            Format::S,
            Format::B,
            Format::U,
            Format::J,
            Format::Cr,
            Format::Ci,
            Format::Css,
            Format::Ciw,
            Format::Cl,
            Format::Cs,
            Format::Cb,
            Format::Cj,
        ] {
            assert!(
                seq.iter().any(|inst| inst.format() == format),
                "format {format} missing from the sequence"
            );
        }
    }

    #[test]
    fn test_image_golden_words() {
        let expected = [
            Word::Full(0x0A5221E3),
            Word::Full(0x012211FB),
            Word::Full(0x019453DB),
            Word::Full(0x009558E7),
            Word::Full(0x00E005F3),
            Word::Full(0x0000F65B),
            Word::Full(0x00E6D61F),
            Word::Full(0x00000013),
            Word::Full(0x00000013),
            Word::Full(0x00000013),
            Word::Compressed(0x908A),
            Word::Compressed(0x01B9),
            Word::Compressed(0xC792),
            Word::Compressed(0x0200),
            Word::Compressed(0xC5C4),
            Word::Compressed(0x8525),
            Word::Compressed(0xC0A1),
            Word::Compressed(0xA171),
        ];
        let seq = smoke_sequence();
        assert_eq!(seq.len(), expected.len());
        for (inst, word) in seq.iter().zip(expected) {
            assert_eq!(inst.encode(), word, "wrong encoding for `{inst}`");
        }

        let mut bytes = Vec::new();
        for word in expected {
            word.write_le(&mut bytes);
        }
        assert_eq!(smoke_image().unwrap(), bytes);
    }

    #[test]
    fn test_image_size_and_determinism() {
        let image = smoke_image().unwrap();
        assert_eq!(image.len(), 10 * 4 + 8 * 2);
        assert_eq!(image, smoke_image().unwrap());
    }

    #[test]
    fn test_branch_displacement_spans_the_fillers() {
        let seq = smoke_sequence();
        let (branch_idx, inst) = seq
            .iter()
            .enumerate()
            .find(|(_, inst)| inst.format() == Format::B)
            .unwrap();
        let offset = match *inst {
            Instruction::B { offset, .. } => offset,
            _ => unreachable!(),
        };
        assert_eq!(offset, 12);

        // The target sits after the branch and both fillers.
        let target_idx = branch_idx + 1 + FILLER_NOPS;
        assert!(seq[target_idx].is_nop());
        let branch_at: usize = seq[..branch_idx].iter().map(Instruction::size).sum();
        let target_at: usize = seq[..target_idx].iter().map(Instruction::size).sum();
        assert_eq!(target_at - branch_at, offset as usize);
    }

    #[test]
    fn test_listing_golden_text() {
        let expected = "\
.insn r 0x63, 0x2, 0x5, x3, x4, x5
.insn i 0x7b, 0x1, x3, x4, 18
.insn i 0x5b, 0x5, x7, x8, 25
.insn s 0x67, 0x5, x9, 17(x10)
.insn j 0x73, x11, 14
.insn u 0x5b, x12, 15
.insn b 0x1f, 0x5, x13, x14, 12
nop
nop
nop
.insn cr 0x2, 0x9, x1, x2
.insn ci 0x1, 0x0, x3, 14
.insn css 0x2, 0x6, x4, 15
.insn ciw 0x0, 0x0, x8, 16
.insn cl 0x0, 0x6, x9, 6(x11)
.insn cs 0x1, 0x4, x9, 5(x10)
.insn cb 0x1, 0x6, x9, 8
.insn cj 0x1, 0x5, 92";
        assert_eq!(smoke_listing(), expected);
    }

    #[test]
    fn test_emit_rejects_malformed_descriptor() {
        let bad = Instruction::Cl {
            quadrant: 0,
            funct3: 0x6,
            rd: X2,
            rs1: X11,
            imm: 6,
        };
        assert_eq!(
            emit(&[bad]),
            Err(EncodeError::RegisterNotCompressible(X2))
        );
    }
}
