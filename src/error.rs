use thiserror::Error;

use crate::riscv::instruction::Format;
use crate::riscv::register::Register;

/// A descriptor field that does not fit its format class. Raised when a
/// program is assembled, never while emitting an already-validated one.
#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    #[error("opcode {0:#x} is not a 32-bit major opcode (low bits must be 0b11)")]
    InvalidOpcode(u32),

    #[error("quadrant {0:#x} is not a compressed quadrant (must be 0..=2)")]
    InvalidQuadrant(u32),

    #[error("funct value {value:#x} does not fit in {width} bits")]
    FunctOutOfRange { value: u32, width: u32 },

    #[error("immediate {value} does not fit the {format} format")]
    ImmediateOutOfRange { value: i32, format: Format },

    #[error("offset {0} is misaligned: the {1} format cannot encode bit 0")]
    MisalignedOffset(i32, Format),

    #[error("register {0} is not addressable in a compressed slot (x8..x15 only)")]
    RegisterNotCompressible(Register),
}

#[derive(Debug, Error)]
pub enum SmokeError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = EncodeError> = std::result::Result<T, E>;
