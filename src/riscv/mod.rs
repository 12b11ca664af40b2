pub mod encoder;
pub mod instruction;
pub mod register;

pub use encoder::{encode_instruction, Word};
pub use instruction::{Format, Instruction};
pub use register::Register;
