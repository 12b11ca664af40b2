//! A fixed RISC-V instruction-emission smoke test.
//!
//! Builds a known byte image covering all 14 instruction formats, standard
//! and compressed, for external disassemblers to decode and diff against a
//! golden reference.

mod error;
pub mod riscv;
mod smoke;

pub use error::*;
pub use smoke::{emit, smoke_image, smoke_listing, smoke_sequence};
