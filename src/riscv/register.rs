use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub const NUM_REGISTERS: usize = 32;

/// One of the 32 integer registers, x0 through x31.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Register {
    #[default]
    X0 = 0,
    X1 = 1,
    X2 = 2,
    X3 = 3,
    X4 = 4,
    X5 = 5,
    X6 = 6,
    X7 = 7,
    X8 = 8,
    X9 = 9,
    X10 = 10,
    X11 = 11,
    X12 = 12,
    X13 = 13,
    X14 = 14,
    X15 = 15,
    X16 = 16,
    X17 = 17,
    X18 = 18,
    X19 = 19,
    X20 = 20,
    X21 = 21,
    X22 = 22,
    X23 = 23,
    X24 = 24,
    X25 = 25,
    X26 = 26,
    X27 = 27,
    X28 = 28,
    X29 = 29,
    X30 = 30,
    X31 = 31,
}

use Register::*;

const REGISTERS: [Register; NUM_REGISTERS] = [
    X0, X1, X2, X3, X4, X5, X6, X7, X8, X9, X10, X11, X12, X13, X14, X15, X16, X17, X18, X19, X20,
    X21, X22, X23, X24, X25, X26, X27, X28, X29, X30, X31,
];

const NAMES: [&str; NUM_REGISTERS] = [
    "x0", "x1", "x2", "x3", "x4", "x5", "x6", "x7", "x8", "x9", "x10", "x11", "x12", "x13", "x14",
    "x15", "x16", "x17", "x18", "x19", "x20", "x21", "x22", "x23", "x24", "x25", "x26", "x27",
    "x28", "x29", "x30", "x31",
];

const ABI_NAMES: [&str; NUM_REGISTERS] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

impl From<u8> for Register {
    fn from(value: u8) -> Self {
        debug_assert!((value as usize) < NUM_REGISTERS);
        REGISTERS[(value & 0x1F) as usize]
    }
}

impl Register {
    /// Architectural name, `x0` through `x31`.
    pub fn name(&self) -> &'static str {
        NAMES[*self as usize]
    }

    /// ABI name, e.g. `sp` for x2.
    pub fn abi_name(&self) -> &'static str {
        ABI_NAMES[*self as usize]
    }

    /// Index used by the 3-bit register slots of the compressed formats.
    /// Only x8 through x15 are addressable there.
    pub fn compressed_index(&self) -> Option<u32> {
        let n = *self as u32;
        (8..=15).contains(&n).then(|| n - 8)
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_from_u8() {
        for i in 0..NUM_REGISTERS as u8 {
            let reg = Register::from(i);
            assert_eq!(reg as u8, i);
        }
    }

    #[test]
    fn test_register_names() {
        assert_eq!(Register::X0.name(), "x0");
        assert_eq!(Register::X2.name(), "x2");
        assert_eq!(Register::X31.name(), "x31");
        assert_eq!(Register::X0.abi_name(), "zero");
        assert_eq!(Register::X2.abi_name(), "sp");
        assert_eq!(Register::X31.abi_name(), "t6");
    }

    #[test]
    fn test_register_display_is_architectural() {
        for i in 0..NUM_REGISTERS as u8 {
            let reg = Register::from(i);
            assert_eq!(format!("{reg}"), format!("x{i}"));
        }
    }

    #[test]
    fn test_compressed_index() {
        assert_eq!(Register::X7.compressed_index(), None);
        assert_eq!(Register::X8.compressed_index(), Some(0));
        assert_eq!(Register::X11.compressed_index(), Some(3));
        assert_eq!(Register::X15.compressed_index(), Some(7));
        assert_eq!(Register::X16.compressed_index(), None);
    }
}
