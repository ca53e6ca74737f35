//! Benchmark suite catalogues
//!
//! The EPFL combinational suite is addressed by a bit set so callers can
//! select single circuits or the arithmetic/random halves.

use std::ops::{BitAnd, BitOr};

/// Selection of EPFL benchmarks, one bit per circuit in catalogue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpflSelection(u32);

macro_rules! epfl_flags {
    ($($name:ident = $bit:expr => $circuit:literal),* $(,)?) => {
        impl EpflSelection {
            $(
                #[doc = concat!("The `", $circuit, "` circuit.")]
                pub const $name: Self = Self(1 << $bit);
            )*
        }
    };
}

epfl_flags! {
    ADDER = 0 => "adder",
    BAR = 1 => "bar",
    DIV = 2 => "div",
    HYP = 3 => "hyp",
    LOG2 = 4 => "log2",
    MAX = 5 => "max",
    MULTIPLIER = 6 => "multiplier",
    SIN = 7 => "sin",
    SQRT = 8 => "sqrt",
    SQUARE = 9 => "square",
    ARBITER = 10 => "arbiter",
    CAVLC = 11 => "cavlc",
    CTRL = 12 => "ctrl",
    DEC = 13 => "dec",
    I2C = 14 => "i2c",
    INT2FLOAT = 15 => "int2float",
    MEM_CTRL = 16 => "mem_ctrl",
    PRIORITY = 17 => "priority",
    ROUTER = 18 => "router",
    VOTER = 19 => "voter",
}

impl EpflSelection {
    /// The ten arithmetic circuits.
    pub const ARITHMETIC: Self = Self(0b0000_0000_0011_1111_1111);
    /// The ten random/control circuits.
    pub const RANDOM: Self = Self(0b1111_1111_1100_0000_0000);
    /// The whole suite.
    pub const ALL: Self = Self(0b1111_1111_1111_1111_1111);

    /// Empty selection.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bit pattern.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if every circuit in `other` is selected.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for EpflSelection {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for EpflSelection {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for EpflSelection {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

const EPFL_NAMES: [&str; 20] = [
    "adder", "bar", "div", "hyp", "log2", "max", "multiplier", "sin", "sqrt", "square",
    "arbiter", "cavlc", "ctrl", "dec", "i2c", "int2float", "mem_ctrl", "priority", "router",
    "voter",
];

const CRYPTO_NAMES: [&str; 15] = [
    "AES-expanded_untilsat",
    "AES-non-expanded_unstilsat",
    "DES-expanded_untilsat",
    "DES-non-expanded_untilsat",
    "adder_32bit_untilsat",
    "adder_64bit_untilsat",
    "adder_untilsat",
    "comparator_32bit_signed_lt_untilsat",
    "comparator_32bit_signed_lteq_untilsat",
    "comparator_32bit_unsigned_lt_untilsat",
    "comparator_32bit_unsigned_lteq_untilsat",
    "md5_untilsat",
    "mult_32x32_untilsat",
    "sha-1_untilsat",
    "sha-256_untilsat",
];

/// Names of the selected EPFL benchmarks in catalogue order.
#[must_use]
pub fn epfl_benchmarks(selection: EpflSelection) -> Vec<&'static str> {
    EPFL_NAMES
        .iter()
        .enumerate()
        .filter(|(i, _)| (selection.0 >> i) & 1 == 1)
        .map(|(_, name)| *name)
        .collect()
}

/// Names of the crypto benchmarks.
#[must_use]
pub fn crypto_benchmarks() -> Vec<&'static str> {
    CRYPTO_NAMES.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epfl_all() {
        let all = epfl_benchmarks(EpflSelection::ALL);
        assert_eq!(all.len(), 20);
        assert_eq!(all[0], "adder");
        assert_eq!(all[19], "voter");
        assert_eq!(epfl_benchmarks(EpflSelection::default()), all);
    }

    #[test]
    fn test_epfl_halves_partition_suite() {
        let arithmetic = epfl_benchmarks(EpflSelection::ARITHMETIC);
        let random = epfl_benchmarks(EpflSelection::RANDOM);
        assert_eq!(arithmetic.len(), 10);
        assert_eq!(random.len(), 10);
        assert_eq!(arithmetic[9], "square");
        assert_eq!(random[0], "arbiter");
        assert_eq!(EpflSelection::ARITHMETIC | EpflSelection::RANDOM, EpflSelection::ALL);
        assert_eq!(
            (EpflSelection::ARITHMETIC & EpflSelection::RANDOM).bits(),
            EpflSelection::empty().bits()
        );
    }

    #[test]
    fn test_epfl_single_flags() {
        let picked = epfl_benchmarks(EpflSelection::VOTER | EpflSelection::ADDER | EpflSelection::SIN);
        assert_eq!(picked, vec!["adder", "sin", "voter"]);
        assert!(EpflSelection::ARITHMETIC.contains(EpflSelection::SQRT));
        assert!(!EpflSelection::ARITHMETIC.contains(EpflSelection::I2C));
    }

    #[test]
    fn test_crypto_catalogue() {
        let crypto = crypto_benchmarks();
        assert_eq!(crypto.len(), 15);
        assert!(crypto.contains(&"md5_untilsat"));
    }
}
