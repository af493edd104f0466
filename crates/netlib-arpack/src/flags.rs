//! ARPACK option flags
//!
//! `BMAT` and `HOWMNY` are single characters matched with `LSAME`; `WHICH` is
//! a two-letter word compared whole and case-insensitively, so `"L"` or
//! `"LAX"` are illegal.

use netlib_core::{lsame, lsame_word};

/// Type of the eigenproblem: `B = I` or a generalized `B`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bmat {
    Standard,
    Generalized,
}

impl Bmat {
    pub fn parse(flag: &str) -> Option<Self> {
        if lsame(flag, 'I') {
            Some(Self::Standard)
        } else if lsame(flag, 'G') {
            Some(Self::Generalized)
        } else {
            None
        }
    }

    pub fn as_char(self) -> u8 {
        match self {
            Self::Standard => b'I',
            Self::Generalized => b'G',
        }
    }
}

/// Part of the spectrum to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Which {
    LargestAlgebraic,
    SmallestAlgebraic,
    LargestMagnitude,
    SmallestMagnitude,
    /// Half from each end, one more from the high end when `nev` is odd
    BothEnds,
}

impl Which {
    /// Any of `LA`, `SA`, `LM`, `SM`, `BE`
    pub fn parse(word: &str) -> Option<Self> {
        [
            ("LA", Self::LargestAlgebraic),
            ("SA", Self::SmallestAlgebraic),
            ("LM", Self::LargestMagnitude),
            ("SM", Self::SmallestMagnitude),
            ("BE", Self::BothEnds),
        ]
        .into_iter()
        .find_map(|(name, which)| lsame_word(word, name).then_some(which))
    }

    /// The orderings accepted by the sort utilities, which have no `BE`
    pub fn parse_sort(word: &str) -> Option<Self> {
        Self::parse(word).filter(|which| *which != Self::BothEnds)
    }

    pub fn as_chars(self) -> [u8; 2] {
        match self {
            Self::LargestAlgebraic => *b"LA",
            Self::SmallestAlgebraic => *b"SA",
            Self::LargestMagnitude => *b"LM",
            Self::SmallestMagnitude => *b"SM",
            Self::BothEnds => *b"BE",
        }
    }
}

/// How many Ritz vectors `seupd` computes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Howmny {
    All,
    Select,
}

impl Howmny {
    pub fn parse(flag: &str) -> Option<Self> {
        if lsame(flag, 'A') {
            Some(Self::All)
        } else if lsame(flag, 'S') {
            Some(Self::Select)
        } else {
            None
        }
    }

    pub fn as_char(self) -> u8 {
        match self {
            Self::All => b'A',
            Self::Select => b'S',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn which_compares_the_whole_word() {
        assert_eq!(Which::parse("sa"), Some(Which::SmallestAlgebraic));
        assert_eq!(Which::parse("Be"), Some(Which::BothEnds));
        assert_eq!(Which::parse("L"), None);
        assert_eq!(Which::parse("LAX"), None);
    }

    #[test]
    fn sort_orderings_exclude_both_ends() {
        assert_eq!(Which::parse_sort("BE"), None);
        assert_eq!(Which::parse_sort("lm"), Some(Which::LargestMagnitude));
    }

    #[test]
    fn single_character_flags() {
        assert_eq!(Bmat::parse("g"), Some(Bmat::Generalized));
        assert_eq!(Bmat::parse("IG"), None);
        assert_eq!(Howmny::parse("a").map(Howmny::as_char), Some(b'A'));
        assert_eq!(Howmny::parse("P"), None);
    }
}
