//! BLAS mode flags
//!
//! Flags arrive as strings and are matched with `LSAME` semantics: exactly one
//! character, case-insensitive. Anything else is a parameter-legality failure
//! at the flag's position.

use netlib_core::lsame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    No,
    Yes,
}

impl Transpose {
    /// `N`, `T` or `C` (conjugate transpose equals transpose for real data)
    pub fn parse(flag: &str) -> Option<Self> {
        if lsame(flag, 'N') {
            Some(Self::No)
        } else if lsame(flag, 'T') || lsame(flag, 'C') {
            Some(Self::Yes)
        } else {
            None
        }
    }

    pub fn is_transposed(self) -> bool {
        matches!(self, Self::Yes)
    }

    pub fn flip(self) -> Self {
        match self {
            Self::No => Self::Yes,
            Self::Yes => Self::No,
        }
    }

    pub fn as_char(self) -> u8 {
        match self {
            Self::No => b'N',
            Self::Yes => b'T',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uplo {
    Upper,
    Lower,
}

impl Uplo {
    pub fn parse(flag: &str) -> Option<Self> {
        if lsame(flag, 'U') {
            Some(Self::Upper)
        } else if lsame(flag, 'L') {
            Some(Self::Lower)
        } else {
            None
        }
    }

    pub fn is_upper(self) -> bool {
        matches!(self, Self::Upper)
    }

    pub fn as_char(self) -> u8 {
        match self {
            Self::Upper => b'U',
            Self::Lower => b'L',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diag {
    NonUnit,
    Unit,
}

impl Diag {
    pub fn parse(flag: &str) -> Option<Self> {
        if lsame(flag, 'N') {
            Some(Self::NonUnit)
        } else if lsame(flag, 'U') {
            Some(Self::Unit)
        } else {
            None
        }
    }

    pub fn is_unit(self) -> bool {
        matches!(self, Self::Unit)
    }

    pub fn as_char(self) -> u8 {
        match self {
            Self::NonUnit => b'N',
            Self::Unit => b'U',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn parse(flag: &str) -> Option<Self> {
        if lsame(flag, 'L') {
            Some(Self::Left)
        } else if lsame(flag, 'R') {
            Some(Self::Right)
        } else {
            None
        }
    }

    pub fn is_left(self) -> bool {
        matches!(self, Self::Left)
    }

    pub fn as_char(self) -> u8 {
        match self {
            Self::Left => b'L',
            Self::Right => b'R',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transpose_accepts_conjugate() {
        assert_eq!(Transpose::parse("c"), Some(Transpose::Yes));
        assert_eq!(Transpose::parse("n"), Some(Transpose::No));
        assert_eq!(Transpose::parse("X"), None);
        assert_eq!(Transpose::parse("No"), None);
    }

    #[test]
    fn flags_round_trip_to_fortran_characters() {
        assert_eq!(Uplo::parse("l").map(Uplo::as_char), Some(b'L'));
        assert_eq!(Diag::parse("U").map(Diag::as_char), Some(b'U'));
        assert_eq!(Side::parse("r").map(Side::as_char), Some(b'R'));
    }
}
