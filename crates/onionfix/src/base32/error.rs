use core::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Base32Error {
    InvalidLength { expected: usize, found: usize },
    InvalidSymbol { byte: u8, index: usize },
    NonCanonical,
}

impl fmt::Display for Base32Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, found } => {
                write!(f, "invalid length: expected {expected}, found {found}")
            }
            Self::InvalidSymbol { byte, index } => {
                write!(f, "invalid symbol {byte:#04x} at index {index}")
            }
            Self::NonCanonical => write!(f, "non-canonical encoding: padding bits are set"),
        }
    }
}

impl core::error::Error for Base32Error {}
