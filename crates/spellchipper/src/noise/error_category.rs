//! # Error Categories

use core::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The kind of corruption applied to a token.
///
/// The discriminant is the per-word label code; `0` means no error.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ErrorCategory {
    /// The token was left unchanged.
    #[default]
    None = 0,

    /// Tone mark moved between the vowels of `uy` / `oa`.
    SpecialToneSwap = 1,

    /// `l` <-> `n` confusion.
    NgongLN = 2,

    /// `s` <-> `x` confusion.
    NgongSX = 3,

    /// `tr` <-> `ch` confusion.
    NgongTrCh = 4,

    /// `gi` <-> `d` confusion.
    NgongGiD = 5,

    /// `r` <-> `d` confusion.
    NgongRD = 6,

    /// Diacritics partially or fully removed.
    RemoveAccent = 7,

    /// Characters permuted.
    SwapChar = 8,

    /// Characters deleted.
    RemoveChar = 9,

    /// Random letters inserted.
    AddChar = 10,
}

impl ErrorCategory {
    /// All categories, in code order.
    pub const ALL: [ErrorCategory; 11] = [
        ErrorCategory::None,
        ErrorCategory::SpecialToneSwap,
        ErrorCategory::NgongLN,
        ErrorCategory::NgongSX,
        ErrorCategory::NgongTrCh,
        ErrorCategory::NgongGiD,
        ErrorCategory::NgongRD,
        ErrorCategory::RemoveAccent,
        ErrorCategory::SwapChar,
        ErrorCategory::RemoveChar,
        ErrorCategory::AddChar,
    ];

    /// The label code for this category.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a category by label code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Is this an actual error (anything but [`ErrorCategory::None`])?
    pub fn is_error(self) -> bool {
        self != ErrorCategory::None
    }

    /// A short human-readable name.
    pub fn name(self) -> &'static str {
        use ErrorCategory::*;
        match self {
            None => "None",
            SpecialToneSwap => "Special tone swap",
            NgongLN => "Ngong l-n",
            NgongSX => "Ngong s-x",
            NgongTrCh => "Ngong tr-ch",
            NgongGiD => "Ngong gi-d",
            NgongRD => "Ngong r-d",
            RemoveAccent => "Remove accent",
            SwapChar => "Swap char",
            RemoveChar => "Remove char",
            AddChar => "Add char",
        }
    }
}

impl Display for ErrorCategory {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        for (idx, category) in ErrorCategory::ALL.iter().enumerate() {
            assert_eq!(category.code() as usize, idx);
            assert_eq!(ErrorCategory::from_code(idx as u8), Some(*category));
        }
        assert_eq!(ErrorCategory::from_code(11), None);

        assert!(!ErrorCategory::None.is_error());
        assert!(ErrorCategory::AddChar.is_error());
        assert_eq!(ErrorCategory::NgongLN.to_string(), "Ngong l-n");
    }
}
