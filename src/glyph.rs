//! Glyph symbols and the patterns built from them.
//!
//! A [`Pattern`] is up to three symbols. The first one selects the big glyph
//! on the left of the icon; the other two select the small glyphs stacked on
//! the right.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A glyph symbol as it appears in a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// `4`
    Four,
    /// `6`
    Six,
    /// `?`
    Unknown,
}

impl Glyph {
    /// Parses a single pattern symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '4' => Some(Self::Four),
            '6' => Some(Self::Six),
            '?' => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Four => '4',
            Self::Six => '6',
            Self::Unknown => '?',
        }
    }

    /// The small-sheet variant of this glyph. The small sheet has no `?`.
    pub fn small(self) -> Option<SmallGlyph> {
        match self {
            Self::Four => Some(SmallGlyph::Four),
            Self::Six => Some(SmallGlyph::Six),
            Self::Unknown => None,
        }
    }
}

/// Glyphs that exist in the small sprite row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmallGlyph {
    Four,
    Six,
}

/// Maximum number of symbols in a pattern.
pub const MAX_PATTERN_LEN: usize = 3;

/// An ordered sequence of 0 to 3 glyph symbols.
///
/// ```
/// use addr_badge::{Glyph, Pattern};
///
/// let pattern: Pattern = "64".parse().unwrap();
/// assert_eq!(pattern.big(), Some(Glyph::Six));
/// assert_eq!(pattern.small_slots(), [Some(Glyph::Four), None]);
/// assert_eq!(pattern.to_string(), "64");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pattern {
    symbols: [Option<Glyph>; MAX_PATTERN_LEN],
}

impl Pattern {
    /// The empty pattern; renders a blank icon.
    pub const EMPTY: Pattern = Pattern {
        symbols: [None; MAX_PATTERN_LEN],
    };

    /// Builds a pattern from glyphs, failing if there are more than three.
    pub fn from_glyphs(glyphs: &[Glyph]) -> Result<Self, Error> {
        if glyphs.len() > MAX_PATTERN_LEN {
            return Err(Error::PatternTooLong(glyphs.len()));
        }
        let mut symbols = [None; MAX_PATTERN_LEN];
        for (slot, glyph) in symbols.iter_mut().zip(glyphs) {
            *slot = Some(*glyph);
        }
        Ok(Self { symbols })
    }

    /// Glyph drawn in the big slot.
    pub fn big(&self) -> Option<Glyph> {
        self.symbols[0]
    }

    /// Glyphs drawn in the upper and lower small slots.
    pub fn small_slots(&self) -> [Option<Glyph>; 2] {
        [self.symbols[1], self.symbols[2]]
    }

    pub fn len(&self) -> usize {
        self.symbols.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols[0].is_none()
    }

    pub fn glyphs(&self) -> impl Iterator<Item = Glyph> + '_ {
        self.symbols.iter().flatten().copied()
    }
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s.chars().count();
        if count > MAX_PATTERN_LEN {
            return Err(Error::PatternTooLong(count));
        }
        let mut symbols = [None; MAX_PATTERN_LEN];
        for (position, symbol) in s.chars().enumerate() {
            let glyph =
                Glyph::from_symbol(symbol).ok_or(Error::UnknownGlyph { symbol, position })?;
            symbols[position] = Some(glyph);
        }
        Ok(Self { symbols })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for glyph in self.glyphs() {
            write!(f, "{}", glyph.symbol())?;
        }
        Ok(())
    }
}
