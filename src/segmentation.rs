//! Fixed-width segmentation of region codes.
//!
//! A [Segmentation] is an ordered list of [Level]s. Each level consumes a
//! fixed number of bytes from the front of a region code, so a code like
//! `101020116` under the widths `[1, 2, 2, 2, 2]` splits into the pieces
//! `1`, `01`, `02`, `01` and `16`, one per hierarchy level.
//!
//! A code does not have to reach the deepest level. It is valid exactly when
//! its length lands on the boundary after some non-empty prefix of the
//! levels, e.g. `1`, `101` and `10102` are all valid under the scheme above,
//! while the empty code, `10` and `1010201161` are not.

use std::fmt;
use std::iter::FusedIterator;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// One hierarchy level of a [Segmentation].
///
/// The label only shows up in diagnostics, lookups never look at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    label: String,
    width: NonZeroUsize,
}

impl Level {
    pub fn new(label: impl Into<String>, width: usize) -> Result<Self, SegmentationError> {
        let label = label.into();
        let Some(width) = NonZeroUsize::new(width) else {
            return Err(SegmentationError::ZeroWidth { label });
        };
        Ok(Self { label, width })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The number of code bytes this level consumes.
    pub fn width(&self) -> usize {
        self.width.get()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.label, self.width)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentationError {
    /// A segmentation needs at least one level.
    Empty,
    /// Every level must consume at least one byte.
    ZeroWidth { label: String },
    /// An entry of the textual form was not `label:width`.
    Malformed { entry: String },
}

impl fmt::Display for SegmentationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentationError::Empty => write!(f, "segmentation has no levels"),
            SegmentationError::ZeroWidth { label } => {
                write!(f, "level {label:?} has a width of zero")
            }
            SegmentationError::Malformed { entry } => {
                write!(f, "malformed segmentation entry {entry:?}, expected label:width")
            }
        }
    }
}

impl std::error::Error for SegmentationError {}

/// The code does not end on a level boundary of the segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncorrectCode;

impl fmt::Display for IncorrectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region code incorrect")
    }
}

impl std::error::Error for IncorrectCode {}

/// An ordered, immutable list of levels describing how region codes split
/// into per-level segments.
///
/// Trees share a segmentation through an `Arc`, it is never copied per node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    levels: Vec<Level>,
}

impl Segmentation {
    pub fn new(levels: Vec<Level>) -> Result<Self, SegmentationError> {
        if levels.is_empty() {
            return Err(SegmentationError::Empty);
        }
        Ok(Self { levels })
    }

    /// Builds a segmentation from `(label, width)` pairs.
    pub fn from_widths<'a>(
        levels: impl IntoIterator<Item = (&'a str, usize)>,
    ) -> Result<Self, SegmentationError> {
        let levels = levels
            .into_iter()
            .map(|(label, width)| Level::new(label, width))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(levels)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// The number of levels, at least one.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// The length of a code that resolves down to the deepest level.
    pub fn max_code_len(&self) -> usize {
        self.levels.iter().map(Level::width).sum()
    }

    /// Returns the depth a code of `code_len` bytes resolves to, or `None`
    /// if that length does not land on a level boundary.
    pub fn depth_of(&self, code_len: usize) -> Option<usize> {
        let mut consumed = 0;
        let mut depth = 0;
        for level in &self.levels {
            let next = consumed + level.width();
            if next > code_len {
                break;
            }
            consumed = next;
            depth += 1;
        }

        if code_len == 0 || consumed != code_len {
            return None;
        }
        Some(depth)
    }

    /// Splits `code` into one piece per consumed level.
    ///
    /// Fails without yielding anything if the code length is zero, falls in
    /// the middle of a level, exceeds the deepest level, or if a boundary
    /// would split a multi-byte character.
    pub fn decompose<'a>(&'a self, code: &'a str) -> Result<Pieces<'a>, IncorrectCode> {
        let depth = self.depth_of(code.len()).ok_or(IncorrectCode)?;
        let levels = &self.levels[..depth];

        let mut offset = 0;
        for level in levels {
            offset += level.width();
            if !code.is_char_boundary(offset) {
                return Err(IncorrectCode);
            }
        }

        Ok(Pieces {
            rest: code,
            levels: levels.iter(),
        })
    }
}

impl FromStr for Segmentation {
    type Err = SegmentationError;

    /// Parses the textual form `label:width,label:width,...`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(SegmentationError::Empty);
        }

        let mut levels = Vec::new();
        for entry in s.split(',') {
            let entry = entry.trim();
            let Some((label, width)) = entry.split_once(':') else {
                return Err(SegmentationError::Malformed {
                    entry: entry.to_owned(),
                });
            };
            let Ok(width) = width.trim().parse::<usize>() else {
                return Err(SegmentationError::Malformed {
                    entry: entry.to_owned(),
                });
            };
            levels.push(Level::new(label.trim(), width)?);
        }
        Self::new(levels)
    }
}

impl fmt::Display for Segmentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, level) in self.levels.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{level}")?;
        }
        Ok(())
    }
}

/// The pieces of a successfully decomposed code, outermost level first.
#[derive(Debug, Clone)]
pub struct Pieces<'a> {
    rest: &'a str,
    levels: std::slice::Iter<'a, Level>,
}

impl<'a> Iterator for Pieces<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let level = self.levels.next()?;
        let (piece, rest) = self.rest.split_at(level.width());
        self.rest = rest;
        Some(piece)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.levels.size_hint()
    }
}

impl ExactSizeIterator for Pieces<'_> {}

impl FusedIterator for Pieces<'_> {}
