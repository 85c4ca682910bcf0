//! Style sets — the 1–3 distinct styles a session plays, primary first.

use std::fmt;

use tracing::warn;

use super::{SelectionError, Style};

/// Maximum number of concurrently playing styles (and therefore layers).
pub const MAX_STYLES: usize = 3;

/// An ordered, duplicate-free selection of 1 to [`MAX_STYLES`] styles.
///
/// The first style is the primary one: it picks the progression and the
/// base tempo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSet {
    styles: [Style; MAX_STYLES],
    len: u8,
}

impl StyleSet {
    /// A set holding exactly one style.
    pub fn single(style: Style) -> Self {
        Self {
            styles: [style; MAX_STYLES],
            len: 1,
        }
    }

    /// Build a set from a list, rejecting empty selections and more than
    /// [`MAX_STYLES`] distinct styles. Repeated styles count once.
    pub fn new(styles: &[Style]) -> Result<Self, SelectionError> {
        let distinct = dedup(styles);
        match distinct.len() {
            0 => Err(SelectionError::Empty),
            n if n > MAX_STYLES => Err(SelectionError::TooMany(n)),
            _ => Ok(Self::from_distinct(&distinct)),
        }
    }

    /// Build a set from a user selection, keeping the first [`MAX_STYLES`]
    /// distinct styles and dropping the rest.
    pub fn truncated(styles: &[Style]) -> Result<Self, SelectionError> {
        let distinct = dedup(styles);
        if distinct.is_empty() {
            return Err(SelectionError::Empty);
        }
        if distinct.len() > MAX_STYLES {
            warn!(
                selected = distinct.len(),
                kept = MAX_STYLES,
                dropped = ?&distinct[MAX_STYLES..],
                "too many styles selected, truncating"
            );
        }
        Ok(Self::from_distinct(&distinct[..distinct.len().min(MAX_STYLES)]))
    }

    fn from_distinct(distinct: &[Style]) -> Self {
        let mut set = Self::single(distinct[0]);
        for (slot, style) in set.styles.iter_mut().zip(distinct) {
            *slot = *style;
        }
        set.len = distinct.len() as u8;
        set
    }

    pub fn primary(&self) -> Style {
        self.styles[0]
    }

    pub fn as_slice(&self) -> &[Style] {
        &self.styles[..self.len as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = Style> + '_ {
        self.as_slice().iter().copied()
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false; a set holds at least one style.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, style: Style) -> bool {
        self.as_slice().contains(&style)
    }
}

fn dedup(styles: &[Style]) -> Vec<Style> {
    let mut distinct = Vec::with_capacity(styles.len());
    for style in styles {
        if !distinct.contains(style) {
            distinct.push(*style);
        }
    }
    distinct
}

impl fmt::Display for StyleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, style) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{style}")?;
        }
        Ok(())
    }
}
