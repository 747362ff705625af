//! The ordered pair list of one comparison run and its review flags.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::{Result, TwinviewError};

/// One original/translated image pair sharing a filename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePair {
    pub original_path: PathBuf,
    pub translated_path: PathBuf,
    pub filename: String,
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    pairs: Vec<ImagePair>,
    current: Option<usize>,
    needs_fix: BTreeSet<String>,
}

impl Session {
    /// A fresh session positioned on the first pair (if any).
    pub fn new(pairs: Vec<ImagePair>) -> Self {
        let current = if pairs.is_empty() { None } else { Some(0) };
        Self {
            pairs,
            current,
            needs_fix: BTreeSet::new(),
        }
    }

    pub fn pairs(&self) -> &[ImagePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&ImagePair> {
        self.current.and_then(|i| self.pairs.get(i))
    }

    pub fn select(&mut self, index: usize) -> Result<&ImagePair> {
        let total = self.pairs.len();
        match self.pairs.get(index) {
            Some(pair) => {
                self.current = Some(index);
                Ok(pair)
            }
            None => Err(TwinviewError::PairIndexOutOfRange { index, total }),
        }
    }

    pub fn has_next(&self) -> bool {
        match self.current {
            Some(i) => i + 1 < self.pairs.len(),
            None => !self.pairs.is_empty(),
        }
    }

    pub fn has_prev(&self) -> bool {
        self.current.is_some_and(|i| i > 0)
    }

    /// Advance one pair. Returns the new index, or `None` at the end.
    pub fn next(&mut self) -> Option<usize> {
        if !self.has_next() {
            return None;
        }
        let index = self.current.map_or(0, |i| i + 1);
        self.current = Some(index);
        Some(index)
    }

    pub fn prev(&mut self) -> Option<usize> {
        if !self.has_prev() {
            return None;
        }
        let index = self.current.map_or(0, |i| i - 1);
        self.current = Some(index);
        Some(index)
    }

    pub fn set_needs_fix(&mut self, filename: &str, flagged: bool) {
        if flagged {
            self.needs_fix.insert(filename.to_string());
        } else {
            self.needs_fix.remove(filename);
        }
    }

    /// Flip the flag and return its new value.
    pub fn toggle_needs_fix(&mut self, filename: &str) -> bool {
        let flagged = !self.is_flagged(filename);
        self.set_needs_fix(filename, flagged);
        flagged
    }

    pub fn is_flagged(&self, filename: &str) -> bool {
        self.needs_fix.contains(filename)
    }

    pub fn flagged_count(&self) -> usize {
        self.needs_fix.len()
    }

    pub fn flagged(&self) -> impl Iterator<Item = &str> {
        self.needs_fix.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(name: &str) -> ImagePair {
        ImagePair {
            original_path: PathBuf::from("orig").join(name),
            translated_path: PathBuf::from("trans").join(name),
            filename: name.to_string(),
        }
    }

    #[test]
    fn test_empty_session_has_no_current() {
        let mut session = Session::new(Vec::new());
        assert!(session.current().is_none());
        assert!(!session.has_next());
        assert!(session.next().is_none());
        assert!(session.prev().is_none());
    }

    #[test]
    fn test_navigation_bounds() {
        let mut session = Session::new(vec![pair("a.png"), pair("b.png")]);
        assert_eq!(session.current_index(), Some(0));
        assert!(!session.has_prev());
        assert_eq!(session.next(), Some(1));
        assert!(session.next().is_none());
        assert_eq!(session.current_index(), Some(1));
        assert_eq!(session.prev(), Some(0));
    }

    #[test]
    fn test_select_out_of_range() {
        let mut session = Session::new(vec![pair("a.png")]);
        assert!(matches!(
            session.select(3),
            Err(TwinviewError::PairIndexOutOfRange { index: 3, total: 1 })
        ));
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn test_toggle_needs_fix() {
        let mut session = Session::new(vec![pair("a.png")]);
        assert!(session.toggle_needs_fix("a.png"));
        assert!(session.is_flagged("a.png"));
        assert!(!session.toggle_needs_fix("a.png"));
        assert_eq!(session.flagged_count(), 0);
    }
}
