//! Deduplication against persisted codes and within the input itself.

use std::collections::HashSet;

/// Verdict for one candidate code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    New,
    AlreadyPersisted,
    RepeatedInInput,
}

/// Exact-match filter over the run-start snapshot of persisted codes.
///
/// The snapshot is borrowed and never modified. Codes admitted during the run
/// are tracked separately so a code repeated in the input is written once.
pub struct DedupFilter<'a> {
    persisted: &'a HashSet<String>,
    admitted: HashSet<String>,
}

impl<'a> DedupFilter<'a> {
    pub fn new(persisted: &'a HashSet<String>) -> Self {
        Self {
            persisted,
            admitted: HashSet::new(),
        }
    }

    /// Whether `code` is absent from the persisted snapshot.
    pub fn is_new(&self, code: &str) -> bool {
        !self.persisted.contains(code)
    }

    /// Classifies `code` and remembers it when admitted.
    pub fn admit(&mut self, code: &str) -> Admission {
        if !self.is_new(code) {
            return Admission::AlreadyPersisted;
        }
        if !self.admitted.insert(code.to_string()) {
            return Admission::RepeatedInInput;
        }
        Admission::New
    }

    pub fn admitted(&self) -> usize {
        self.admitted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_code_is_not_new() {
        let persisted: HashSet<String> = ["C-1".to_string()].into();
        let filter = DedupFilter::new(&persisted);

        assert!(!filter.is_new("C-1"));
        assert!(filter.is_new("C-2"));
    }

    #[test]
    fn test_membership_is_exact() {
        let persisted: HashSet<String> = ["C-1".to_string()].into();
        let filter = DedupFilter::new(&persisted);

        assert!(filter.is_new("c-1"));
        assert!(filter.is_new("C-10"));
    }

    #[test]
    fn test_admit_sequence() {
        let persisted: HashSet<String> = ["C-1".to_string()].into();
        let mut filter = DedupFilter::new(&persisted);

        assert_eq!(filter.admit("C-1"), Admission::AlreadyPersisted);
        assert_eq!(filter.admit("C-2"), Admission::New);
        assert_eq!(filter.admit("C-2"), Admission::RepeatedInInput);
        assert_eq!(filter.admit("C-3"), Admission::New);
        assert_eq!(filter.admitted(), 2);
    }

    #[test]
    fn test_snapshot_is_not_modified() {
        let persisted: HashSet<String> = HashSet::new();
        let mut filter = DedupFilter::new(&persisted);

        filter.admit("C-9");

        assert!(filter.is_new("C-9"));
        assert!(persisted.is_empty());
    }
}
