//! University resolution for college rows.

use std::collections::HashMap;

use crate::domain::entities::UniversityRef;

/// How a college's parent university was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    ByCode(String),
    ByName(String),
    Unresolved,
}

impl Resolution {
    pub fn university_id(&self) -> Option<&str> {
        match self {
            Self::ByCode(id) | Self::ByName(id) => Some(id),
            Self::Unresolved => None,
        }
    }

    pub fn into_university_id(self) -> Option<String> {
        match self {
            Self::ByCode(id) | Self::ByName(id) => Some(id),
            Self::Unresolved => None,
        }
    }
}

/// Snapshot of known universities, keyed by code and by lowercased name.
///
/// Built once when a run starts and never refreshed. When two universities share
/// a name (ignoring case), the one loaded last owns the name key.
#[derive(Debug, Clone, Default)]
pub struct ResolutionIndex {
    by_code: HashMap<String, String>,
    by_name: HashMap<String, String>,
}

impl ResolutionIndex {
    pub fn build(universities: impl IntoIterator<Item = UniversityRef>) -> Self {
        let mut index = Self::default();
        for university in universities {
            index
                .by_name
                .insert(university.name.to_lowercase(), university.id.clone());
            index.by_code.insert(university.aishe_code, university.id);
        }
        index
    }

    /// Resolves a parent university. Code wins over name; an unknown code falls
    /// through to the name lookup.
    pub fn resolve(&self, code: Option<&str>, name: Option<&str>) -> Resolution {
        if let Some(id) = code.and_then(|c| self.by_code.get(c)) {
            return Resolution::ByCode(id.clone());
        }

        if let Some(id) = name.and_then(|n| self.by_name.get(&n.to_lowercase())) {
            return Resolution::ByName(id.clone());
        }

        Resolution::Unresolved
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
