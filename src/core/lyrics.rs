use serde::ser::{Serialize, SerializeMap, Serializer};

/// Label used when a lyrics block carries no section markers.
pub const DEFAULT_SECTION: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsSection {
    pub label: String,
    pub text: String,
}

/// Lyrics split into labelled sections.
///
/// Labels are unique: inserting an existing label replaces its text in place.
/// Insertion order is kept for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricsResult {
    sections: Vec<LyricsSection>,
}

impl LyricsResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an unstructured block under the `"default"` label.
    pub fn single<S: Into<String>>(text: S) -> Self {
        let mut result = Self::new();
        result.insert(DEFAULT_SECTION, text);
        result
    }

    pub fn insert<L: Into<String>, T: Into<String>>(&mut self, label: L, text: T) {
        let label = label.into();
        let text = text.into();
        match self.sections.iter_mut().find(|s| s.label == label) {
            Some(existing) => existing.text = text,
            None => self.sections.push(LyricsSection { label, text }),
        }
    }

    #[cfg(test)]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LyricsSection> {
        self.sections.iter()
    }

    #[cfg(test)]
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// True when every section's text is blank.
    pub fn is_blank(&self) -> bool {
        self.sections.iter().all(|s| s.text.trim().is_empty())
    }
}

impl Serialize for LyricsResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.label, &section.text)?;
        }
        map.end()
    }
}
