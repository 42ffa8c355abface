//! Message text under conversion

/// Text to put in place of `start..end` (byte offsets into the original)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Replacement {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(&self, other: &Replacement) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A message and whether it has been rewritten
#[derive(Debug, Clone)]
pub struct Document {
    original: String,
    text: String,
    modified: bool,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let original = text.into();
        Self {
            text: original.clone(),
            original,
            modified: false,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Splice replacements into the original text in a single pass.
    ///
    /// Replacements are applied in start order; one overlapping an
    /// already applied replacement is dropped.
    pub fn apply(&mut self, replacements: &[Replacement]) {
        if replacements.is_empty() {
            return;
        }
        let mut ordered: Vec<&Replacement> = replacements.iter().collect();
        ordered.sort_by_key(|r| (r.start, r.end));

        let mut out = String::with_capacity(self.original.len());
        let mut cursor = 0;
        for r in ordered {
            if r.start < cursor || r.end > self.original.len() {
                tracing::debug!("dropping overlapping replacement {}..{}", r.start, r.end);
                continue;
            }
            out.push_str(&self.original[cursor..r.start]);
            out.push_str(&r.text);
            cursor = r.end;
        }
        out.push_str(&self.original[cursor..]);

        self.text = out;
        self.modified = true;
    }

    /// The rewritten text, or `None` when nothing changed
    pub fn into_modified(self) -> Option<String> {
        self.modified.then_some(self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn replacement(start: usize, end: usize, text: &str) -> Replacement {
        Replacement {
            start,
            end,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_unmodified() {
        let doc = Document::new("nothing here");
        assert!(!doc.is_modified());
        assert_eq!(doc.into_modified(), None);
    }

    #[test]
    fn test_apply_in_one_pass() {
        let mut doc = Document::new("6 feet and 170 pounds");
        doc.apply(&[replacement(11, 21, "77 kg"), replacement(0, 6, "2 m")]);
        assert_eq!(doc.text(), "2 m and 77 kg");
        assert_eq!(doc.original(), "6 feet and 170 pounds");
        assert_eq!(doc.into_modified(), Some("2 m and 77 kg".to_string()));
    }

    #[test]
    fn test_overlapping_replacement_dropped() {
        let mut doc = Document::new("abcdef");
        doc.apply(&[replacement(0, 4, "X"), replacement(2, 5, "Y")]);
        assert_eq!(doc.text(), "Xef");
    }

    #[test]
    fn test_overlaps() {
        assert!(replacement(0, 4, "").overlaps(&replacement(3, 6, "")));
        assert!(!replacement(0, 3, "").overlaps(&replacement(3, 6, "")));
        assert_eq!(replacement(2, 7, "").len(), 5);
    }
}
