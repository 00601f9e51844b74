/// One classification outcome: labels with their confidences, in a fixed
/// entry order.
///
/// Confidences lie in [0, 1] but are not required to sum to 1. Entry order is
/// semantically meaningful: ties in [`top_label`](Self::top_label) resolve to
/// the earlier entry, so producers must emit entries in a stable order (the
/// classifier uses label registration order).
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    entries: Vec<(String, f32)>,
}

impl Classification {
    pub fn new(entries: Vec<(String, f32)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, f32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The label with the strictly greatest confidence.
    ///
    /// On ties the first-seen entry wins. This exact behavior is part of the
    /// contract, not an accident of implementation.
    pub fn top_label(&self) -> Option<&str> {
        let mut best: Option<&(String, f32)> = None;

        for entry in &self.entries {
            match best {
                Some((_, confidence)) if entry.1 > *confidence => best = Some(entry),
                None => best = Some(entry),
                _ => {}
            }
        }

        best.map(|(label, _)| label.as_str())
    }
}

impl FromIterator<(String, f32)> for Classification {
    fn from_iter<I: IntoIterator<Item = (String, f32)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(pairs: &[(&str, f32)]) -> Classification {
        pairs
            .iter()
            .map(|(label, confidence)| (label.to_string(), *confidence))
            .collect()
    }

    #[test]
    fn test_top_label_simple() {
        let result = classification(&[("left", 0.1), ("right", 0.8), ("up", 0.1)]);
        assert_eq!(result.top_label(), Some("right"));
    }

    #[test]
    fn test_top_label_tie_breaks_first_seen() {
        // b and c tie at the max; the earlier entry wins.
        let result = classification(&[("a", 0.2), ("b", 0.9), ("c", 0.9)]);
        assert_eq!(result.top_label(), Some("b"));
    }

    #[test]
    fn test_top_label_all_tied() {
        let result = classification(&[("x", 0.5), ("y", 0.5), ("z", 0.5)]);
        assert_eq!(result.top_label(), Some("x"));
    }

    #[test]
    fn test_top_label_empty() {
        let result = Classification::new(Vec::new());
        assert_eq!(result.top_label(), None);
    }
}
