//! Span-list rewriting for ordered template regions
//!
//! Elements are disjoint, ascending byte spans of a text. Reordering walks the
//! requested names left to right and splices the current text of each named
//! element into the slot of the next original element. Slots are taken from
//! the original spans, so every splice is shifted by the accumulated length
//! delta of the splices before it.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

/// A named element of an ordered region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSpan {
    pub name: String,
    /// Byte span inside the region text
    pub span: Range<usize>,
}

impl NamedSpan {
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Repair a (possibly stale) requested order against the current element names.
///
/// Known names keep their requested relative order, unknown names are dropped
/// and names missing from the request are appended in their current order.
/// An empty request yields the current order.
pub fn repair_order(current: &[String], requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        return current.to_vec();
    }

    let current_set: HashSet<&str> = current.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut result: Vec<String> = requested
        .iter()
        .filter(|name| current_set.contains(name.as_str()) && seen.insert(name.as_str()))
        .cloned()
        .collect();

    result.extend(
        current
            .iter()
            .filter(|name| !seen.contains(name.as_str()))
            .cloned(),
    );
    result
}

/// Rewrite `text` so that its elements appear in `order`.
///
/// `elements` must be ascending and disjoint, `order` a permutation of their
/// names (use [`repair_order`] first). Text between elements is kept as is.
pub fn reorder_spans(text: &str, elements: &[NamedSpan], order: &[String]) -> String {
    let by_name: HashMap<&str, &Range<usize>> = elements
        .iter()
        .map(|element| (element.name.as_str(), &element.span))
        .collect();

    let mut result = text.to_string();
    let mut offset: isize = 0;

    for (slot, name) in elements.iter().zip(order) {
        let Some(source) = by_name.get(name.as_str()) else {
            continue;
        };
        let replacement = &text[(*source).clone()];

        let start = shift(slot.span.start, offset);
        let end = shift(slot.span.end, offset);
        result.replace_range(start..end, replacement);

        offset += replacement.len() as isize - slot.span.len() as isize;
    }

    result
}

fn shift(position: usize, offset: isize) -> usize {
    (position as isize + offset) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_repair_keeps_known_order_and_appends_missing() {
        let current = names(&["A", "B", "C", "D"]);
        let repaired = repair_order(&current, &names(&["C", "A"]));
        assert_eq!(repaired, names(&["C", "A", "B", "D"]));
    }

    #[test]
    fn test_repair_drops_unknown_names() {
        let current = names(&["A", "B"]);
        let repaired = repair_order(&current, &names(&["X", "B", "A", "Y"]));
        assert_eq!(repaired, names(&["B", "A"]));
    }

    #[test]
    fn test_repair_empty_request_uses_current() {
        let current = names(&["A", "B"]);
        assert_eq!(repair_order(&current, &[]), current);
    }

    #[test]
    fn test_repair_ignores_duplicates() {
        let current = names(&["A", "B", "C"]);
        let repaired = repair_order(&current, &names(&["B", "B", "A"]));
        assert_eq!(repaired, names(&["B", "A", "C"]));
    }

    #[test]
    fn test_reorder_with_unequal_lengths() {
        // "[aaaaaaaaaa]" is 12 bytes, "[b]" is 3 bytes
        let text = "x[aaaaaaaaaa]-[b]-[cc]y";
        let elements = vec![
            NamedSpan::new("a", 1..13),
            NamedSpan::new("b", 14..17),
            NamedSpan::new("c", 18..22),
        ];
        let result = reorder_spans(text, &elements, &names(&["b", "c", "a"]));
        assert_eq!(result, "x[b]-[cc]-[aaaaaaaaaa]y");
    }

    #[test]
    fn test_reorder_identity_is_noop() {
        let text = "<1>..<22>..<333>";
        let elements = vec![
            NamedSpan::new("1", 0..3),
            NamedSpan::new("2", 5..9),
            NamedSpan::new("3", 11..16),
        ];
        let result = reorder_spans(text, &elements, &names(&["1", "2", "3"]));
        assert_eq!(result, text);
    }
}
