//! Update rules applied to the document when an entry is recorded.
//!
//! - [`regions`]: grows or creates a region for every part in the analysis
//! - [`habits`]: streak bookkeeping
//! - [`stats`]: growth score and day count
//!
//! Every rule mutates a [`Document`](crate::storage::Document) in place and never
//! touches storage; the store persists the result once all rules have run.

pub mod habits;
pub mod regions;
pub mod stats;

pub use habits::complete_habit;
pub use regions::apply_parts;
pub use stats::{positive_count, record_entry_stats, POSITIVE_PARTS};

/// Region id for a part label: lower-cased, each whitespace run replaced by one `-`.
///
/// Entries never store a reference to their regions, so every lookup recomputes the
/// id through this function.
pub fn region_id(label: &str) -> String {
    let lowered = label.to_lowercase();
    let mut id = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                id.push('-');
            }
            in_whitespace = true;
        } else {
            id.push(c);
            in_whitespace = false;
        }
    }
    id
}

/// Upper-case the first character, leave the rest as is.
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_id_examples() {
        assert_eq!(region_id("Inner Critic"), "inner-critic");
        assert_eq!(region_id("joy"), "joy");
        assert_eq!(region_id("Self   Compassion"), "self-compassion");
        assert_eq!(region_id("a\t b\nc"), "a-b-c");
    }

    #[test]
    fn test_region_id_keeps_edge_whitespace_as_hyphens() {
        assert_eq!(region_id(" Hope "), "-hope-");
    }

    #[test]
    fn test_region_id_lowercases_like_positive_part_matching() {
        // Word-final capital sigma lowercases to ς only with word context.
        assert_eq!(region_id("ΟΔΥΣΣΕΥΣ"), "οδυσσευς");
        assert_eq!(region_id("ΟΔΥΣΣΕΥΣ"), "ΟΔΥΣΣΕΥΣ".to_lowercase());
    }

    #[test]
    fn test_region_id_is_stable() {
        let once = region_id("Inner Critic");
        assert_eq!(region_id(&once), once);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("gratitude"), "Gratitude");
        assert_eq!(capitalize("inner critic"), "Inner critic");
        assert_eq!(capitalize("Hope"), "Hope");
        assert_eq!(capitalize(""), "");
    }
}
