//! Nearest-word suggestion for misspelled group names

use crate::vocabulary::AllowedVocabulary;

/// Levenshtein edit distance over characters
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// The vocabulary word closest to `word`.
///
/// Ties go to the word listed first. Returns `word` unchanged when the
/// vocabulary is empty.
pub fn closest<'a>(word: &'a str, vocabulary: &'a AllowedVocabulary) -> &'a str {
    vocabulary
        .iter()
        .enumerate()
        .min_by_key(|(index, candidate)| (edit_distance(word, candidate), *index))
        .map(|(_, candidate)| candidate)
        .unwrap_or(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("Fas", "Fast"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("Slow", ""), 4);
        assert_eq!(edit_distance("ünï", "uni"), 2);
    }

    #[test]
    fn test_closest() {
        let vocab = AllowedVocabulary::new(["Fast", "Slow"]);
        assert_eq!(closest("Fas", &vocab), "Fast");
        assert_eq!(closest("Slo", &vocab), "Slow");
        assert_eq!(closest("Fast", &vocab), "Fast");
    }

    #[test]
    fn test_closest_prefers_first_on_tie() {
        let vocab = AllowedVocabulary::new(["Bat", "Cat"]);
        assert_eq!(closest("Rat", &vocab), "Bat");
    }

    #[test]
    fn test_closest_in_empty_vocabulary() {
        let vocab = AllowedVocabulary::empty();
        assert_eq!(closest("Any", &vocab), "Any");
    }
}
