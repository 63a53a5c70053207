//! Near-miss suggestions for profile ids and the document `kind`.
//!
//! The loader offers the closest known id when `compiled()` is asked for an
//! unknown profile; validation does the same for a misspelt `kind`.

/// Closest candidate by case-insensitive edit distance.
///
/// Ties keep the earlier candidate. Nothing is suggested once the distance
/// exceeds half the length of the longer of the two strings.
pub(crate) fn fuzzy_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let wanted = input.to_lowercase();
    let (best, distance) = candidates
        .iter()
        .map(|&candidate| (candidate, levenshtein(&wanted, &candidate.to_lowercase())))
        .min_by_key(|&(_, distance)| distance)?;

    let longest = wanted.chars().count().max(best.chars().count());
    (distance <= longest / 2).then_some(best)
}

/// Single-row edit distance over chars.
fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitute = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[b.len()]
}

/// Profile ids are lowercase alphanumeric words joined by single hyphens.
pub(crate) fn is_kebab_case(id: &str) -> bool {
    id.split('-').all(|word| {
        !word.is_empty()
            && word
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_IDS: &[&str] = &["standard", "sensitive", "bursty", "nightly-batch"];

    #[test]
    fn edit_distance() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
        assert_eq!(levenshtein("bursty", "busrty"), 2);
    }

    #[test]
    fn suggests_close_profile_ids() {
        assert_eq!(fuzzy_match("standrd", PROFILE_IDS), Some("standard"));
        assert_eq!(fuzzy_match("Bursty", PROFILE_IDS), Some("bursty"));
        assert_eq!(fuzzy_match("nightly_batch", PROFILE_IDS), Some("nightly-batch"));
        assert_eq!(fuzzy_match("ThresholdConfg", &["ThresholdConfig"]), Some("ThresholdConfig"));
    }

    #[test]
    fn rejects_distant_input() {
        assert_eq!(fuzzy_match("zzzzzzzzzzzzz", PROFILE_IDS), None);
        assert_eq!(fuzzy_match("standard", &[]), None);
    }

    #[test]
    fn tie_keeps_earlier_candidate() {
        assert_eq!(fuzzy_match("cat", &["bat", "hat"]), Some("bat"));
        assert_eq!(fuzzy_match("cat", &["hat", "bat"]), Some("hat"));
    }

    #[test]
    fn kebab_case_ids() {
        assert!(is_kebab_case("nightly-batch"));
        assert!(is_kebab_case("v2"));
        assert!(!is_kebab_case("Nightly"));
        assert!(!is_kebab_case("-lead"));
        assert!(!is_kebab_case("trail-"));
        assert!(!is_kebab_case("double--hyphen"));
        assert!(!is_kebab_case("snake_case"));
        assert!(!is_kebab_case(""));
    }
}
