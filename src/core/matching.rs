//! Approximate string matching used to accept or reject search hits.

/// Jaro similarity of two strings, in `[0.0, 1.0]`.
///
/// Characters match when equal and no further apart than
/// `floor(max(len1, len2) / 2) - 1`. Identical strings score exactly `1.0`,
/// strings without a single match score exactly `0.0`.
pub fn jaro_similarity(s1: &str, s2: &str) -> f64 {
    if s1 == s2 {
        return 1.0;
    }

    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let max_dist = (a.len().max(b.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ca) in a.iter().enumerate() {
        let start = i.saturating_sub(max_dist);
        let end = (i + max_dist + 1).min(b.len());
        for j in start..end {
            if !b_matched[j] && b[j] == *ca {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Half the number of matched characters that appear in a different order.
    let a_seq = a.iter().zip(&a_matched).filter(|(_, m)| **m).map(|(c, _)| c);
    let b_seq = b.iter().zip(&b_matched).filter(|(_, m)| **m).map(|(c, _)| c);
    let transpositions = a_seq.zip(b_seq).filter(|(x, y)| x != y).count() / 2;

    let m = matches as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - transpositions as f64) / m) / 3.0
}

/// Reduce a name to the lowercase alphanumeric form used in URL slugs.
pub fn slugify(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// True when `candidate` is close enough to `wanted`.
///
/// An empty `wanted` accepts anything.
pub fn is_close_match(wanted: &str, candidate: &str, threshold: f64) -> bool {
    if wanted.is_empty() {
        return true;
    }
    jaro_similarity(&slugify(wanted), &slugify(candidate)) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(jaro_similarity("queen", "queen"), 1.0);
        assert_eq!(jaro_similarity("", ""), 1.0);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(jaro_similarity("abc", "xyz"), 0.0);
        assert_eq!(jaro_similarity("abc", ""), 0.0);
    }

    #[test]
    fn test_known_values() {
        assert!(approx(jaro_similarity("MARTHA", "MARHTA"), 0.944));
        assert!(approx(jaro_similarity("DWAYNE", "DUANE"), 0.822));
        assert!(approx(jaro_similarity("DIXON", "DICKSONX"), 0.767));
        assert!(approx(jaro_similarity("adaceeed", "beb"), 0.486));
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ("MARTHA", "MARHTA"),
            ("DWAYNE", "DUANE"),
            ("bohemianrhapsody", "bohemian"),
            ("queen", "queensryche"),
            ("a", "ab"),
            ("adaceeed", "beb"),
        ];
        for (a, b) in pairs {
            assert_eq!(jaro_similarity(a, b), jaro_similarity(b, a), "{} / {}", a, b);
        }
    }

    #[test]
    fn test_single_characters_do_not_underflow_window() {
        assert_eq!(jaro_similarity("a", "b"), 0.0);
        assert!(jaro_similarity("ab", "ba") < 1.0);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Bohemian Rhapsody"), "bohemianrhapsody");
        assert_eq!(slugify("AC/DC"), "acdc");
    }

    #[test]
    fn test_is_close_match() {
        assert!(is_close_match("Queen", "queen", 0.6));
        assert!(is_close_match("", "anything", 0.6));
        assert!(!is_close_match("Metallica", "queen", 0.6));
    }
}
