//! String helpers shared by the directory models: slug derivation and the
//! normalized edit distance used by autocomplete.

/// Derive a URL-safe slug from a display name. Lowercases, maps every run of
/// non-alphanumeric characters to a single hyphen, and trims hyphens at both
/// ends. Recomputed on every save, so renames always refresh the slug.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Levenshtein distance divided by the longer string's length, in [0, 1].
/// Two empty strings are identical (0.0).
pub fn normalized_levenshtein(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }

    levenshtein(&a, &b) as f64 / longest as f64
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single-row DP over the shorter dimension.
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.iter().enumerate() {
        let mut previous_diagonal = row[0];
        row[0] = i + 1;

        for (j, cb) in b.iter().enumerate() {
            let substitution = if ca == cb {
                previous_diagonal
            } else {
                previous_diagonal + 1
            };
            previous_diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }

    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Gracia Afrika"), "gracia-afrika");
        assert_eq!(slugify("restaurant2"), "restaurant2");
        assert_eq!(slugify("  Chez   Léo!  "), "chez-léo");
    }

    #[test]
    fn slugify_is_idempotent() {
        let once = slugify("Café -- du Coin");
        assert_eq!(slugify(&once), once);
    }

    #[test]
    fn levenshtein_basic_distances() {
        let a: Vec<char> = "kitten".chars().collect();
        let b: Vec<char> = "sitting".chars().collect();
        assert_eq!(levenshtein(&a, &b), 3);
        assert_eq!(levenshtein(&a, &a), 0);
        assert_eq!(levenshtein(&[], &b), 7);
    }

    #[test]
    fn normalized_distance_is_in_unit_interval() {
        assert_eq!(normalized_levenshtein("", ""), 0.0);
        assert_eq!(normalized_levenshtein("abc", "abc"), 0.0);
        assert_eq!(normalized_levenshtein("abc", ""), 1.0);

        let d = normalized_levenshtein("re", "restaurant2");
        assert!(d > 0.35, "distant names must stay above the threshold: {d}");
    }
}
