//! Weekday-name lookup for the `repeat_day` column.
//!
//! Legacy rows spell weekdays in Portuguese or English, full or abbreviated,
//! with or without accents, sometimes with the `-feira` suffix and sometimes
//! as a bare index. All of them resolve through one pure lookup over the
//! normalized string.

/// ## Summary
/// Resolves a weekday name to its index, 0 = Sunday .. 6 = Saturday.
///
/// Matching is case-insensitive, accent-insensitive, and ignores a trailing
/// `-feira` (so `Quarta-Feira`, `quarta` and `wed` all resolve to 3).
/// Returns `None` for anything not in the table.
#[must_use]
pub fn weekday_index(name: &str) -> Option<u8> {
    match normalize(name).as_str() {
        "domingo" | "dom" | "sunday" | "sun" | "0" => Some(0),
        "segunda" | "seg" | "monday" | "mon" | "1" => Some(1),
        "terca" | "ter" | "tuesday" | "tue" | "tues" | "2" => Some(2),
        "quarta" | "qua" | "wednesday" | "wed" | "3" => Some(3),
        "quinta" | "qui" | "thursday" | "thu" | "thur" | "thurs" | "4" => Some(4),
        "sexta" | "sex" | "friday" | "fri" | "5" => Some(5),
        "sabado" | "sab" | "saturday" | "sat" | "6" => Some(6),
        _ => None,
    }
}

/// Lowercases, strips the accents that occur in Portuguese weekday names,
/// and drops a trailing `-feira` / ` feira`.
fn normalize(name: &str) -> String {
    let lowered: String = name
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(strip_accent)
        .collect();

    lowered
        .strip_suffix("-feira")
        .or_else(|| lowered.strip_suffix(" feira"))
        .unwrap_or(&lowered)
        .to_string()
}

const fn strip_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portuguese_full_names() {
        assert_eq!(weekday_index("domingo"), Some(0));
        assert_eq!(weekday_index("segunda"), Some(1));
        assert_eq!(weekday_index("terça"), Some(2));
        assert_eq!(weekday_index("quarta"), Some(3));
        assert_eq!(weekday_index("quinta"), Some(4));
        assert_eq!(weekday_index("sexta"), Some(5));
        assert_eq!(weekday_index("sábado"), Some(6));
    }

    #[test]
    fn test_feira_suffix_is_stripped() {
        assert_eq!(weekday_index("quarta-feira"), Some(3));
        assert_eq!(weekday_index("Segunda-Feira"), Some(1));
        assert_eq!(weekday_index("sexta feira"), Some(5));
    }

    #[test]
    fn test_english_names_and_abbreviations() {
        assert_eq!(weekday_index("Sunday"), Some(0));
        assert_eq!(weekday_index("mon"), Some(1));
        assert_eq!(weekday_index("tue"), Some(2));
        assert_eq!(weekday_index("wed"), Some(3));
        assert_eq!(weekday_index("thurs"), Some(4));
        assert_eq!(weekday_index("FRI"), Some(5));
        assert_eq!(weekday_index("saturday"), Some(6));
    }

    #[test]
    fn test_accents_are_ignored() {
        assert_eq!(weekday_index("terca"), weekday_index("terça"));
        assert_eq!(weekday_index("sabado"), weekday_index("sábado"));
    }

    #[test]
    fn test_numeric_indexes() {
        assert_eq!(weekday_index("0"), Some(0));
        assert_eq!(weekday_index("6"), Some(6));
        assert_eq!(weekday_index("7"), None);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(weekday_index("  quinta  "), Some(4));
    }

    #[test]
    fn test_unknown_names_resolve_to_none() {
        assert_eq!(weekday_index("someday"), None);
        assert_eq!(weekday_index(""), None);
        assert_eq!(weekday_index("feira"), None);
    }
}
