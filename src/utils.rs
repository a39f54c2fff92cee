/// Derives a stable location id from a display name.
///
/// Lowercases, strips everything that is not ASCII alphanumeric or
/// whitespace, and joins the remaining words with underscores; the same
/// name always yields the same id, suitable for file names and report keys.
///
/// # Examples
///
/// ```
/// use gridclim::location_id_from_name;
///
/// assert_eq!(location_id_from_name("Frankfurt am Main"), "frankfurt_am_main");
/// assert_eq!(location_id_from_name("Halle (Saale)"), "halle_saale");
/// ```
pub fn location_id_from_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_words_with_underscores() {
        assert_eq!(location_id_from_name("Frankfurt am Main"), "frankfurt_am_main");
    }

    #[test]
    fn strips_punctuation() {
        assert_eq!(location_id_from_name("Halle (Saale)"), "halle_saale");
        assert_eq!(location_id_from_name("Garmisch-Partenkirchen"), "garmischpartenkirchen");
    }

    #[test]
    fn drops_non_ascii_letters() {
        assert_eq!(location_id_from_name("München"), "mnchen");
    }

    #[test]
    fn is_stable_across_calls() {
        let a = location_id_from_name("Bad Homburg v. d. Höhe");
        let b = location_id_from_name("Bad Homburg v. d. Höhe");
        assert_eq!(a, b);
    }
}
