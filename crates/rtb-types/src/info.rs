/// Maximum number of characters kept from a participant's annotation.
pub const INFO_MAX_CHARS: usize = 32;

/// Full-width comma used in place of `,` so the text never splits a record.
const COMMA_SUBSTITUTE: char = '\u{FF0C}';

/// Normalize free-text annotation into a bounded, delimiter-safe form.
///
/// The text is cut to [`INFO_MAX_CHARS`] characters first, then every `,` is
/// replaced by a full-width comma and every `\r` / `\n` is removed. Length is
/// counted in Unicode scalar values, never bytes, so multi-byte text is never
/// split mid-character.
pub fn sanitize_info(raw: &str) -> String {
    raw.chars()
        .take(INFO_MAX_CHARS)
        .filter(|c| !matches!(c, '\r' | '\n'))
        .map(|c| if c == ',' { COMMA_SUBSTITUTE } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn replaces_commas_and_strips_line_breaks() {
        assert_eq!(sanitize_info("a,b\r\nc"), "a\u{FF0C}bc");
    }

    #[test]
    fn truncates_long_text() {
        let raw = format!("a,b\nc{}", "x".repeat(40));
        let clean = sanitize_info(&raw);
        assert!(clean.chars().count() <= INFO_MAX_CHARS);
        assert!(!clean.contains(','));
        assert!(!clean.contains('\n'));
        assert!(!clean.contains('\r'));
        assert!(clean.starts_with("a\u{FF0C}bc"));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let raw = "微".repeat(40);
        let clean = sanitize_info(&raw);
        assert_eq!(clean.chars().count(), INFO_MAX_CHARS);
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(sanitize_info(""), "");
    }

    proptest! {
        #[test]
        fn output_is_always_bounded_and_delimiter_free(raw in ".*") {
            let clean = sanitize_info(&raw);
            prop_assert!(clean.chars().count() <= INFO_MAX_CHARS);
            prop_assert!(!clean.contains(','));
            prop_assert!(!clean.contains('\n'));
            prop_assert!(!clean.contains('\r'));
        }

        #[test]
        fn sanitizing_twice_changes_nothing(raw in ".*") {
            let once = sanitize_info(&raw);
            prop_assert_eq!(sanitize_info(&once), once);
        }
    }
}
