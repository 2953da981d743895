// Phone number identity
//
// A phone number is a bearer credential: whoever knows the digits can back
// out a signup or delete an event they created. Every comparison goes through
// `normalize` so formatting ("(555) 010-2020" vs "555-010-2020") never matters.

/// Maximum number of digits accepted in any phone number.
pub const MAX_PHONE_DIGITS: usize = 10;

/// Strip everything but ASCII digits.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Number of digits in `raw`, ignoring formatting.
pub fn digit_count(raw: &str) -> usize {
    raw.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Whether `raw` has more digits than allowed.
pub fn exceeds_max_digits(raw: &str) -> bool {
    digit_count(raw) > MAX_PHONE_DIGITS
}

/// Whether two phone numbers are the same after normalization.
/// Two numbers without digits never match.
pub fn matches(a: &str, b: &str) -> bool {
    let a = normalize(a);
    !a.is_empty() && a == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(normalize("(555) 010-2020"), "5550102020");
        assert_eq!(normalize("555.010.2020"), "5550102020");
        assert_eq!(normalize(" +1 555 010 2020 "), "15550102020");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("call me"), "");
    }

    #[test]
    fn test_digit_limit() {
        assert!(!exceeds_max_digits("(555) 010-2020"));
        assert!(exceeds_max_digits("+1 (555) 010-2020"));
        assert!(!exceeds_max_digits(""));
    }

    #[test]
    fn test_matches_ignores_formatting() {
        assert!(matches("(555) 010-2020", "555-010-2020"));
        assert!(matches("5550102020", "555 010 2020"));
    }

    #[test]
    fn test_matches_is_exact() {
        // No substring matching: a prefix of the number is a different number
        assert!(!matches("010-2020", "(555) 010-2020"));
        assert!(!matches("(555) 010-2020", "(555) 010-2021"));
    }

    #[test]
    fn test_empty_numbers_never_match() {
        assert!(!matches("", ""));
        assert!(!matches("---", "()"));
    }
}
