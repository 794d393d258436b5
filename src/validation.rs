//! Input validation for gold amounts and character nicknames.
//!
//! Validation outcomes are tagged enums rather than errors: malformed input is
//! an expected state while the user is still typing, so every function here is
//! total over arbitrary string input and never returns `Err` or panics.

/// Inclusive magnitude bound for gold amounts.
pub const AMOUNT_LIMIT: i64 = 10_000_000_000;

/// Maximum nickname length in characters (not bytes).
pub const NICKNAME_MAX_CHARS: usize = 12;

/// Outcome of validating a gold amount entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountValidation {
    /// Input was empty, whitespace, or a lone `-` (user mid-entry).
    Empty,
    /// A well-formed amount within `[-AMOUNT_LIMIT, AMOUNT_LIMIT]`.
    Valid(i64),
    /// Nothing numeric survived stripping.
    NotANumber,
    /// Parsed fine but the magnitude is outside the allowed range.
    /// Carries the parsed value so callers can show it back to the user.
    ExceedsLimit(i64),
}

/// Outcome of validating a character nickname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NicknameValidation {
    /// Input was empty after trimming.
    Empty,
    /// Trimmed nickname, at most [`NICKNAME_MAX_CHARS`] characters of
    /// Latin letters, digits, or Hangul syllables.
    Valid(String),
    /// Too long. Carries the actual character count, not a clamp.
    ExceedsLimit(usize),
    /// Contains a character outside the allowed classes.
    Invalid,
}

/// Validate a user-entered gold amount.
///
/// Commas and any other separator characters are stripped before parsing, so
/// `"1,000"` validates to `1000`. Multiple `-` signs collapse into a single
/// leading sign. The magnitude bound is inclusive on both ends.
pub fn validate_amount(input: &str) -> AmountValidation {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return AmountValidation::Empty;
    }

    // Keep digits only; any '-' anywhere marks the value negative.
    let negative = trimmed.contains('-');
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        // A lone '-' means the user is mid-entry, not that they typed garbage.
        return if negative && trimmed.chars().all(|c| c == '-') {
            AmountValidation::Empty
        } else {
            AmountValidation::NotANumber
        };
    }

    // Parse through i128 so absurdly long digit runs still report the
    // exceeds-limit state instead of a parse failure.
    let magnitude: i128 = match digits.parse() {
        Ok(v) => v,
        Err(_) => return AmountValidation::NotANumber,
    };
    let value = if negative { -magnitude } else { magnitude };

    if value.abs() > AMOUNT_LIMIT as i128 {
        let clamped = i64::try_from(value).unwrap_or(if negative { i64::MIN } else { i64::MAX });
        return AmountValidation::ExceedsLimit(clamped);
    }

    AmountValidation::Valid(value as i64)
}

/// Validate a character nickname for the lookup flow.
///
/// Length is checked before the character-class scan, so a too-long string
/// containing forbidden characters still reports `ExceedsLimit`.
pub fn validate_nickname(input: &str) -> NicknameValidation {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return NicknameValidation::Empty;
    }

    let char_count = trimmed.chars().count();
    if char_count > NICKNAME_MAX_CHARS {
        return NicknameValidation::ExceedsLimit(char_count);
    }

    if !trimmed.chars().all(is_nickname_char) {
        return NicknameValidation::Invalid;
    }

    NicknameValidation::Valid(trimmed.to_string())
}

/// Latin letters, digits, and Hangul syllables (가..힣) only.
fn is_nickname_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ('\u{AC00}'..='\u{D7A3}').contains(&ch)
}

/// Shared numeric parser for display strings carrying thousand separators.
///
/// Item levels and additional-gold fields are stored as display text
/// (`"1,540.5"`, `"4,500"`); strip the separators and parse before any
/// arithmetic comparison. Returns `None` when nothing numeric remains.
pub fn parse_separated_number(input: &str) -> Option<f64> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Parse a comma-formatted gold string, treating missing or malformed input
/// as zero. Fractional gold is truncated.
pub fn parse_gold(input: &str) -> i64 {
    parse_separated_number(input).map(|v| v as i64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_empty_states() {
        assert_eq!(validate_amount(""), AmountValidation::Empty);
        assert_eq!(validate_amount("   "), AmountValidation::Empty);
        assert_eq!(validate_amount("-"), AmountValidation::Empty);
        assert_eq!(validate_amount("--"), AmountValidation::Empty);
    }

    #[test]
    fn amount_accepts_separators() {
        assert_eq!(validate_amount("1,000"), AmountValidation::Valid(1000));
        assert_eq!(validate_amount("4,500,000"), AmountValidation::Valid(4_500_000));
        assert_eq!(validate_amount("-456"), AmountValidation::Valid(-456));
        assert_eq!(validate_amount("0"), AmountValidation::Valid(0));
    }

    #[test]
    fn amount_collapses_sign_runs() {
        assert_eq!(validate_amount("--5"), AmountValidation::Valid(-5));
        assert_eq!(validate_amount("-1,2-3"), AmountValidation::Valid(-123));
    }

    #[test]
    fn amount_rejects_garbage() {
        assert_eq!(validate_amount("abc"), AmountValidation::NotANumber);
        assert_eq!(validate_amount("!!"), AmountValidation::NotANumber);
    }

    #[test]
    fn amount_limit_is_inclusive() {
        assert_eq!(
            validate_amount("10,000,000,000"),
            AmountValidation::Valid(AMOUNT_LIMIT)
        );
        assert_eq!(
            validate_amount("-10000000000"),
            AmountValidation::Valid(-AMOUNT_LIMIT)
        );
        assert_eq!(
            validate_amount("99999999999"),
            AmountValidation::ExceedsLimit(99_999_999_999)
        );
        assert_eq!(
            validate_amount("10000000001"),
            AmountValidation::ExceedsLimit(10_000_000_001)
        );
    }

    #[test]
    fn amount_survives_absurd_digit_runs() {
        // Longer than i64 can hold; must still report the limit state.
        assert!(matches!(
            validate_amount("99999999999999999999999999"),
            AmountValidation::ExceedsLimit(_)
        ));
    }

    #[test]
    fn nickname_empty_and_valid() {
        assert_eq!(validate_nickname(""), NicknameValidation::Empty);
        assert_eq!(validate_nickname("  "), NicknameValidation::Empty);
        assert_eq!(
            validate_nickname("Arkanis7"),
            NicknameValidation::Valid("Arkanis7".to_string())
        );
        assert_eq!(
            validate_nickname("  Arkanis7  "),
            NicknameValidation::Valid("Arkanis7".to_string())
        );
    }

    #[test]
    fn nickname_accepts_hangul() {
        assert_eq!(
            validate_nickname("검은사막"),
            NicknameValidation::Valid("검은사막".to_string())
        );
        // Exactly 12 characters mixing all allowed classes.
        let twelve = "가나다라마바사Ab12Z";
        assert_eq!(twelve.chars().count(), 12);
        assert_eq!(
            validate_nickname(twelve),
            NicknameValidation::Valid(twelve.to_string())
        );
    }

    #[test]
    fn nickname_length_reported_before_charset() {
        // 14 chars with a forbidden '!' must report the length, not the charset.
        let long = "abcdefghijkl!?";
        assert_eq!(long.chars().count(), 14);
        assert_eq!(validate_nickname(long), NicknameValidation::ExceedsLimit(14));
    }

    #[test]
    fn nickname_rejects_forbidden_chars() {
        assert_eq!(validate_nickname("bad!name"), NicknameValidation::Invalid);
        assert_eq!(validate_nickname("with space"), NicknameValidation::Invalid);
        assert_eq!(validate_nickname("ひらがな"), NicknameValidation::Invalid);
    }

    #[test]
    fn separated_number_parsing() {
        assert_eq!(parse_separated_number("1,540.5"), Some(1540.5));
        assert_eq!(parse_separated_number("1540"), Some(1540.0));
        assert_eq!(parse_separated_number(""), None);
        assert_eq!(parse_separated_number("n/a"), None);
        assert_eq!(parse_gold("4,500"), 4500);
        assert_eq!(parse_gold(""), 0);
        assert_eq!(parse_gold("junk"), 0);
    }
}
