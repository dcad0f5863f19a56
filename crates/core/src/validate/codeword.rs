use mt_narrative_formats::{CodewordClass, CodewordRule};

/// Codeword rule of the free format: upper-case letters, any length.
pub const FREE_FORMAT_CODEWORD: CodewordRule = CodewordRule::unbounded(CodewordClass::Upper);

/// Whether `candidate` is a legal codeword under `rule`.
///
/// Surrounding whitespace is ignored. The remaining text must be non-empty,
/// no longer than `rule.max_len` characters, and made only of characters in
/// `rule.class`.
pub fn is_valid_codeword(candidate: &str, rule: &CodewordRule) -> bool {
    let codeword = candidate.trim();
    if codeword.is_empty() {
        return false;
    }
    if let Some(max) = rule.max_len
        && codeword.chars().count() > max
    {
        return false;
    }
    codeword.chars().all(|c| rule.class.accepts(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPPER_8: CodewordRule = CodewordRule::bounded(8, CodewordClass::Upper);
    const ALNUM_6: CodewordRule = CodewordRule::bounded(6, CodewordClass::UpperOrDigit);
    const DIGIT_2: CodewordRule = CodewordRule::bounded(2, CodewordClass::Digit);

    #[test]
    fn empty_and_blank_are_invalid() {
        assert!(!is_valid_codeword("", &UPPER_8));
        assert!(!is_valid_codeword("   ", &FREE_FORMAT_CODEWORD));
    }

    #[test]
    fn length_limit_counts_characters() {
        assert!(is_valid_codeword("ABCDEFGH", &UPPER_8));
        assert!(!is_valid_codeword("ABCDEFGHI", &UPPER_8));
        assert!(is_valid_codeword("ABCDEFGHIJKLMNOP", &FREE_FORMAT_CODEWORD));
        assert!(is_valid_codeword("ÄÖÜ", &CodewordRule::bounded(3, CodewordClass::Upper)));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(is_valid_codeword(" DEAL ", &UPPER_8));
        assert!(!is_valid_codeword("DE AL", &UPPER_8));
    }

    #[test]
    fn upper_class() {
        assert!(is_valid_codeword("ACC", &UPPER_8));
        assert!(!is_valid_codeword("Acc", &UPPER_8));
        assert!(!is_valid_codeword("ACC1", &UPPER_8));
    }

    #[test]
    fn upper_or_digit_class() {
        assert!(is_valid_codeword("REC2", &ALNUM_6));
        assert!(is_valid_codeword("123456", &ALNUM_6));
        assert!(!is_valid_codeword("rec", &ALNUM_6));
        assert!(!is_valid_codeword("RE-C", &ALNUM_6));
        assert!(!is_valid_codeword("ABCDEFG", &ALNUM_6));
    }

    #[test]
    fn digit_class() {
        assert!(is_valid_codeword("20", &DIGIT_2));
        assert!(is_valid_codeword("7", &DIGIT_2));
        assert!(!is_valid_codeword("123", &DIGIT_2));
        assert!(!is_valid_codeword("2A", &DIGIT_2));
    }
}
