use project_lottery::VoteValue;

/// Interprets the text of a cell or a scalar.
///
/// Returns None for an empty content, which is a missing vote.
pub fn parse_vote_text(s: &str) -> Option<VoteValue> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    if let Ok(c) = t.parse::<i128>() {
        return Some(VoteValue::Count(c));
    }
    match t.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(VoteValue::Fractional(f)),
        _ => Some(VoteValue::Other(t.to_string())),
    }
}

/// Spreadsheets store all the numbers as floating point values.
pub fn vote_from_float(f: f64) -> VoteValue {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        VoteValue::Count(f as i128)
    } else {
        VoteValue::Fractional(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_text() {
        assert_eq!(parse_vote_text(" 12 "), Some(VoteValue::Count(12)));
        assert_eq!(parse_vote_text("-3"), Some(VoteValue::Count(-3)));
        assert_eq!(parse_vote_text("2.5"), Some(VoteValue::Fractional(2.5)));
        assert_eq!(
            parse_vote_text("ten"),
            Some(VoteValue::Other("ten".to_string()))
        );
        assert_eq!(
            parse_vote_text("18446744073709551615"),
            Some(VoteValue::Count(i128::from(u64::MAX)))
        );
        assert_eq!(parse_vote_text("  "), None);
        assert_eq!(parse_vote_text("NaN"), Some(VoteValue::Other("NaN".to_string())));
    }

    #[test]
    fn float_cells() {
        assert_eq!(vote_from_float(4.0), VoteValue::Count(4));
        assert_eq!(vote_from_float(-1.0), VoteValue::Count(-1));
        assert_eq!(vote_from_float(0.5), VoteValue::Fractional(0.5));
    }
}
