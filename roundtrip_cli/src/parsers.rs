use jiff::{SignedDuration, Span, SpanRelativeTo};

/// Accepts `30s`, `2m`, ISO 8601 (`PT1M30S`) or a plain number of seconds.
pub fn parse_duration(input: &str) -> Result<SignedDuration, String> {
    let duration = input
        .parse::<SignedDuration>()
        .ok()
        .or_else(|| {
            input
                .parse::<Span>()
                .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
                .ok()
        })
        .or_else(|| input.parse::<i64>().ok().map(SignedDuration::from_secs))
        .ok_or_else(|| format!("Invalid duration '{input}', expected e.g. 30s, 2m or PT1M30S"))?;

    if duration.is_negative() {
        return Err(format!("Duration '{input}' is negative"));
    }

    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30s"), Ok(SignedDuration::from_secs(30)));
        assert_eq!(parse_duration("2m"), Ok(SignedDuration::from_mins(2)));
        assert_eq!(parse_duration("PT1M30S"), Ok(SignedDuration::from_secs(90)));
        assert_eq!(parse_duration("45"), Ok(SignedDuration::from_secs(45)));
        assert!(parse_duration("-5").is_err());
        assert!(parse_duration("soon").is_err());
    }
}
