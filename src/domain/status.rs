use axum::http::StatusCode;
use std::fmt;

/// Status as attached to an error by whoever raised it, before parsing.
///
/// Handlers may set a numeric code or a textual one (for example a status
/// read back from a header or an upstream payload). Parsing happens once,
/// in the terminal handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawStatus {
    Code(u16),
    Text(String),
}

impl RawStatus {
    /// Parse the leading base-10 integer, skipping leading whitespace and
    /// accepting an optional sign. Trailing garbage is ignored.
    pub fn leading_integer(&self) -> Option<i64> {
        match self {
            RawStatus::Code(code) => Some(i64::from(*code)),
            RawStatus::Text(text) => parse_leading_integer(text),
        }
    }

    /// Resolve into an HTTP status.
    ///
    /// Returns `None` when nothing parses, the value is zero, or the value
    /// is not a valid HTTP status code.
    pub fn to_status_code(&self) -> Option<StatusCode> {
        let value = self.leading_integer().filter(|v| *v != 0)?;
        let value = u16::try_from(value).ok()?;
        StatusCode::from_u16(value).ok()
    }
}

impl From<u16> for RawStatus {
    fn from(code: u16) -> Self {
        RawStatus::Code(code)
    }
}

impl From<StatusCode> for RawStatus {
    fn from(status: StatusCode) -> Self {
        RawStatus::Code(status.as_u16())
    }
}

impl From<&str> for RawStatus {
    fn from(text: &str) -> Self {
        RawStatus::Text(text.to_string())
    }
}

impl From<String> for RawStatus {
    fn from(text: String) -> Self {
        RawStatus::Text(text)
    }
}

impl fmt::Display for RawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawStatus::Code(code) => write!(f, "{}", code),
            RawStatus::Text(text) => f.write_str(text),
        }
    }
}

fn parse_leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    // Saturate on overflow; anything that large is rejected downstream anyway
    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_status() {
        assert_eq!(
            RawStatus::Code(404).to_status_code(),
            Some(StatusCode::NOT_FOUND)
        );
    }

    #[test]
    fn test_text_status_parses_leading_digits() {
        let parsed = |text: &str| RawStatus::from(text).to_status_code();

        assert_eq!(parsed("404"), Some(StatusCode::NOT_FOUND));
        assert_eq!(parsed("  503"), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(parsed("422abc"), Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(RawStatus::from("+400").leading_integer(), Some(400));
    }

    #[test]
    fn test_invalid_statuses_resolve_to_none() {
        assert_eq!(RawStatus::from("abc").to_status_code(), None);
        assert_eq!(RawStatus::from("").to_status_code(), None);
        assert_eq!(RawStatus::from("0").to_status_code(), None);
        assert_eq!(RawStatus::from("-404").to_status_code(), None);
        assert_eq!(RawStatus::from("42").to_status_code(), None);
        assert_eq!(RawStatus::Code(0).to_status_code(), None);
        assert_eq!(RawStatus::from("99999999999999999999").to_status_code(), None);
    }
}
