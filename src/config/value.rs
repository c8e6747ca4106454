//! Conversion of raw configuration strings into typed values.

use std::path::PathBuf;
use std::time::Duration;

/// A type a raw configuration string can be read as.
pub trait ConfigValue: Sized {
    /// Name shown in error messages and INI templates.
    const TYPE_NAME: &'static str;

    /// Parses a raw value, returning the reason on failure.
    fn parse_raw(raw: &str) -> Result<Self, String>;

    /// Renders a value the way `parse_raw` reads it back.
    fn render(&self) -> String;
}

impl ConfigValue for String {
    const TYPE_NAME: &'static str = "str";

    fn parse_raw(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

const TRUE_WORDS: [&str; 4] = ["on", "yes", "true", "1"];
const FALSE_WORDS: [&str; 4] = ["off", "no", "false", "0"];

impl ConfigValue for bool {
    const TYPE_NAME: &'static str = "bool";

    /// Accepts `on`/`yes`/`true`/`1` and `off`/`no`/`false`/`0`, in any case.
    fn parse_raw(raw: &str) -> Result<Self, String> {
        let word = raw.trim();
        if TRUE_WORDS.iter().any(|w| word.eq_ignore_ascii_case(w)) {
            Ok(true)
        } else if FALSE_WORDS.iter().any(|w| word.eq_ignore_ascii_case(w)) {
            Ok(false)
        } else {
            Err("expected one of on/yes/true/1 or off/no/false/0".to_string())
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl ConfigValue for i64 {
    const TYPE_NAME: &'static str = "int";

    fn parse_raw(raw: &str) -> Result<Self, String> {
        raw.trim().parse().map_err(|e| format!("{e}"))
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl ConfigValue for f64 {
    const TYPE_NAME: &'static str = "float";

    fn parse_raw(raw: &str) -> Result<Self, String> {
        raw.trim().parse().map_err(|e| format!("{e}"))
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl ConfigValue for Vec<String> {
    const TYPE_NAME: &'static str = "list";

    /// Splits on `,`, trims every item and drops the empty ones.
    fn parse_raw(raw: &str) -> Result<Self, String> {
        Ok(raw
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn render(&self) -> String {
        self.join(", ")
    }
}

impl ConfigValue for Duration {
    const TYPE_NAME: &'static str = "timedelta";

    fn parse_raw(raw: &str) -> Result<Self, String> {
        parse_duration(raw)
    }

    fn render(&self) -> String {
        format_duration(*self)
    }
}

impl ConfigValue for PathBuf {
    const TYPE_NAME: &'static str = "path";

    fn parse_raw(raw: &str) -> Result<Self, String> {
        Ok(PathBuf::from(raw))
    }

    fn render(&self) -> String {
        self.display().to_string()
    }
}

/// An enumeration whose members can be selected by configuration.
///
/// A raw value matches a member by [`name`](Self::name) first, then by
/// [`value`](Self::value).
///
/// ```
/// use getconf::ConfigEnum;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Level {
///     Debug,
///     Info,
/// }
///
/// impl ConfigEnum for Level {
///     fn members() -> &'static [Self] {
///         &[Level::Debug, Level::Info]
///     }
///
///     fn name(&self) -> &str {
///         match self {
///             Level::Debug => "DEBUG",
///             Level::Info => "INFO",
///         }
///     }
/// }
///
/// assert_eq!(Level::from_raw("INFO"), Some(Level::Info));
/// assert_eq!(Level::from_raw("info"), None);
/// ```
pub trait ConfigEnum: Sized + Clone + PartialEq + 'static {
    /// Whether names and values are matched case-sensitively.
    const CASE_SENSITIVE: bool = true;

    /// Every member, in declaration order.
    fn members() -> &'static [Self];

    fn name(&self) -> &str;

    /// Alternative spelling accepted for this member.
    fn value(&self) -> Option<&str> {
        None
    }

    fn from_raw(raw: &str) -> Option<Self> {
        let matches = |candidate: &str| {
            if Self::CASE_SENSITIVE {
                candidate == raw
            } else {
                candidate.eq_ignore_ascii_case(raw)
            }
        };

        let members = Self::members();
        members
            .iter()
            .find(|m| matches(m.name()))
            .or_else(|| members.iter().find(|m| m.value().is_some_and(|v| matches(v))))
            .cloned()
    }
}

/// Parses durations such as `10d`, `3h`, `90s` or `1d 12h30m`.
///
/// Units are `d` (days), `h` (hours), `m` (minutes) and `s` (seconds).
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let literal = raw.trim();
    if literal.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total: u64 = 0;
    let mut digits = String::new();

    for ch in literal.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        if ch.is_whitespace() && digits.is_empty() {
            continue;
        }

        let unit = match ch {
            'd' => 86_400,
            'h' => 3_600,
            'm' => 60,
            's' => 1,
            _ => return Err(format!("unexpected character '{ch}' in duration")),
        };
        if digits.is_empty() {
            return Err(format!("missing number before unit '{ch}'"));
        }

        let amount: u64 = digits
            .parse()
            .map_err(|_| format!("number too large: {digits}"))?;
        total = amount
            .checked_mul(unit)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(|| "duration overflows".to_string())?;
        digits.clear();
    }

    if !digits.is_empty() {
        return Err(format!("missing unit after '{digits}' (use d, h, m or s)"));
    }

    Ok(Duration::from_secs(total))
}

/// Formats a duration in the compact form read by [`parse_duration`].
///
/// Sub-second precision is dropped.
pub fn format_duration(duration: Duration) -> String {
    let mut secs = duration.as_secs();
    if secs == 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    for (unit, size) in [('d', 86_400), ('h', 3_600), ('m', 60), ('s', 1)] {
        let amount = secs / size;
        if amount > 0 {
            out.push_str(&format!("{amount}{unit}"));
            secs %= size;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_words() {
        for raw in ["On", "YES", "true", "1"] {
            assert_eq!(bool::parse_raw(raw), Ok(true), "{raw}");
        }
        for raw in ["off", "No", "FALSE", "0"] {
            assert_eq!(bool::parse_raw(raw), Ok(false), "{raw}");
        }
        assert!(bool::parse_raw("maybe").is_err());
        assert!(bool::parse_raw("").is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(i64::parse_raw("14"), Ok(14));
        assert_eq!(i64::parse_raw(" -3 "), Ok(-3));
        assert!(i64::parse_raw("1.5").is_err());
        assert_eq!(f64::parse_raw("1.5"), Ok(1.5));
        assert!(f64::parse_raw("fast").is_err());
    }

    #[test]
    fn test_list_is_cleaned() {
        assert_eq!(
            Vec::<String>::parse_raw("foo,bar, baz,,"),
            Ok(vec!["foo".to_string(), "bar".to_string(), "baz".to_string()])
        );
        assert_eq!(Vec::<String>::parse_raw("  ,  ,,,,  "), Ok(vec![]));
        assert_eq!(Vec::<String>::parse_raw(""), Ok(vec![]));
    }

    #[test]
    fn test_list_rendering_reads_back() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(items.render(), "a, b");
        assert_eq!(Vec::<String>::parse_raw(&items.render()), Ok(items));
    }

    #[test]
    fn test_duration_literals() {
        assert_eq!(parse_duration("10d"), Ok(Duration::from_secs(10 * 86_400)));
        assert_eq!(parse_duration("3h"), Ok(Duration::from_secs(3 * 3_600)));
        assert_eq!(parse_duration("45m"), Ok(Duration::from_secs(45 * 60)));
        assert_eq!(parse_duration("90s"), Ok(Duration::from_secs(90)));
        assert_eq!(
            parse_duration("1d 2h30m"),
            Ok(Duration::from_secs(86_400 + 2 * 3_600 + 30 * 60))
        );
    }

    #[test]
    fn test_malformed_durations() {
        for raw in ["", "10", "h", "10x", "1 d", "-1d", "99999999999999999999d"] {
            assert!(parse_duration(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs(3 * 3_600)), "3h");
        assert_eq!(
            format_duration(Duration::from_secs(86_400 + 2 * 3_600 + 5)),
            "1d2h5s"
        );
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Color {
        Red,
        Green,
    }

    impl ConfigEnum for Color {
        fn members() -> &'static [Self] {
            &[Color::Red, Color::Green]
        }

        fn name(&self) -> &str {
            match self {
                Color::Red => "RED",
                Color::Green => "GREEN",
            }
        }

        fn value(&self) -> Option<&str> {
            match self {
                Color::Red => Some("r"),
                Color::Green => Some("g"),
            }
        }
    }

    #[test]
    fn test_enum_by_name_or_value() {
        assert_eq!(Color::from_raw("RED"), Some(Color::Red));
        assert_eq!(Color::from_raw("g"), Some(Color::Green));
        assert_eq!(Color::from_raw("red"), None);
        assert_eq!(Color::from_raw("BLUE"), None);
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Mode {
        Fast,
    }

    impl ConfigEnum for Mode {
        const CASE_SENSITIVE: bool = false;

        fn members() -> &'static [Self] {
            &[Mode::Fast]
        }

        fn name(&self) -> &str {
            "fast"
        }
    }

    #[test]
    fn test_enum_case_insensitive() {
        assert_eq!(Mode::from_raw("FAST"), Some(Mode::Fast));
    }
}
