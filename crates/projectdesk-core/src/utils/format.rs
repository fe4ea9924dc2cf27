/// Format a monetary amount in the pt-BR convention: `R$ 1.234.567,89`
pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, fraction)
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a server timestamp as `dd/MM/yyyy HH:mm`.
///
/// Accepts RFC 3339 and the offset-less `YYYY-MM-DDTHH:MM:SS[.fff]` form the
/// API usually sends. Anything else is returned unchanged.
pub fn format_timestamp(value: &str) -> String {
    const DISPLAY: &str = "%d/%m/%Y %H:%M";

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return dt.format(DISPLAY).to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DISPLAY).to_string();
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return super::date::format_display_date(d);
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "R$ 0,00");
        assert_eq!(format_money(1500.5), "R$ 1.500,50");
        assert_eq!(format_money(1234567.891), "R$ 1.234.567,89");
        assert_eq!(format_money(999.999), "R$ 1.000,00");
        assert_eq!(format_money(-42.1), "-R$ 42,10");
        assert_eq!(format_money(f64::NAN), "-");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Construção", 10), "Construção");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2024-03-01T10:05:00"), "01/03/2024 10:05");
        assert_eq!(format_timestamp("2024-03-01T10:05:00.123456"), "01/03/2024 10:05");
        assert_eq!(format_timestamp("2024-03-01T10:05:00Z"), "01/03/2024 10:05");
        assert_eq!(format_timestamp("2024-03-01"), "01/03/2024");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
