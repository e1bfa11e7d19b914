//! Number formatting for alert and digest text.

/// Format a price with two decimals and thousands separators, e.g. `1,234.50`.
pub fn format_price(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let chars: Vec<char> = int_part.chars().collect();
    let mut result = String::with_capacity(fixed.len() + chars.len() / 3 + 1);
    if value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        result.push('-');
    }
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.push('.');
    result.push_str(frac_part);

    result
}
