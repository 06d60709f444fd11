use chrono::NaiveDate;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64, currency: &str) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// US-style presentation: `$1,234.50` and `Jan 05, 2025`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardFormatter;

impl CurrencyFormatter for StandardFormatter {
    fn format_amount(&self, amount: f64, currency: &str) -> String {
        let fixed = format!("{:.2}", amount.abs());
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
        match currency_symbol(currency) {
            Some(symbol) => format!("{sign}{symbol}{}.{fraction}", group_thousands(whole)),
            None => format!(
                "{sign}{} {}.{fraction}",
                currency.trim().to_ascii_uppercase(),
                group_thousands(whole)
            ),
        }
    }
}

impl DateFormatter for StandardFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%b %d, %Y").to_string()
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.trim().to_ascii_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
