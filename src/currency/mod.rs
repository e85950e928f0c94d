//! Locale-aware money formatting for summaries and text reports.
//!
//! Amounts reaching the engine are already normalized to a single currency, so
//! this module only renders numbers; it never converts them.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("INR")
    }
}

/// How the integer part of a number is grouped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DigitGrouping {
    /// 1,234,567
    Thousands,
    /// 12,34,567
    Indian,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub grouping: DigitGrouping,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::for_tag("en-IN")
    }
}

impl LocaleConfig {
    /// Known tags get their usual separators; anything else falls back to en-US rules.
    pub fn for_tag(tag: &str) -> Self {
        let (decimal_separator, grouping_separator, grouping) = match tag {
            "en-IN" | "hi-IN" => ('.', ',', DigitGrouping::Indian),
            "de-DE" | "es-ES" | "it-IT" | "pt-BR" => (',', '.', DigitGrouping::Thousands),
            "fr-FR" => (',', ' ', DigitGrouping::Thousands),
            _ => ('.', ',', DigitGrouping::Thousands),
        };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
            grouping,
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "INR" => "₹".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => format!("{code} "),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };
    let mut rendered = group_digits(int_part, locale.grouping_separator, locale.grouping);
    if let Some(frac) = frac_part {
        rendered.push(locale.decimal_separator);
        rendered.push_str(frac);
    }
    if value < 0.0 && rendered.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        rendered.insert(0, '-');
    }
    rendered
}

fn group_digits(digits: &str, separator: char, grouping: DigitGrouping) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        let boundary = match grouping {
            DigitGrouping::Thousands => count != 0 && count % 3 == 0,
            DigitGrouping::Indian => count == 3 || (count > 3 && (count - 3) % 2 == 0),
        };
        if boundary {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Renders amounts in a fixed currency and locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormatter {
    code: CurrencyCode,
    locale: LocaleConfig,
}

impl Default for MoneyFormatter {
    fn default() -> Self {
        Self::new(CurrencyCode::default(), LocaleConfig::default())
    }
}

impl MoneyFormatter {
    pub fn new(code: CurrencyCode, locale: LocaleConfig) -> Self {
        Self { code, locale }
    }

    pub fn code(&self) -> &CurrencyCode {
        &self.code
    }

    pub fn format(&self, amount: f64) -> String {
        let precision = minor_units_for(self.code.as_str());
        let body = format_number(&self.locale, amount.abs(), precision);
        let sign = if amount < 0.0 { "-" } else { "" };
        format!("{sign}{}{body}", symbol_for(self.code.as_str()))
    }

    /// Two-decimal percentage using the locale's decimal separator.
    pub fn format_percent(&self, value: f64) -> String {
        format!("{}%", format_number(&self.locale, value, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits_per_locale() {
        let us = LocaleConfig::for_tag("en-US");
        let india = LocaleConfig::for_tag("en-IN");
        let germany = LocaleConfig::for_tag("de-DE");
        assert_eq!(format_number(&us, 1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(&india, 1234567.891, 2), "12,34,567.89");
        assert_eq!(format_number(&india, 999.0, 2), "999.00");
        assert_eq!(format_number(&india, 1000.0, 0), "1,000");
        assert_eq!(format_number(&germany, 1234.5, 2), "1.234,50");
        assert_eq!(format_number(&us, -0.001, 2), "0.00");
        assert_eq!(format_number(&us, -12.0, 0), "-12");
    }

    #[test]
    fn formats_money_with_symbol_and_minor_units() {
        let rupees = MoneyFormatter::default();
        assert_eq!(rupees.format(150000.0), "₹1,50,000.00");

        let yen = MoneyFormatter::new(CurrencyCode::new("jpy"), LocaleConfig::for_tag("ja-JP"));
        assert_eq!(yen.format(1500.4), "¥1,500");

        let francs = MoneyFormatter::new(CurrencyCode::new("CHF"), LocaleConfig::for_tag("en-US"));
        assert_eq!(francs.format(12.0), "CHF 12.00");
        assert_eq!(francs.format_percent(33.333), "33.33%");
    }
}
