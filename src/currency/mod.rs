//! Money and date presentation: currency codes, locale-aware number
//! grouping, and the date styles the listings use.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Uppercased ISO 4217 code, e.g. `USD`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display sign, falling back to the code itself for currencies
    /// without a common one.
    pub fn symbol(&self) -> String {
        let sign = match self.0.as_str() {
            "USD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            "JPY" => "¥",
            "AUD" => "A$",
            "CAD" => "C$",
            "CHF" => "Fr",
            _ => return self.0.clone(),
        };
        sign.to_string()
    }

    /// Decimal places the currency is quoted in. Most use two; yen and won
    /// have none, a few dinars use three.
    pub fn minor_units(&self) -> u8 {
        match self.0.as_str() {
            "JPY" | "KRW" => 0,
            "BHD" | "KWD" | "OMR" => 3,
            _ => 2,
        }
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

/// Number and date rendering preferences, persisted as part of the global
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub date_format: DateFormatStyle,
}

impl LocaleConfig {
    fn with(tag: &str, decimal: char, grouping: char, dates: DateFormatStyle) -> Self {
        Self {
            language_tag: tag.into(),
            decimal_separator: decimal,
            grouping_separator: grouping,
            date_format: dates,
        }
    }

    /// Built-in presets, keyed by BCP 47 tag. Tags outside this set are
    /// not recognized.
    pub fn preset(tag: &str) -> Option<Self> {
        match tag {
            "en-US" => Some(Self::with(tag, '.', ',', DateFormatStyle::Medium)),
            "en-GB" => Some(Self::with(tag, '.', ',', DateFormatStyle::Long)),
            "fr-FR" => Some(Self::with(tag, ',', ' ', DateFormatStyle::Long)),
            "de-DE" => Some(Self::with(tag, ',', '.', DateFormatStyle::Medium)),
            _ => None,
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::with("en-US", '.', ',', DateFormatStyle::Medium)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateFormatStyle {
    Short,
    Medium,
    Long,
}

impl DateFormatStyle {
    fn pattern(self) -> &'static str {
        match self {
            DateFormatStyle::Short => "%Y-%m-%d",
            DateFormatStyle::Medium => "%d %b %Y",
            DateFormatStyle::Long => "%a %d %b %Y",
        }
    }
}

/// `1234.5` → `1,234.50` under the default locale.
pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let rendered = format!("{value:.prec$}", prec = precision as usize);
    match rendered.split_once('.') {
        Some((whole, frac)) => {
            let mut out = group_digits(whole, locale.grouping_separator);
            out.push(locale.decimal_separator);
            out.push_str(frac);
            out
        }
        None => group_digits(&rendered, locale.grouping_separator),
    }
}

/// Symbol-prefixed amount with the currency's minor units, sign first:
/// `-$1,234.56`.
pub fn format_amount(amount: f64, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let body = format_number(locale, amount.abs(), code.minor_units());
    format!("{sign}{}{body}", code.symbol())
}

pub fn format_date(locale: &LocaleConfig, date: NaiveDate) -> String {
    date.format(locale.date_format.pattern()).to_string()
}

fn group_digits(whole: &str, separator: char) -> String {
    let (sign, digits) = whole
        .strip_prefix('-')
        .map_or(("", whole), |rest| ("-", rest));
    let mut out = String::from(sign);
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (digits.len() - idx) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
