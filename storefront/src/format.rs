//! Indonesian display formatting for money and dates.

use crate::types::Money;
use chrono::{Datelike, NaiveDate, Weekday};

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Formats an amount as Rupiah with dot grouping and no fraction digits.
///
/// ```
/// use loket_storefront::{format::format_currency, types::Money};
///
/// assert_eq!(format_currency(Money::from_rupiah(1_050_000)), "Rp 1.050.000");
/// ```
#[must_use]
pub fn format_currency(amount: Money) -> String {
    let digits = amount.rupiah().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("Rp {grouped}")
}

/// Formats a date as a long Indonesian date: `Rabu, 1 Januari 2025`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {} {}",
        weekday_name(date.weekday()),
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_grouping() {
        assert_eq!(format_currency(Money::ZERO), "Rp 0");
        assert_eq!(format_currency(Money::from_rupiah(950)), "Rp 950");
        assert_eq!(format_currency(Money::from_rupiah(1_000)), "Rp 1.000");
        assert_eq!(format_currency(Money::from_rupiah(50_000)), "Rp 50.000");
        assert_eq!(format_currency(Money::from_rupiah(1_050_000)), "Rp 1.050.000");
        assert_eq!(format_currency(Money::from_rupiah(123_456_789)), "Rp 123.456.789");
    }

    #[test]
    fn test_money_display_uses_rupiah_format() {
        assert_eq!(Money::from_rupiah(750_000).to_string(), "Rp 750.000");
    }

    #[test]
    fn test_long_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(format_date(date), "Rabu, 1 Januari 2025");

        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(format_date(date), "Sabtu, 17 Oktober 2026");

        let date = NaiveDate::from_ymd_opt(2025, 8, 17).unwrap();
        assert_eq!(format_date(date), "Minggu, 17 Agustus 2025");
    }
}
