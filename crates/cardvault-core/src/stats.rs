//! Card statistics and categories

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::record::{parse_expiry, CardRecord};
use crate::EXPIRY_WARNING_MONTHS;

/// Bank name used for cards without one
pub const UNKNOWN_BANK: &str = "Other";

/// Aggregate view over a user's cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VaultStats {
    pub total: usize,
    /// Card numbers starting with 4
    pub credit_like: usize,
    /// Card numbers starting with 5
    pub debit_like: usize,
    pub other: usize,
    /// Cards expiring within the warning window of the reference date
    pub expiring_soon: usize,
    /// Cards per bank
    pub by_bank: BTreeMap<String, usize>,
}

impl VaultStats {
    /// Compute statistics relative to `as_of`
    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a CardRecord>, as_of: NaiveDate) -> Self {
        let mut stats = Self::default();
        let current_month = as_of.month() as i32;
        let current_year = (as_of.year() % 100) as i32;

        for card in cards {
            stats.total += 1;

            match card.secrets.card_number.as_bytes().first() {
                Some(b'4') => stats.credit_like += 1,
                Some(b'5') => stats.debit_like += 1,
                _ => stats.other += 1,
            }

            if let Ok((month, year)) = parse_expiry(&card.secrets.expiry) {
                let months_diff =
                    (year as i32 - current_year) * 12 + (month as i32 - current_month);
                if (0..=EXPIRY_WARNING_MONTHS).contains(&months_diff) {
                    stats.expiring_soon += 1;
                }
            }

            let bank = card
                .meta
                .bank_name
                .as_deref()
                .filter(|b| !b.trim().is_empty())
                .unwrap_or(UNKNOWN_BANK);
            *stats.by_bank.entry(bank.to_string()).or_insert(0) += 1;
        }

        stats
    }

    /// Share of `count` in the total, rounded to whole percent
    pub fn percentage(&self, count: usize) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((count as f64 / self.total as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CardMeta, CardSecrets};
    use crate::types::Pin;

    fn card(number: &str, expiry: &str, bank: Option<&str>) -> CardRecord {
        CardRecord::new(
            CardMeta {
                card_name: "c".to_string(),
                bank_name: bank.map(str::to_string),
                card_holder_name: None,
                card_type: Default::default(),
                issuer: Default::default(),
            },
            CardSecrets {
                card_number: number.to_string(),
                expiry: expiry.to_string(),
                cvv: String::new(),
                pin: Pin::new("1111").unwrap(),
                atm_pin: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_categories_and_banks() {
        let cards = vec![
            card("4111111111111111", "0130", Some("First")),
            card("5111111111111111", "0130", Some("First")),
            card("3711111111111111", "0130", None),
        ];
        let as_of = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let stats = VaultStats::from_cards(&cards, as_of);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.credit_like, 1);
        assert_eq!(stats.debit_like, 1);
        assert_eq!(stats.other, 1);
        assert_eq!(stats.by_bank.get("First"), Some(&2));
        assert_eq!(stats.by_bank.get(UNKNOWN_BANK), Some(&1));
        assert_eq!(stats.percentage(stats.credit_like), 33);
    }

    #[test]
    fn test_expiring_soon_window() {
        let as_of = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let cards = vec![
            card("4111111111111111", "1026", None), // this month
            card("4111111111111111", "0127", None), // 3 months out
            card("4111111111111111", "0227", None), // 4 months out
            card("4111111111111111", "0926", None), // already expired
        ];
        let stats = VaultStats::from_cards(&cards, as_of);
        assert_eq!(stats.expiring_soon, 2);
    }

    #[test]
    fn test_empty() {
        let as_of = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let stats = VaultStats::from_cards(std::iter::empty(), as_of);
        assert_eq!(stats, VaultStats::default());
        assert_eq!(stats.percentage(0), 0);
    }
}
