//! Property-based tests for cardvault-core using proptest
//!
//! These tests verify invariants that should hold for all inputs.

use cardvault_core::{
    format::{format_card_number, mask_card_number},
    types::{is_pin_shaped, Pin},
    SealedRecord, SecuredRecord,
};
use cardvault_core::{CardMeta, CardRecord, CardSecrets};
use proptest::prelude::*;

proptest! {
    #[test]
    fn pin_accepts_exactly_four_ascii_digits(s in "\\PC{0,6}") {
        let expected = s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit());
        prop_assert_eq!(Pin::new(s.clone()).is_ok(), expected);
        prop_assert_eq!(is_pin_shaped(&s), expected);
    }

    #[test]
    fn pin_matches_only_itself(a in "[0-9]{4}", b in "[0-9]{4}") {
        let pin = Pin::new(a.clone()).unwrap();
        prop_assert_eq!(pin.matches(&b), a == b);
    }

    #[test]
    fn formatted_number_keeps_digits(number in "[0-9]{13,16}") {
        let formatted = format_card_number(&number);
        let digits: String = formatted.chars().filter(|c| c.is_ascii_digit()).collect();
        prop_assert_eq!(digits, number.clone());
        prop_assert!(formatted.split(' ').all(|group| group.len() <= 4));
    }

    #[test]
    fn masked_number_reveals_only_last_four(number in "[0-9]{13,16}") {
        let masked = mask_card_number(&number);
        let digits: String = masked.chars().filter(|c| c.is_ascii_digit()).collect();
        prop_assert_eq!(digits.as_str(), &number[number.len() - 4..]);
    }

    #[test]
    fn sealed_cards_open_to_the_same_record(
        number in "[0-9]{13,16}",
        month in 1u32..=12,
        year in 0u32..=99,
        cvv in "([0-9]{3,4})?",
        pin in "[0-9]{4}",
    ) {
        let card = SecuredRecord::Card(CardRecord::new(
            CardMeta {
                card_name: "prop".to_string(),
                bank_name: None,
                card_holder_name: None,
                card_type: Default::default(),
                issuer: Default::default(),
            },
            CardSecrets {
                card_number: number,
                expiry: format!("{:02}{:02}", month, year),
                cvv,
                pin: Pin::new(pin).unwrap(),
                atm_pin: None,
            },
        ).unwrap());

        let sealed = SealedRecord::seal(&card).unwrap();
        prop_assert_eq!(sealed.open().unwrap(), card);
    }
}
