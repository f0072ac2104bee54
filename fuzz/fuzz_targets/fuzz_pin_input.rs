#![no_main]

use cardvault_core::record::parse_expiry;
use cardvault_core::types::is_pin_shaped;
use cardvault_core::Pin;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // A PIN is accepted exactly when the input is PIN-shaped
    match Pin::new(data) {
        Ok(pin) => {
            assert!(is_pin_shaped(data));
            assert!(pin.matches(data));
        }
        Err(_) => assert!(!is_pin_shaped(data)),
    }

    if let Ok((month, _year)) = parse_expiry(data) {
        assert!((1..=12).contains(&month));
    }
});
