#![no_main]

use cardvault_core::SealedRecord;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Try to parse a stored row - should not panic
    let Ok(sealed) = serde_json::from_slice::<SealedRecord>(data) else {
        return;
    };
    if let Ok(record) = sealed.open() {
        // Anything that opens is valid, so it must seal and open again
        let resealed = SealedRecord::seal(&record).expect("valid record must seal");
        let reopened = resealed.open().expect("sealed record must open");
        assert_eq!(record, reopened);
    }
});
