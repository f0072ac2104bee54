//! Terminal output helpers

use cardvault_core::{Notice, SecuredRecord, SensitiveView, VaultStats, EXPIRY_WARNING_MONTHS};
use cardvault_store::StoredRecord;

/// One line per record, sensitive fields masked
pub fn print_summary(stored: &StoredRecord) {
    let view = SensitiveView::masked(&stored.record);
    match &stored.record {
        SecuredRecord::Card(card) => println!(
            "{}  card      {:<20} {}  {}",
            stored.id.short(),
            card.meta.card_name,
            view.number(),
            card.meta.issuer
        ),
        SecuredRecord::Document(doc) => println!(
            "{}  document  {:<20} {}  {}{}",
            stored.id.short(),
            doc.meta.document_name,
            view.number(),
            doc.meta.document_type,
            if doc.meta.has_pin { "" } else { "  (no PIN)" }
        ),
    }
}

/// Every field of a record, masked unless `visible`
pub fn print_details(stored: &StoredRecord, visible: bool) {
    let view = SensitiveView::new(&stored.record, visible);
    match &stored.record {
        SecuredRecord::Card(card) => {
            println!("Card: {}", card.meta.card_name);
            println!("  Holder: {}", card.holder_name());
            if let Some(bank) = &card.meta.bank_name {
                println!("  Bank: {}", bank);
            }
            println!("  Type: {} / {}", card.meta.card_type, card.meta.issuer);
            println!("  Number: {}", view.number());
            if let Some(expiry) = view.expiry() {
                println!("  Expiry: {}", expiry);
            }
            if let Some(cvv) = view.cvv() {
                println!("  CVV: {}", cvv);
            }
            if let Some(atm_pin) = view.atm_pin() {
                println!("  ATM PIN: {}", atm_pin);
            }
        }
        SecuredRecord::Document(doc) => {
            println!("Document: {}", doc.meta.document_name);
            println!("  Type: {}", doc.meta.document_type);
            if let Some(holder) = &doc.meta.holder_name {
                println!("  Holder: {}", holder);
            }
            println!("  Number: {}", view.number());
            if let Some(issued) = &doc.meta.issue_date {
                println!("  Issued: {}", issued);
            }
            if let Some(expiry) = view.expiry() {
                println!("  Expires: {}", expiry);
            }
            if let Some(authority) = &doc.meta.issuing_authority {
                println!("  Authority: {}", authority);
            }
            if let Some(notes) = view.notes() {
                println!("  Notes: {}", notes);
            }
        }
    }
    if let Some(pin) = view.security_pin() {
        println!("  Security PIN: {}", pin);
    }
}

pub fn print_notice(notice: &Notice) {
    println!("{}: {}", notice.title, notice.body);
}

pub fn print_stats(stats: &VaultStats) {
    println!("Cards: {}", stats.total);
    println!(
        "  Credit cards: {} ({}%)",
        stats.credit_like,
        stats.percentage(stats.credit_like)
    );
    println!(
        "  Debit cards: {} ({}%)",
        stats.debit_like,
        stats.percentage(stats.debit_like)
    );
    println!("  Other: {}", stats.other);
    println!(
        "  Expiring within {} months: {}",
        EXPIRY_WARNING_MONTHS, stats.expiring_soon
    );
    if !stats.by_bank.is_empty() {
        println!("\nBy bank:");
        for (bank, count) in &stats.by_bank {
            println!("  {:<20} {} ({}%)", bank, count, stats.percentage(*count));
        }
    }
}
