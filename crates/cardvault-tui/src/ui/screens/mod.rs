//! Screen modules for different views

pub mod confirm;
pub mod details;
pub mod lockout;
pub mod pin_entry;
pub mod records;
