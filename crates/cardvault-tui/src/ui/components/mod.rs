//! Reusable UI components

pub mod notification;
