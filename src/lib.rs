//! Receipt Book
//!
//! This crate keeps a local book of payment receipts, chains installment
//! receipts to the receipt that opened the obligation and renders amounts in
//! Arabic words for the printed receipt.

pub mod config;
pub mod core;
pub mod export;
pub mod presentation;
pub mod store;
