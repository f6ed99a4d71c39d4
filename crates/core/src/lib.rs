//! Core business logic for finledger.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here.
//!
//! # Modules
//!
//! - `currency` - Exchange-rate table and currency conversion
//! - `ledger` - Ledger entry aggregate, audit history, and domain service
//! - `query` - Filter predicate composition and summary aggregation

pub mod currency;
pub mod ledger;
pub mod query;
