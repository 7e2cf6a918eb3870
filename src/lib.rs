//! Course Club - content entitlement engine
//!
//! Decides who may see which course or vlog, based on publication flags,
//! individual purchases and club subscription state, and keeps subscription
//! state in sync with signed payment-provider webhooks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
