//! Landing pages domain.
//!
//! Turns a ready CRM deal into a batch of location landing pages:
//! deal → contact → nearby locations → generated copy → CMS collection rows.

pub mod activities;
pub mod models;

pub use activities::*;
pub use models::*;
