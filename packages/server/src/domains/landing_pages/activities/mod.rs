//! Landing pages activities - entry-point business logic
//!
//! Called from the HTTP routes. Each activity takes raw input plus
//! `ServerDeps` and returns the final result for the caller.

pub mod derive_locations;
pub mod generate_content;
pub mod generate_direct;
pub mod process_deal;
pub mod publish_pages;
pub mod record_run;

pub use derive_locations::{derive_locations, normalize_location, LocationRequest};
pub use generate_content::{generate_all, generate_content, ContentRequest};
pub use generate_direct::{generate_direct, DirectGenerateRequest, DirectGenerateResult};
pub use process_deal::{handle_deal_event, process_deal};
pub use publish_pages::{publish_pages, PublishTarget};
pub use record_run::record_run;
