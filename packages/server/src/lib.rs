// Landing Page Service - Core
//
// Turns a CRM deal marked "Ready for Published" into a batch of SEO location
// landing pages in the CMS. HTTP routes in server/, the page pipeline in
// domains/landing_pages, external services behind kernel traits.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
