//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod email;
pub mod run_log;
pub mod test_dependencies;
pub mod traits;

pub use deps::{DudaAdapter, HubSpotAdapter, OpenAIAdapter, ServerDeps};
pub use email::{NoopNotifier, SmtpNotifier};
pub use run_log::{NoopRunLog, PostgresRunLog};
pub use test_dependencies::TestDependencies;
pub use traits::*;
