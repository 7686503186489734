// HTTP routes
pub mod generate;
pub mod health;
pub mod webhook;

pub use generate::*;
pub use health::*;
pub use webhook::*;
