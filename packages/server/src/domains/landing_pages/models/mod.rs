pub mod contact;
pub mod deal;
pub mod page;
pub mod run;
pub mod settings;
pub mod webhook;

pub use contact::*;
pub use deal::*;
pub use page::*;
pub use run::*;
pub use settings::*;
pub use webhook::*;
