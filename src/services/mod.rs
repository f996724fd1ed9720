pub mod clipboard;
pub mod code_generator;
pub mod reconciliation;
pub mod referral_api;

pub use clipboard::*;
pub use code_generator::*;
pub use reconciliation::*;
pub use referral_api::*;
