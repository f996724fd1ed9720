pub mod host;
pub mod user_info;

pub use host::*;
pub use user_info::*;
