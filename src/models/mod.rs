pub mod referral;
pub mod user;
pub mod view;

pub use referral::*;
pub use user::*;
pub use view::*;
