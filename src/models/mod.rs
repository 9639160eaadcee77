pub mod identity;
pub mod user;
pub mod repository;
pub mod event;
pub mod rate_limit;
pub mod report;

pub use identity::*;
pub use user::*;
pub use repository::*;
pub use event::*;
pub use rate_limit::*;
pub use report::*;
