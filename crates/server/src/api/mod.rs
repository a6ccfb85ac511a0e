#[cfg(feature = "server")]
pub(crate) mod auth;

pub mod policy;

mod account;
pub use account::*;

mod dashboard;
pub use dashboard::*;

mod analysis;
pub use analysis::*;
