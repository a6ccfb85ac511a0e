pub mod analysis;
pub mod auth;
pub mod company;
pub mod error;
pub mod feature_flags;

pub use analysis::*;
pub use auth::*;
pub use company::*;
pub use error::*;
pub use feature_flags::*;
