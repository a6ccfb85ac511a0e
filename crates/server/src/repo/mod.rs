pub mod analysis;
pub mod membership;
pub mod refresh_token;
pub mod user;
