mod analysis_history;
mod auth_forms;
mod chat_interface;
mod footer;

pub use analysis_history::AnalysisHistory;
pub use auth_forms::{LoginForm, SignupForm};
pub use chat_interface::ChatInterface;
pub use footer::Footer;
