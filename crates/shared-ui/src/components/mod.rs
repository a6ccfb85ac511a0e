pub mod button;
pub mod card;
pub mod input;
pub mod skeleton;
pub mod spinner;
pub mod stat_card;
pub mod textarea;

pub use button::*;
pub use card::*;
pub use input::*;
pub use skeleton::*;
pub use spinner::*;
pub use stat_card::*;
pub use textarea::*;
