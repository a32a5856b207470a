mod board;
pub mod settings;
pub mod suggestion;
mod xp;

pub use board::{BoardEntry, BoardState};
pub use settings::UserSettings;
pub use suggestion::{Answer, Suggestion};
pub use xp::{XpChange, XpEntry};
