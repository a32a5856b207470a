pub mod board;
pub mod emoji;
pub mod level;
pub mod options;
pub mod page;
pub mod reply;
pub mod source;

pub use board::BoardMessage;
pub use emoji::Emoji;
pub use options::Options;
pub use page::Page;
pub use reply::Reply;
pub use source::{Actor, EmbedSummary, ReactionEvent, ReactionTally, SourceMessage};
