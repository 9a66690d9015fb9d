pub mod chats;
pub mod upload;

pub use chats::*;
pub use upload::*;
