pub mod bot_event;
pub mod bot_memory;
pub mod bot_state;
pub mod chat;
pub mod like;
pub mod post;
pub mod user;

pub use bot_event::{BotDailyEvent, NewBotDailyEvent};
pub use bot_memory::{BotMemory, NewBotMemory};
pub use bot_state::{BotState, BotStatePatch, NewBotState};
pub use chat::{ChatMessage, NewChatMessage};
pub use like::{Like, NewLike};
pub use post::{NewPost, Post};
pub use user::User;
