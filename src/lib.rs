pub mod app;
pub mod chat;
pub mod cli;
pub mod constants;
pub mod render;
pub mod runtime;
pub mod session;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config};
pub use chat::{ChatTransport, ConversationController, HttpChatClient, Transcript};
pub use session::{SessionId, SessionManager};
pub use tui::run_ui;
pub use utils::NatlangError;
