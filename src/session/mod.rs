/// Session management module - Gateway

mod id;
mod manager;
mod store;

pub use id::SessionId;
pub use manager::SessionManager;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
