// Gateway module for rendering - follows the Train Station Pattern
// Message text is always escaped for the target medium before display

mod escape;
mod html;
mod plain;

pub use escape::{escape_html, escape_terminal};
pub use html::{render_message_html, render_transcript_html};
pub use plain::{format_buttons, format_metadata, render_message_plain};
