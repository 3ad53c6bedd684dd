/// Runtime orchestrator module - Gateway

mod line_mode;
mod non_interactive;
mod orchestrator;

pub use line_mode::{parse_line, LineInput, LineMode};
pub use non_interactive::{NonInteractiveResult, NonInteractiveRunner};
pub use orchestrator::{build_controller, build_session_manager, resolve_config, Orchestrator};
