//! CLI command handlers for the crewfit application.

mod score;
mod serve;
mod taxonomy;

pub(crate) use score::handle_score_command;
pub use score::score_request;
pub(crate) use serve::handle_serve_command;
pub(crate) use taxonomy::handle_taxonomy_command;
