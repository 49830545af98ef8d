mod interactive;
mod poster;
mod search;
mod trending;

pub use interactive::cmd_interactive;
pub use poster::cmd_poster;
pub use search::{cmd_discover, cmd_search};
pub use trending::cmd_trending;
