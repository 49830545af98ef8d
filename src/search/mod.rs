//! Search screen controllers and the session that drives them.

pub mod debounce;
pub mod pagination;
pub mod session;

pub use debounce::Debouncer;
pub use pagination::{Effect, FetchEvent, FetchRequest, FetchStatus, SearchState};
pub use session::{Input, SearchSession, Snapshot};
