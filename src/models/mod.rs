pub mod movie;
pub mod search_record;

pub use movie::{Movie, MoviePage};
pub use search_record::{MovieSnapshot, NewSearchRecord, SearchRecord};
