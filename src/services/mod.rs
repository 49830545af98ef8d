pub mod memory_store;
pub use memory_store::MemoryTrendingStore;

pub mod poster;
pub use poster::{PosterProxy, proxied_poster_url};

pub mod trending;
pub use trending::{StoreError, TrendingService, TrendingStore};
