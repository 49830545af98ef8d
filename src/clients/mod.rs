pub mod appwrite;
pub mod tmdb;

pub use appwrite::AppwriteClient;
pub use tmdb::{Catalog, CatalogError, CatalogRequest, TmdbClient};
