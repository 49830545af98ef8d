pub const USER_AGENT: &str = "cinefind/0.1";

pub mod catalog {

    pub const TMDB_API: &str = "https://api.themoviedb.org/3";

    pub const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";

    pub const DISCOVER_SORT: &str = "popularity.desc";

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
}

pub mod posters {

    pub const IMAGE_HOST: &str = "image.tmdb.org";

    pub const PROXY_BASE: &str = "https://images.weserv.nl/";

    pub const PLACEHOLDER: &str = "/no-movie.png";
}

pub mod trending {

    pub const APPWRITE_ENDPOINT: &str = "https://cloud.appwrite.io/v1";

    pub const DEFAULT_LIMIT: usize = 5;
}

pub mod search {
    use std::time::Duration;

    pub const DEBOUNCE: Duration = Duration::from_millis(500);
}

pub mod messages {

    pub const FETCH_FAILED: &str = "Error fetching movies. Please try again later.";

    pub const NO_RESULTS: &str = "No movies found.";
}
