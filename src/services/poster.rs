//! Poster URL rewriting.
//!
//! Catalog posters are served through an image-resizing proxy; anything
//! else is left alone, and a missing poster maps to a local placeholder.

use tracing::debug;
use url::Url;

use crate::config::PosterConfig;
use crate::models::Movie;

#[derive(Debug, Clone)]
pub struct PosterProxy {
    image_host: String,
    proxy_base: String,
    placeholder: String,
}

impl Default for PosterProxy {
    fn default() -> Self {
        Self::new(&PosterConfig::default())
    }
}

impl PosterProxy {
    #[must_use]
    pub fn new(config: &PosterConfig) -> Self {
        Self {
            image_host: config.image_host.clone(),
            proxy_base: config.proxy_base.clone(),
            placeholder: config.placeholder.clone(),
        }
    }

    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Maps a raw poster URL to the URL the view should load.
    #[must_use]
    pub fn rewrite(&self, url: Option<&str>) -> String {
        let Some(url) = url.filter(|u| !u.is_empty()) else {
            return self.placeholder.clone();
        };

        if !url.contains(&self.image_host) {
            return url.to_string();
        }

        match self.proxied(url) {
            Ok(proxied) => proxied,
            Err(e) => {
                debug!(url = %url, error = %e, "Falling back to placeholder poster");
                self.placeholder.clone()
            }
        }
    }

    #[must_use]
    pub fn for_movie(&self, movie: &Movie) -> String {
        self.rewrite(movie.poster_url().as_deref())
    }

    fn proxied(&self, url: &str) -> Result<String, url::ParseError> {
        let without_protocol = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);

        let mut proxied = Url::parse(&self.proxy_base)?;
        proxied.set_query(Some(&format!(
            "url={}",
            urlencoding::encode(without_protocol)
        )));

        Ok(proxied.into())
    }
}

/// Rewrites with the default host, proxy and placeholder.
#[must_use]
pub fn proxied_poster_url(url: Option<&str>) -> String {
    PosterProxy::default().rewrite(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_param(proxied: &str) -> String {
        let encoded = proxied
            .strip_prefix("https://images.weserv.nl/?url=")
            .expect("proxied URL starts with the proxy base");
        urlencoding::decode(encoded).unwrap().into_owned()
    }

    #[test]
    fn missing_poster_uses_placeholder() {
        assert_eq!(proxied_poster_url(None), "/no-movie.png");
        assert_eq!(proxied_poster_url(Some("")), "/no-movie.png");
    }

    #[test]
    fn other_hosts_pass_through() {
        for url in [
            "https://example.com/poster.jpg",
            "/local/poster.png",
            "image.tmdb.com/t/p/w500/a.jpg",
            "not even a url",
        ] {
            assert_eq!(proxied_poster_url(Some(url)), url);
        }
    }

    #[test]
    fn catalog_posters_are_proxied() {
        let url = "https://image.tmdb.org/t/p/w500/d5NXSklXo0qyIYkgV94XAgMIckC.jpg";
        let proxied = proxied_poster_url(Some(url));

        assert_eq!(
            proxied,
            "https://images.weserv.nl/?url=image.tmdb.org%2Ft%2Fp%2Fw500%2Fd5NXSklXo0qyIYkgV94XAgMIckC.jpg"
        );
        assert_eq!(
            url_param(&proxied),
            "image.tmdb.org/t/p/w500/d5NXSklXo0qyIYkgV94XAgMIckC.jpg"
        );
    }

    #[test]
    fn proxied_param_decodes_to_stripped_input() {
        for url in [
            "http://image.tmdb.org/t/p/original/a b.jpg",
            "image.tmdb.org/t/p/w500/x.jpg?size=2&v=1",
            "https://cdn.example.com/mirror/image.tmdb.org/ü.png",
        ] {
            let proxied = proxied_poster_url(Some(url));
            assert!(proxied.starts_with("https://images.weserv.nl/"));

            let expected = url
                .strip_prefix("https://")
                .or_else(|| url.strip_prefix("http://"))
                .unwrap_or(url);
            assert_eq!(url_param(&proxied), expected);
        }
    }

    #[test]
    fn broken_proxy_base_falls_back() {
        let proxy = PosterProxy::new(&PosterConfig {
            proxy_base: "::not a base::".to_string(),
            ..PosterConfig::default()
        });

        assert_eq!(
            proxy.rewrite(Some("https://image.tmdb.org/t/p/w500/a.jpg")),
            "/no-movie.png"
        );
        // passthrough never touches the proxy
        assert_eq!(
            proxy.rewrite(Some("https://example.com/a.jpg")),
            "https://example.com/a.jpg"
        );
    }

    #[test]
    fn movie_without_poster_path() {
        let movie = Movie {
            id: 1,
            title: "Untitled".to_string(),
            poster_path: None,
            release_date: None,
            vote_average: None,
            original_language: None,
            popularity: None,
            overview: String::new(),
        };
        assert_eq!(PosterProxy::default().for_movie(&movie), "/no-movie.png");
    }
}
