//! Poster URL command handler

use crate::state::AppState;

pub fn cmd_poster(state: &AppState, url: Option<&str>) {
    println!("{}", state.posters.rewrite(url));
}
