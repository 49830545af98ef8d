//! One-shot search and discover command handlers

use std::collections::VecDeque;

use crate::search::{Effect, FetchEvent, SearchState};
use crate::state::AppState;
use crate::view::View;

/// Carries out controller effects until none are left. Analytics writes are
/// awaited inline; the recorder never fails.
async fn run_effects(state: &AppState, search: &mut SearchState, effects: Vec<Effect>) {
    let mut queue = VecDeque::from(effects);

    while let Some(effect) = queue.pop_front() {
        match effect {
            Effect::Fetch(request) => {
                let outcome = state.catalog.fetch_page(&request.catalog_request()).await;
                queue.extend(search.apply(FetchEvent::Completed { request, outcome }));
            }
            Effect::RecordSearch { term, movie } => state.trending.record(&term, &movie).await,
        }
    }
}

async fn load_pages(state: &AppState, term: &str, pages: u32) -> SearchState {
    let mut search = SearchState::new();

    let effects = search.apply(FetchEvent::Commit(term.to_string()));
    run_effects(state, &mut search, effects).await;

    for _ in 1..pages {
        if !search.can_load_more() {
            break;
        }
        let effects = search.apply(FetchEvent::LoadMore);
        run_effects(state, &mut search, effects).await;
    }

    search
}

fn print_results(state: &AppState, search: &SearchState) {
    if let Some(error) = search.error() {
        println!("{error}");
        return;
    }

    let view = View::new(state.posters.clone());
    println!("{:-<60}", "");
    for movie in search.movies() {
        println!("• {}", view.movie_line(movie));
    }
    println!();
    println!(
        "{} movies, pages 1-{}{}",
        search.movies().len(),
        search.page(),
        if search.has_more() { ", more available" } else { "" }
    );
}

pub async fn cmd_search(state: &AppState, query: &str, pages: u32) -> anyhow::Result<()> {
    println!("Searching for: {query}");

    let search = load_pages(state, query, pages).await;
    print_results(state, &search);

    Ok(())
}

pub async fn cmd_discover(state: &AppState, pages: u32) -> anyhow::Result<()> {
    println!("Popular movies");

    let search = load_pages(state, "", pages).await;
    print_results(state, &search);

    Ok(())
}
