//! Trending searches command handler

use anyhow::Context;

use crate::state::AppState;

pub async fn cmd_trending(state: &AppState, limit: Option<usize>) -> anyhow::Result<()> {
    let limit = limit.unwrap_or(state.config.trending.limit);
    let records = state
        .trending
        .top(limit)
        .await
        .context("Failed to load trending searches")?;

    if records.is_empty() {
        println!("No searches recorded yet.");
        return Ok(());
    }

    println!("Trending Movies");
    println!("{:-<60}", "");

    for (i, record) in records.iter().enumerate() {
        println!(
            "{:>2}. {} ({} searches)",
            i + 1,
            record.search_term,
            record.count
        );
        println!(
            "    {} | {}",
            record.movie.title,
            state.posters.rewrite(record.movie.poster_url.as_deref())
        );
    }

    Ok(())
}
