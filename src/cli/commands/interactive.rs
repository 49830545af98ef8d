//! Interactive search command handler

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::search::{Input, SearchSession, Snapshot};
use crate::state::AppState;
use crate::view::View;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// What a line typed at the prompt means.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Input(Input),
    Help,
    Quit,
}

fn parse_line(line: &str) -> Line {
    match line.trim_end_matches(['\r', '\n']) {
        ":more" | ":m" => Line::Input(Input::LoadMore),
        ":retry" | ":r" => Line::Input(Input::Retry),
        ":trending" | ":t" => Line::Input(Input::RefreshTrending),
        ":help" | ":h" => Line::Help,
        ":quit" | ":q" => Line::Quit,
        text => Line::Input(Input::Edit(text.to_string())),
    }
}

fn print_help() {
    println!("Type to search; each line replaces the search text.");
    println!("  :more     Load the next page");
    println!("  :retry    Retry a failed page");
    println!("  :trending Reload the trending list");
    println!("  :quit     Exit");
}

async fn render_loop(mut snapshots: watch::Receiver<Snapshot>, mut view: View) {
    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        print!("{CLEAR_SCREEN}{}\n\n> ", view.render(&snapshot));
        std::io::stdout().flush().ok();

        if snapshots.changed().await.is_err() {
            break;
        }
    }
}

pub async fn cmd_interactive(state: &AppState) -> anyhow::Result<()> {
    let (session, snapshots) = SearchSession::new(
        state.catalog.clone(),
        state.trending.clone(),
        state.config.search.debounce(),
        state.config.trending.limit,
    );

    let (tx, rx) = mpsc::channel(32);
    let session_task = tokio::spawn(session.run(rx));
    let render_task = tokio::spawn(render_loop(snapshots, View::new(state.posters.clone())));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Line::Input(input) => {
                debug!(?input, "Input");
                if tx.send(input).await.is_err() {
                    break;
                }
            }
            Line::Help => print_help(),
            Line::Quit => break,
        }
    }

    drop(tx);
    session_task.await?;
    render_task.abort();
    println!();

    Ok(())
}
