//! Interactive table session driven by stdin lines.
//!
//! Plain lines are search input and go through the debouncer; lines starting
//! with `:` are commands applied immediately.

use std::{fs::File, io::BufWriter, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use client_core::{export::write_csv, CatalogApi, CatalogSession, Debouncer};
use shared::error::CatalogError;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc::UnboundedReceiver,
};
use tracing::{debug, info};
use view::{parse_page_size, SortField};

use crate::render::render_page;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Sort(SortField),
    Page(usize),
    Size(usize),
    Next,
    Prev,
    Export(PathBuf),
    Delete(String),
    Reload,
    Quit,
}

pub fn parse_command(line: &str) -> Result<BrowseCommand, CatalogError> {
    let Some(command) = line.trim().strip_prefix(':') else {
        return Ok(BrowseCommand::Search(line.to_string()));
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    let parsed = match name {
        "sort" => BrowseCommand::Sort(arg.parse()?),
        "page" => BrowseCommand::Page(arg.parse().map_err(|_| {
            CatalogError::InvalidConfig(format!("page must be a positive integer, got '{arg}'"))
        })?),
        "size" => BrowseCommand::Size(parse_page_size(arg)?),
        "next" => BrowseCommand::Next,
        "prev" => BrowseCommand::Prev,
        "export" if !arg.is_empty() => BrowseCommand::Export(PathBuf::from(arg)),
        "delete" if !arg.is_empty() => BrowseCommand::Delete(arg.to_string()),
        "reload" => BrowseCommand::Reload,
        "quit" | "q" => BrowseCommand::Quit,
        other => {
            return Err(CatalogError::InvalidConfig(format!(
                "unknown command ':{other}'"
            )))
        }
    };
    Ok(parsed)
}

pub async fn run<A: CatalogApi>(session: &mut CatalogSession<A>, debounce: Duration) -> Result<()> {
    let (mut debouncer, mut searches) = Debouncer::new(debounce);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_view(session)?;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(BrowseCommand::Search(text)) => debouncer.push(text),
                    Ok(BrowseCommand::Quit) => {
                        debouncer.cancel();
                        return Ok(());
                    }
                    Ok(command) => {
                        // A command supersedes any search still waiting.
                        debouncer.cancel();
                        match apply(session, command).await {
                            Ok(()) => print_view(session)?,
                            Err(err) => eprintln!("{err:#}"),
                        }
                    }
                    Err(err) => eprintln!("{err}"),
                }
            }
            Some(text) = searches.recv() => {
                debug!(search = %text, "applying debounced search");
                session.search(text);
                print_view(session)?;
            }
        }
    }

    // Input ended mid-burst: the last search still counts.
    debouncer.settle().await;
    if let Some(text) = latest_search(&mut searches) {
        debug!(search = %text, "applying final search");
        session.search(text);
        print_view(session)?;
    }
    Ok(())
}

/// Drains searches already emitted, keeping only the newest.
fn latest_search(searches: &mut UnboundedReceiver<String>) -> Option<String> {
    let mut latest = None;
    while let Ok(text) = searches.try_recv() {
        latest = Some(text);
    }
    latest
}

async fn apply<A: CatalogApi>(session: &mut CatalogSession<A>, command: BrowseCommand) -> Result<()> {
    match command {
        BrowseCommand::Sort(field) => session.toggle_sort(field),
        BrowseCommand::Page(page) => session.goto_page(page)?,
        BrowseCommand::Size(size) => session.set_page_size(size)?,
        BrowseCommand::Next => session.next_page(),
        BrowseCommand::Prev => session.previous_page(),
        BrowseCommand::Export(path) => {
            let view = session.view()?;
            let file = File::create(&path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            write_csv(&view.rows, BufWriter::new(file))?;
            info!(path = %path.display(), rows = view.rows.len(), "exported page");
        }
        BrowseCommand::Delete(raw_id) => {
            let removed = session.delete_raw(&raw_id).await?;
            info!(id = %raw_id, removed, "deleted product");
        }
        BrowseCommand::Reload => {
            session.load().await?;
        }
        BrowseCommand::Search(text) => session.search(text),
        BrowseCommand::Quit => {}
    }
    Ok(())
}

fn print_view<A: CatalogApi>(session: &mut CatalogSession<A>) -> Result<()> {
    let view = session.view()?;
    let stdout = std::io::stdout();
    render_page(&view, &mut stdout.lock()).context("failed to write table")?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/browse_tests.rs"]
mod tests;
