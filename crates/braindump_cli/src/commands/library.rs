//! Read-side commands: library, tasks, wins, plus toggle and delete.

use super::render::{item_line, print_items};
use super::{CliError, CliResult, Session};
use crate::LibraryArgs;
use braindump_core::{
    apply_library_query, tasks_view, wins_view, LibraryQuery, NudgeBoard, NudgeClient,
    QueryInput,
};

pub fn run(session: &Session, args: &LibraryArgs) -> CliResult {
    let query = parse_query(args)?;
    let all = session.context.items().items();
    let matched = apply_library_query(all, &query);

    println!("Library ({} of {}, sorted {})", matched.len(), all.len(), query.sort);
    if matched.is_empty() {
        println!(
            "{}",
            if query.is_filtered() {
                "No items match these filters."
            } else {
                "Nothing captured yet."
            }
        );
    }
    print_items(&matched);
    Ok(())
}

pub async fn tasks(session: &Session, nudge: bool) -> CliResult {
    let items = session.context.items().items();
    let view = tasks_view(items);

    if nudge {
        let client = NudgeClient::new(session.model()?);
        let mut board = NudgeBoard::default();
        board
            .refresh(&client, items, session.context.ai_context().as_deref())
            .await;
        println!("> {}\n", board.message());
    }

    println!("Pending tasks ({})", view.pending_total);
    if view.pending.is_empty() {
        println!("All clear.");
    }
    print_items(&view.pending);
    if view.pending_total > view.pending.len() {
        println!(
            "... and {} more (braindump library --type task --status pending)",
            view.pending_total - view.pending.len()
        );
    }
    if !view.completed.is_empty() {
        println!("\nCompleted ({})", view.completed.len());
        print_items(&view.completed);
    }
    Ok(())
}

pub fn wins(session: &Session) {
    let view = wins_view(session.context.items().items());
    let profile = session.context.profile().profile();
    println!(
        "Wins: {}  (streak {} days, {} total)",
        view.total, profile.streak, profile.total_wins
    );
    print_items(&view.recent);
}

pub fn toggle(session: &mut Session, id: &str) -> CliResult {
    let completed = session.context.items_mut().toggle_completed(id.trim())?;
    println!(
        "{} {}",
        if completed { "Completed" } else { "Reopened" },
        id.trim()
    );
    Ok(())
}

pub fn delete(session: &mut Session, id: &str) -> CliResult {
    let removed = session.context.items_mut().delete(id.trim())?;
    println!("Deleted:\n{}", item_line(&removed));
    Ok(())
}

fn parse_query(args: &LibraryArgs) -> CliResult<LibraryQuery> {
    LibraryQuery::parse(QueryInput {
        kind: args.kind.as_deref(),
        status: args.status.as_deref(),
        search: args.search.as_deref(),
        start: args.from.as_deref(),
        end: args.to.as_deref(),
        sort: args.sort.as_deref(),
    })
    .map_err(|err| CliError::Usage(err.to_string()))
}
