//! Interactive capture: analyze, review, then publish or discard.

use super::render::item_line;
use super::{CliResult, Session};
use braindump_core::{
    AnalysisOutcome, CaptureState, CaptureWorkflow, Categorization, Categorizer, View,
    SUCCESS_ADVANCE_DELAY,
};
use std::io::{BufRead, Read, Write};

pub async fn run(session: &mut Session, words: Vec<String>, yes: bool) -> CliResult {
    let text = if words.is_empty() {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        words.join(" ")
    };

    let categorizer = Categorizer::new(session.model()?);
    let context = session.context.ai_context();
    let mut workflow = CaptureWorkflow::with_text(text);

    println!("Thinking...");
    let outcome = workflow
        .analyze(&categorizer, context.as_deref(), session.context.items_mut())
        .await?;

    match outcome {
        AnalysisOutcome::Review => {}
        AnalysisOutcome::FallbackSaved { item_id, destination } => {
            println!("Couldn't categorize that; saved it as an unsorted note.");
            if let Some(item) = session.context.items().get(&item_id) {
                println!("{}", item_line(item));
            }
            return advance(destination).await;
        }
        AnalysisOutcome::Stale => return Ok(()),
    }

    if let CaptureState::Review { categorization, .. } = workflow.state() {
        print_review(categorization);
    }

    if !yes && !confirm("Save this? [Y/n] ", &mut std::io::stdin().lock())? {
        workflow.discard()?;
        println!("Discarded. Your text was not saved:\n  {}", workflow.text());
        return Ok(());
    }

    let item = workflow.publish(session.context.items_mut())?;
    println!("Saved.\n{}", item_line(&item));
    match workflow.destination() {
        Some(destination) => advance(destination).await,
        None => Ok(()),
    }
}

fn print_review(categorization: &Categorization) {
    println!("  title:    {}", categorization.title);
    println!("  type:     {}", categorization.kind);
    println!("  category: {}", categorization.category);
    if !categorization.tags.is_empty() {
        println!("  tags:     {}", categorization.tags.join(", "));
    }
    if let Some(priority) = categorization.priority {
        println!("  priority: {priority}");
    }
}

/// Reads one answer line. End of input (piped text, closed stdin) is a "no".
fn confirm(prompt: &str, input: &mut impl BufRead) -> CliResult<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        println!();
        eprintln!("no answer on stdin; pass --yes to save piped text");
        return Ok(false);
    }
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "" | "y" | "yes")
}

/// Pauses on the success message, then names the view the item landed in.
async fn advance(destination: View) -> CliResult {
    tokio::time::sleep(SUCCESS_ADVANCE_DELAY).await;
    let hint = match destination {
        View::Tasks => "braindump tasks",
        View::Wins => "braindump wins",
        _ => "braindump library",
    };
    println!("Filed under {destination} (see `{hint}`).");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{confirm, is_yes};
    use std::io::Cursor;

    #[test]
    fn empty_answer_defaults_to_yes() {
        assert!(is_yes("\n"));
        assert!(is_yes(" Y "));
        assert!(is_yes("yes"));
        assert!(!is_yes("n"));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn end_of_input_is_not_consent() {
        assert!(!confirm("Save? ", &mut Cursor::new("")).unwrap());
        assert!(confirm("Save? ", &mut Cursor::new("\n")).unwrap());
        assert!(!confirm("Save? ", &mut Cursor::new("n\n")).unwrap());
    }
}
