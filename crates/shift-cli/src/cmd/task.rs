use clap::Subcommand;

use crate::output::{print_json, Listing};
use shift_core::clock::Clock;
use shift_core::store::Store;
use shift_core::{streak, task};

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Add a task to today's list
    Add {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Flip a task's completion flag
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
    /// List today's tasks
    List,
}

pub fn run(
    store: &dyn Store,
    clock: &dyn Clock,
    subcmd: TaskSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    streak::rollover(store, clock)?;
    match subcmd {
        TaskSubcommand::Add { text } => add(store, clock, &text.join(" "), json),
        TaskSubcommand::Toggle { id } => toggle(store, clock, &id, json),
        TaskSubcommand::Delete { id } => delete(store, clock, &id, json),
        TaskSubcommand::List => list(store, clock, json),
    }
}

fn add(store: &dyn Store, clock: &dyn Clock, text: &str, json: bool) -> anyhow::Result<()> {
    let mut tasks = task::load_today(store, clock)?;
    let id = task::add_task(&mut tasks, text)?;
    task::save_today(store, clock, &tasks)?;
    let update = streak::apply_change(store, clock, &tasks)?;

    if json {
        print_json(&serde_json::json!({ "id": id, "tasks": tasks, "streak": update.state }))?;
    } else {
        println!("added {id}");
    }
    Ok(())
}

fn toggle(store: &dyn Store, clock: &dyn Clock, id: &str, json: bool) -> anyhow::Result<()> {
    let mut tasks = task::load_today(store, clock)?;
    let completed = task::toggle_task(&mut tasks, id)?;
    task::save_today(store, clock, &tasks)?;
    let update = streak::apply_change(store, clock, &tasks)?;

    if json {
        print_json(&update)?;
    } else {
        println!(
            "{} ({}/{} done, streak {})",
            if completed { "completed" } else { "reopened" },
            task::completed_count(&tasks),
            tasks.len(),
            update.state.current
        );
        if let Some(m) = update.milestone {
            println!("milestone reached: {m} days!");
        }
    }
    Ok(())
}

fn delete(store: &dyn Store, clock: &dyn Clock, id: &str, json: bool) -> anyhow::Result<()> {
    let mut tasks = task::load_today(store, clock)?;
    task::delete_task(&mut tasks, id)?;
    task::save_today(store, clock, &tasks)?;
    let update = streak::apply_change(store, clock, &tasks)?;

    if json {
        print_json(&update)?;
    } else {
        println!("deleted {id}");
    }
    Ok(())
}

fn list(store: &dyn Store, clock: &dyn Clock, json: bool) -> anyhow::Result<()> {
    let tasks = task::load_today(store, clock)?;

    if json {
        print_json(&tasks)?;
        return Ok(());
    }

    if tasks.is_empty() {
        println!("no tasks for today");
        return Ok(());
    }

    let mut listing = Listing::new(&["ID", "TEXT", "STATUS"]);
    for t in &tasks {
        listing.row([
            t.id.clone(),
            t.text.clone(),
            if t.completed { "done" } else { "open" }.to_string(),
        ]);
    }
    listing.print();
    Ok(())
}
