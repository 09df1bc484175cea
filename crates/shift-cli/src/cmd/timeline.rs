use clap::Subcommand;

use crate::output::{print_json, Listing};
use shift_core::clock::Clock;
use shift_core::store::Store;
use shift_core::timeline::TimelineSet;

#[derive(Subcommand)]
pub enum TimelineSubcommand {
    /// List timelines
    List,
    /// Create a timeline (omit the name to auto-number it)
    New { name: Option<String> },
    /// Rename a timeline
    Rename { id: String, name: String },
    /// Delete a timeline (the last one cannot be deleted)
    Delete { id: String },
    /// Make a timeline active
    Select { id: String },
    /// Export the last assistant reply as a content draft
    Export {
        /// Timeline id (defaults to the active one)
        id: Option<String>,
    },
}

pub fn run(
    store: &dyn Store,
    clock: &dyn Clock,
    subcmd: TimelineSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let mut set = TimelineSet::load(store, clock);

    match subcmd {
        TimelineSubcommand::List => {
            set.save(store)?;
            if json {
                print_json(&set)?;
                return Ok(());
            }
            let mut listing = Listing::new(&["ID", "NAME", "MESSAGES", "ACTIVE"]);
            for t in &set.timelines {
                listing.row([
                    t.id.clone(),
                    t.name.clone(),
                    t.messages.len().to_string(),
                    if t.id == set.active_id { "*" } else { "" }.to_string(),
                ]);
            }
            listing.print();
        }
        TimelineSubcommand::New { name } => {
            let id = set.create(clock, name.as_deref());
            set.save(store)?;
            if json {
                print_json(&serde_json::json!({ "id": id }))?;
            } else {
                println!("created {id}");
            }
        }
        TimelineSubcommand::Rename { id, name } => {
            set.rename(&id, &name)?;
            set.save(store)?;
            if !json {
                println!("renamed {id}");
            }
        }
        TimelineSubcommand::Delete { id } => {
            set.delete(&id)?;
            set.save(store)?;
            if !json {
                println!("deleted {id}");
            }
        }
        TimelineSubcommand::Select { id } => {
            set.select(&id)?;
            set.save(store)?;
            if !json {
                println!("selected {id}");
            }
        }
        TimelineSubcommand::Export { id } => {
            let id = id.unwrap_or_else(|| set.active().id.clone());
            let draft = set.export_draft(store, clock, &id)?;
            if json {
                print_json(&draft)?;
            } else {
                println!("exported from \"{}\":\n{}", draft.timeline_name, draft.text);
            }
        }
    }
    Ok(())
}
