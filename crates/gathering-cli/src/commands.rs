//! Subcommand definitions and their execution against an event store.

use std::io::Write;

use anyhow::Context;
use clap::{Args, Subcommand};
use gathering_core::query::EMPTY_RESULT_MESSAGE;
use gathering_core::{Applied, Durability, EventError, EventStore, SnapshotStorage};
use gathering_types::{CategoryFilter, Event, EventDraft, EventId, EventPatch, EventQuery};

use crate::render;

/// Store operations exposed on the command line.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List events, pinned first then by date
    List {
        /// Only show one category (all, religious, social, charity)
        #[arg(long, default_value_t = CategoryFilter::All)]
        category: CategoryFilter,

        /// Case-insensitive text to look for in title, location, or description
        #[arg(long, default_value = "")]
        search: String,

        /// Print the matching events as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one event
    Show {
        /// Event id
        id: String,
    },

    /// Create an event
    Add(DraftArgs),

    /// Edit an event; omitted fields keep their current values
    Edit {
        /// Event id
        id: String,

        /// Replacement fields
        #[command(flatten)]
        fields: EditArgs,

        /// Pin the event
        #[arg(long, conflicts_with = "unpin")]
        pin: bool,

        /// Unpin the event
        #[arg(long)]
        unpin: bool,
    },

    /// Delete an event
    Delete {
        /// Event id
        id: String,
    },

    /// Toggle an event's pin
    Pin {
        /// Event id
        id: String,
    },
}

/// Every field of a new event.
#[derive(Debug, Args)]
pub struct DraftArgs {
    /// Event title (3 to 100 characters)
    #[arg(long)]
    pub title: String,

    /// Event date, YYYY-MM-DD, today or later
    #[arg(long)]
    pub date: String,

    /// Where the event takes place (3 to 100 characters)
    #[arg(long)]
    pub location: String,

    /// What the event is about (10 to 500 characters)
    #[arg(long)]
    pub description: String,

    /// religious, social, or charity
    #[arg(long)]
    pub category: String,
}

impl From<DraftArgs> for EventDraft {
    fn from(args: DraftArgs) -> Self {
        Self {
            title: args.title,
            date: args.date,
            location: args.location,
            description: args.description,
            category: args.category,
        }
    }
}

/// Optional replacements for an edit.
#[derive(Debug, Args)]
pub struct EditArgs {
    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New date, YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,

    /// New location
    #[arg(long)]
    pub location: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New category
    #[arg(long)]
    pub category: Option<String>,
}

impl EditArgs {
    /// Overlay the given fields on a draft prefilled from `current`.
    fn onto(self, current: &Event) -> EventDraft {
        let mut draft = EventDraft::from(current);
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(location) = self.location {
            draft.location = location;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        draft
    }
}

/// Run `command` against `store`, writing command output to `out`.
///
/// Notices are delivered through the store's notifier, not `out`.
pub fn execute<S: SnapshotStorage>(
    store: &mut EventStore<S>,
    command: Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::List {
            category,
            search,
            json,
        } => {
            let query = EventQuery::all().with_category(category).with_search(search);
            let events = store.query(&query);
            if json {
                let body = serde_json::to_string_pretty(&events).context("encoding events")?;
                writeln!(out, "{body}")?;
            } else if events.is_empty() {
                writeln!(out, "{EMPTY_RESULT_MESSAGE}")?;
            } else {
                writeln!(out, "{}", render::listing(&events))?;
            }
        }
        Command::Show { id } => {
            let id = EventId::from(id);
            let event = store.get(&id).ok_or(EventError::NotFound(id))?;
            writeln!(out, "{}", render::card(event))?;
        }
        Command::Add(args) => {
            let applied = store.create(&EventDraft::from(args))?;
            print_applied(&applied, out)?;
        }
        Command::Edit {
            id,
            fields,
            pin,
            unpin,
        } => {
            let id = EventId::from(id);
            let current = store
                .get(&id)
                .ok_or_else(|| EventError::NotFound(id.clone()))?;
            let mut patch = EventPatch::from(fields.onto(current));
            if pin {
                patch = patch.with_pinned(true);
            } else if unpin {
                patch = patch.with_pinned(false);
            }
            let applied = store.update(&id, patch)?;
            print_applied(&applied, out)?;
        }
        Command::Delete { id } => {
            let applied = store.delete(&EventId::from(id))?;
            warn_if_at_risk(&applied.durability);
        }
        Command::Pin { id } => {
            let applied = store.toggle_pin(&EventId::from(id))?;
            print_applied(&applied, out)?;
        }
    }
    Ok(())
}

fn print_applied(applied: &Applied<Event>, out: &mut impl Write) -> anyhow::Result<()> {
    warn_if_at_risk(&applied.durability);
    writeln!(out, "{}", render::card(&applied.value))?;
    Ok(())
}

fn warn_if_at_risk(durability: &Durability) {
    if let Durability::AtRisk(err) = durability {
        eprintln!("warning: the change applies to this session only; saving failed: {err}");
    }
}
