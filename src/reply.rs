use crate::config::{DISCORD_EMBED_LIMIT, DISCORD_EMBED_TOTAL_LIMIT, DISCORD_FIELD_LIMIT};
use crate::db::{StatusRecord, TimelineEntry};
use crate::{Context, Error};
use poise::serenity_prelude::{Colour, CreateEmbed};

const INFO_COLOUR: Colour = Colour::BLUE;
const SUCCESS_COLOUR: Colour = Colour::DARK_GREEN;

pub const NOT_AUTHORIZED: &str = "You are not authorized to use this command.";
pub const NO_TIMELINE_ENTRIES: &str = "No timeline entries found.";

pub fn status_description(status: &StatusRecord) -> String {
    format!(
        "**Type:** {}\n**Message:** {}",
        status.kind, status.message
    )
}

pub fn entry_field_name(entry: &TimelineEntry) -> String {
    format!("ID: {} | {} - {}", entry.id, entry.date, entry.title)
}

pub fn entry_description(entry: &TimelineEntry, with_id: bool) -> String {
    let mut out = String::new();
    if with_id {
        out.push_str(&format!("**ID:** {}\n", entry.id));
    }
    out.push_str(&format!(
        "**Date:** {}\n**Title:** {}\n**Description:** {}",
        entry.date, entry.title, entry.description
    ));
    out
}

pub fn current_status(status: &StatusRecord) -> CreateEmbed {
    CreateEmbed::new()
        .title("Current Status")
        .description(truncate(&status_description(status), DISCORD_EMBED_LIMIT))
        .colour(INFO_COLOUR)
}

pub fn status_updated(status: &StatusRecord) -> CreateEmbed {
    let description = format!(
        "Your status has been updated to:\n{}",
        status_description(status)
    );
    CreateEmbed::new()
        .title("Status Updated")
        .description(truncate(&description, DISCORD_EMBED_LIMIT))
        .colour(SUCCESS_COLOUR)
}

pub fn entry_added(entry: &TimelineEntry) -> CreateEmbed {
    CreateEmbed::new()
        .title("Timeline Entry Added")
        .description(truncate(&entry_description(entry, false), DISCORD_EMBED_LIMIT))
        .colour(SUCCESS_COLOUR)
}

pub fn entry_updated(entry: &TimelineEntry) -> CreateEmbed {
    CreateEmbed::new()
        .title("Timeline Entry Updated")
        .description(truncate(&entry_description(entry, true), DISCORD_EMBED_LIMIT))
        .colour(SUCCESS_COLOUR)
}

const TIMELINE_TITLE: &str = "Timeline Entries";
/// Kept free for the header line, which is written after the fields.
const TIMELINE_HEADER_RESERVE: usize = 100;

/// Header line and `(name, value)` fields for the timeline embed. Fields
/// stop once the next one would push the embed past Discord's total size.
pub fn timeline_fields(entries: &[TimelineEntry]) -> (String, Vec<(String, String)>) {
    let budget = DISCORD_EMBED_TOTAL_LIMIT - TIMELINE_TITLE.chars().count() - TIMELINE_HEADER_RESERVE;
    let mut used = 0;
    let mut fields = Vec::new();

    for entry in entries {
        let name = truncate(&entry_field_name(entry), 256);
        let value = if entry.description.trim().is_empty() {
            "-".to_string()
        } else {
            truncate(&entry.description, DISCORD_FIELD_LIMIT)
        };

        let size = name.chars().count() + value.chars().count();
        if used + size > budget {
            break;
        }
        used += size;
        fields.push((name, value));
    }

    let mut header = format!(
        "Showing the {} most recent timeline entries",
        fields.len()
    );
    let hidden = entries.len() - fields.len();
    if hidden > 0 {
        header.push_str(&format!(" ({} more did not fit)", hidden));
    }
    (header, fields)
}

pub fn timeline(entries: &[TimelineEntry]) -> CreateEmbed {
    let (header, fields) = timeline_fields(entries);
    CreateEmbed::new()
        .title(TIMELINE_TITLE)
        .description(header)
        .fields(fields.into_iter().map(|(name, value)| (name, value, false)))
        .colour(INFO_COLOUR)
}

/// Send `Error: {err}` visible only to the caller.
pub async fn send_error(ctx: &Context<'_>, err: impl std::fmt::Display) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(format!("Error: {}", err))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

pub async fn send_embed(ctx: &Context<'_>, embed: CreateEmbed) -> Result<(), Error> {
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> TimelineEntry {
        TimelineEntry {
            id: 7,
            date: "2024-01-02".to_string(),
            title: "Launch".to_string(),
            description: "v1.1 released".to_string(),
        }
    }

    #[test]
    fn test_status_description() {
        let status = StatusRecord {
            kind: "busy".to_string(),
            message: "in a meeting".to_string(),
        };
        assert_eq!(
            status_description(&status),
            "**Type:** busy\n**Message:** in a meeting"
        );
    }

    #[test]
    fn test_entry_formatting() {
        assert_eq!(entry_field_name(&entry()), "ID: 7 | 2024-01-02 - Launch");
        assert_eq!(
            entry_description(&entry(), true),
            "**ID:** 7\n**Date:** 2024-01-02\n**Title:** Launch\n**Description:** v1.1 released"
        );
        assert!(!entry_description(&entry(), false).contains("**ID:**"));
    }

    #[test]
    fn test_timeline_fits_embed_total_limit() {
        let entries: Vec<_> = (1..=6)
            .rev()
            .map(|id| TimelineEntry {
                id,
                date: "2024-01-01".to_string(),
                title: format!("Entry {id}"),
                description: "x".repeat(1000),
            })
            .collect();

        let (header, fields) = timeline_fields(&entries);
        let total = TIMELINE_TITLE.chars().count()
            + header.chars().count()
            + fields
                .iter()
                .map(|(n, v)| n.chars().count() + v.chars().count())
                .sum::<usize>();
        assert!(total <= DISCORD_EMBED_TOTAL_LIMIT, "embed length {total}");
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0].0, "ID: 6 | 2024-01-01 - Entry 6");
        assert_eq!(
            header,
            "Showing the 5 most recent timeline entries (1 more did not fit)"
        );
    }

    #[test]
    fn test_timeline_short_entries_all_shown() {
        let (header, fields) = timeline_fields(&[entry()]);
        assert_eq!(header, "Showing the 1 most recent timeline entries");
        assert_eq!(fields, vec![("ID: 7 | 2024-01-02 - Launch".to_string(), "v1.1 released".to_string())]);
    }

    #[test]
    fn test_truncate_respects_char_limit() {
        assert_eq!(truncate("short", 10), "short");
        let long = "é".repeat(20);
        let cut = truncate(&long, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with("..."));
    }
}
