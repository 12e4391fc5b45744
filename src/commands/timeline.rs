use super::is_allowed;
use crate::db::{DEFAULT_TIMELINE_LIMIT, MAX_TIMELINE_LIMIT};
use crate::reply::{self, send_embed, send_error, NO_TIMELINE_ENTRIES};
use crate::{Context, Error};
use tracing::{error, info};

/// Timeline commands
#[poise::command(
    slash_command,
    subcommands("add", "view", "edit"),
    subcommand_required
)]
pub async fn timeline(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Add a new timeline entry
#[poise::command(slash_command, check = "is_allowed")]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Date of the entry"] date: String,
    #[description = "Entry title"] title: String,
    #[description = "Entry description"] description: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    match ctx
        .data()
        .store
        .add_timeline_entry(&date, &title, &description)
        .await
    {
        Ok(entry) => {
            info!("Timeline entry {} added by {}", entry.id, ctx.author().name);
            send_embed(&ctx, reply::entry_added(&entry)).await
        }
        Err(e) => {
            error!("Timeline add failed: {}", e);
            send_error(&ctx, e).await
        }
    }
}

/// View recent timeline entries
#[poise::command(slash_command)]
pub async fn view(
    ctx: Context<'_>,
    #[description = "Number of entries to show (default 5)"]
    #[min = 1]
    #[max = 25]
    limit: Option<i64>,
) -> Result<(), Error> {
    ctx.defer().await?;

    let limit = limit.unwrap_or(DEFAULT_TIMELINE_LIMIT).min(MAX_TIMELINE_LIMIT);
    match ctx.data().store.get_timeline_entries(limit).await {
        Ok(entries) if entries.is_empty() => {
            ctx.say(NO_TIMELINE_ENTRIES).await?;
            Ok(())
        }
        Ok(entries) => send_embed(&ctx, reply::timeline(&entries)).await,
        Err(e) => {
            error!("Timeline view failed: {}", e);
            send_error(&ctx, e).await
        }
    }
}

/// Edit an existing timeline entry
#[poise::command(slash_command, check = "is_allowed")]
pub async fn edit(
    ctx: Context<'_>,
    #[description = "ID of the entry to edit"] entry_id: i32,
    #[description = "New date"] date: String,
    #[description = "New title"] title: String,
    #[description = "New description"] description: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    match ctx
        .data()
        .store
        .edit_timeline_entry(entry_id, &date, &title, &description)
        .await
    {
        Ok(entry) => {
            info!("Timeline entry {} edited by {}", entry.id, ctx.author().name);
            send_embed(&ctx, reply::entry_updated(&entry)).await
        }
        Err(e) => {
            error!("Timeline edit of {} failed: {}", entry_id, e);
            send_error(&ctx, e).await
        }
    }
}
