use super::is_allowed;
use crate::reply::{self, send_embed, send_error};
use crate::{Context, Error};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum StatusType {
    #[name = "Online"]
    Online,
    #[name = "Offline"]
    Offline,
    #[name = "Busy"]
    Busy,
}

impl StatusType {
    /// Value written to the `type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Busy => "busy",
        }
    }
}

/// Status commands
#[poise::command(
    slash_command,
    subcommands("view", "set", "offline", "online", "busy"),
    subcommand_required
)]
pub async fn status(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// View current status
#[poise::command(slash_command)]
pub async fn view(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;

    match ctx.data().store.get_status().await {
        Ok(status) => send_embed(&ctx, reply::current_status(&status)).await,
        Err(e) => {
            error!("Status view failed: {}", e);
            send_error(&ctx, e).await
        }
    }
}

/// Set your status
#[poise::command(slash_command, check = "is_allowed")]
pub async fn set(
    ctx: Context<'_>,
    #[description = "Status type"] status_type: StatusType,
    #[description = "Status message"] message: String,
) -> Result<(), Error> {
    update_status(ctx, status_type, &message).await
}

/// Set status to offline with a message
#[poise::command(slash_command, check = "is_allowed")]
pub async fn offline(
    ctx: Context<'_>,
    #[description = "Status message"] message: String,
) -> Result<(), Error> {
    update_status(ctx, StatusType::Offline, &message).await
}

/// Set status to online with a message
#[poise::command(slash_command, check = "is_allowed")]
pub async fn online(
    ctx: Context<'_>,
    #[description = "Status message"] message: String,
) -> Result<(), Error> {
    update_status(ctx, StatusType::Online, &message).await
}

/// Set status to busy with a message
#[poise::command(slash_command, check = "is_allowed")]
pub async fn busy(
    ctx: Context<'_>,
    #[description = "Status message"] message: String,
) -> Result<(), Error> {
    update_status(ctx, StatusType::Busy, &message).await
}

async fn update_status(ctx: Context<'_>, status_type: StatusType, message: &str) -> Result<(), Error> {
    ctx.defer().await?;

    let message = message.trim();
    match ctx
        .data()
        .store
        .set_status(status_type.as_str(), message)
        .await
    {
        Ok(status) => {
            info!(
                "Status set to {} by {} ({})",
                status.kind,
                ctx.author().name,
                ctx.author().id
            );
            send_embed(&ctx, reply::status_updated(&status)).await
        }
        Err(e) => {
            error!("Status update failed: {}", e);
            send_error(&ctx, e).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_type_values() {
        assert_eq!(StatusType::Online.as_str(), "online");
        assert_eq!(StatusType::Offline.as_str(), "offline");
        assert_eq!(StatusType::Busy.as_str(), "busy");
    }
}
