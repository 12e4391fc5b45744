use crate::reply::NOT_AUTHORIZED;
use crate::{Context, Data, Error};
use tracing::warn;

pub mod status;
pub mod timeline;

/// Every slash command the bot registers.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![status::status(), timeline::timeline()]
}

/// Gate for write commands: the caller must be on the allow-list.
pub async fn is_allowed(ctx: Context<'_>) -> Result<bool, Error> {
    let user_id = ctx.author().id.get();
    if ctx.data().config.is_authorized(user_id) {
        return Ok(true);
    }

    warn!(
        "Rejected /{} from unauthorized user {} ({})",
        ctx.command().qualified_name,
        ctx.author().name,
        user_id
    );
    ctx.send(
        poise::CreateReply::default()
            .content(NOT_AUTHORIZED)
            .ephemeral(true),
    )
    .await?;
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_table() {
        let commands = all();
        let names: Vec<_> = commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["status", "timeline"]);

        let status = &commands[0];
        let subs: Vec<_> = status.subcommands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(subs, vec!["view", "set", "offline", "online", "busy"]);

        let timeline = &commands[1];
        let subs: Vec<_> = timeline
            .subcommands
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(subs, vec!["add", "view", "edit"]);
    }

    #[test]
    fn test_only_writes_are_gated() {
        for command in all() {
            for sub in &command.subcommands {
                let gated = !sub.checks.is_empty();
                let is_read = sub.name == "view";
                assert_eq!(
                    gated, !is_read,
                    "/{} {} has the wrong gate",
                    command.name, sub.name
                );
            }
        }
    }
}
