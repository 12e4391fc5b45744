use poise::serenity_prelude as serenity;
use statusboard::{commands, config::Config, db, Data};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let discord_token = config.discord_token.clone();
    if config.allowed_user_ids.is_empty() {
        warn!("ALLOWED_USER_IDS is empty: status and timeline writes are disabled");
    }

    let store = db::open_store(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open database: {:?}", e))?;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("{} has connected to Discord!", ready.user.name);

                let commands = &framework.options().commands;
                match config.dev_guild_id {
                    Some(guild_id) => {
                        let guild = serenity::GuildId::new(guild_id);
                        poise::builtins::register_in_guild(ctx, commands, guild).await?;
                        info!("Registered slash commands in guild {}", guild_id);
                    }
                    None => {
                        poise::builtins::register_globally(ctx, commands).await?;
                        info!("Registered slash commands globally");
                    }
                }

                Ok(Data { config, store })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    let mut client = serenity::ClientBuilder::new(&discord_token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    info!("Starting bot...");
    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    Ok(())
}
