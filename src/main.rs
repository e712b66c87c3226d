mod commands;
mod config;
mod constants;
mod handlers;
mod models;
mod services;
#[cfg(test)]
mod testing;
mod utils;

use poise::serenity_prelude as serenity;
use songbird::SerenityInit;
use tracing::{error, info};

use crate::{
    commands::{joinvc, leavevc, msg, msgimg, register},
    config::Config,
    constants::{COMMAND_PREFIX, LOG_DIRECTIVE},
    handlers::{handle_message, handle_ready},
    models::{Data, Error},
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    initialize_logging();

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let data = Data::new(config.relay);

    // Create and start the bot
    if let Err(e) = start_bot(config.discord_token, data, config.dev_guild_id).await {
        error!("Bot error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize the logging system
fn initialize_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(LOG_DIRECTIVE.parse().expect("valid log directive")),
        )
        .init();
}

/// Register slash commands, logging instead of failing startup
async fn register_commands(
    ctx: &serenity::Context,
    framework: &poise::Framework<Data, Error>,
    dev_guild_id: Option<serenity::GuildId>,
) {
    let commands = &framework.options().commands;
    let result = match dev_guild_id {
        Some(guild_id) => {
            info!("Registering commands in development guild: {}", guild_id);
            poise::builtins::register_in_guild(ctx, commands, guild_id).await
        }
        None => {
            info!("Registering commands globally (may take up to 1 hour)");
            poise::builtins::register_globally(ctx, commands).await
        }
    };

    match result {
        Ok(()) => info!("Slash commands registered"),
        Err(e) => error!("Failed to register slash commands: {}", e),
    }
}

/// Create and start the Discord bot
async fn start_bot(
    token: String,
    data: Data,
    dev_guild_id: Option<serenity::GuildId>,
) -> Result<(), Error> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![joinvc(), leavevc(), msg(), msgimg(), register()],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(COMMAND_PREFIX.to_string()),
                ..Default::default()
            },
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    if let serenity::FullEvent::Message { new_message } = event {
                        handle_message(ctx, new_message, data).await;
                    }
                    Ok(())
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                handle_ready(ready, &data);
                register_commands(ctx, framework, dev_guild_id).await;

                info!("Bot is ready!");
                Ok(data)
            })
        })
        .build();

    // Create client with required intents
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .register_songbird()
        .await?;

    // Start the bot
    info!("Starting bot...");
    client.start().await?;

    Ok(())
}
