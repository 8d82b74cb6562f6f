use std::sync::Arc;

use serenity::all::{Client, GatewayIntents, GuildId, UserId};
use serenity::prelude::TypeMapKey;
use songbird::{SerenityInit, Songbird};

use crate::bot::handler::Handler;
use crate::config::Config;
use crate::data::discord::CacheVoiceDirectory;
use crate::data::voice::SongbirdTransport;
use crate::error::AppError;
use crate::service::notify::AdminNotifier;
use crate::service::voice::backoff::BackoffPolicy;
use crate::service::voice::StickyVoiceService;

/// Client data key under which event handlers find the sticky voice service.
pub struct StickyVoiceKey;

impl TypeMapKey for StickyVoiceKey {
    type Value = StickyVoiceService;
}

/// Initializes the Discord bot client and the sticky voice service.
///
/// Registers the songbird voice manager with the client, builds the service
/// over the client's cache and HTTP client, and stores it in the client data
/// so event handlers can reach it.
///
/// # Arguments
/// - `config` - Application configuration
///
/// # Returns
/// - `Ok((Client, StickyVoiceService))` - Client ready to start and the service it uses
/// - `Err(AppError)` - Client construction failed
pub async fn init_bot(config: &Config) -> Result<(Client, StickyVoiceService), AppError> {
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_VOICE_STATES;

    let handler = Handler::new(config.guild_id.map(GuildId::new));
    let voice_manager = Songbird::serenity();

    let client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(handler)
        .register_songbird_with(voice_manager.clone())
        .await?;

    let service = StickyVoiceService::new(
        Arc::new(CacheVoiceDirectory::new(
            client.cache.clone(),
            client.http.clone(),
        )),
        Arc::new(SongbirdTransport::new(voice_manager)),
        Arc::new(AdminNotifier::new(
            client.http.clone(),
            config.admin_user_id.map(UserId::new),
            config.error_log_path.clone(),
        )),
        BackoffPolicy::from_config(config),
    );

    client
        .data
        .write()
        .await
        .insert::<StickyVoiceKey>(service.clone());

    Ok((client, service))
}

/// Starts the Discord bot in a blocking manner
///
/// Runs until the gateway connection shuts down.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
