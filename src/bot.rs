//! Discord bot core logic and event handling.

use std::time::Duration;

use log::{debug, error, info};
use poise::{
    Framework, FrameworkOptions,
    serenity_prelude::{ClientBuilder, Context, FullEvent, GatewayIntents},
};

use crate::chatbot::handle_message;
use crate::config::{Config, ModelDefaults};
use crate::error::Result;
use crate::gemini::GeminiClient;
use crate::user_state::{InMemoryUserStore, UserStateStore};

/// Shared state handed to every event.
pub struct Data {
    gemini_client: GeminiClient,
    user_store: Box<dyn UserStateStore>,
    models: ModelDefaults,
    request_timeout: Duration,
}

impl Data {
    pub fn new(config: &Config, user_store: Box<dyn UserStateStore>) -> Self {
        Self {
            gemini_client: GeminiClient::new(
                config.gemini_api_key.clone(),
                config.gemini_api_base_url.clone(),
            ),
            user_store,
            models: config.models.clone(),
            request_timeout: config.request_timeout,
        }
    }

    pub fn gemini_client(&self) -> &GeminiClient {
        &self.gemini_client
    }

    pub fn user_store(&self) -> &dyn UserStateStore {
        self.user_store.as_ref()
    }

    pub fn models(&self) -> &ModelDefaults {
        &self.models
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// Run the Discord bot.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    debug!("Initializing Gemini client");
    let data = Data::new(&config, Box::new(InMemoryUserStore::new()));

    debug!("Setting up gateway intents");
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            event_handler: |ctx, event, _framework, data| Box::pin(event_handler(ctx, event, data)),
            ..Default::default()
        })
        .setup(move |_ctx, ready, _framework| {
            Box::pin(async move {
                info!("Bot {} is ready and connected to Discord", ready.user.name);
                Ok(data)
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(config.discord_token, intents)
        .framework(framework)
        .await?;

    info!("Starting Discord client");

    tokio::select! {
        result = client.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}

// serenity runs each event on its own task, so a slow Gemini call only holds
// up the message that triggered it.
async fn event_handler(ctx: &Context, event: &FullEvent, data: &Data) -> Result<()> {
    if let FullEvent::Message { new_message } = event {
        let bot_user_id = ctx.cache.current_user().id;
        if let Err(e) = handle_message(ctx, new_message, data, bot_user_id).await {
            error!(
                "Error processing message from {}: {}",
                new_message.author.tag(),
                e
            );
        }
    }
    Ok(())
}
