#[tokio::main]
async fn main() -> kyebot::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("kyebot=info,serenity=warn"),
    )
    .init();
    log::info!("Starting kyebot Discord bot");

    match kyebot::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {}", e);
            Err(e)
        }
    }
}
