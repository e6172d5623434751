use bike_shop_buddy::{
    bot::{self, BotData},
    config::{database, secrets, shop},
    errors::Result,
    mail::HttpMailer,
};
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Shop settings
    let shop_config = shop::load_default_config()
        .inspect_err(|e| error!("Failed to load shop configuration: {e}"))?;
    info!("Loaded configuration for '{}'", shop_config.shop.name);

    // 4. Database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;

    // 5. Mail client, only when an endpoint is configured
    let mailer = match &shop_config.mail.endpoint {
        Some(endpoint) => {
            let api_key = secrets::mail_api_key();
            if api_key.is_none() {
                warn!("MAIL_API_KEY is not set; mail requests will be unauthenticated");
            }
            Some(HttpMailer::new(endpoint.clone(), api_key)?)
        }
        None => {
            info!("No mail endpoint configured; mail commands are disabled");
            None
        }
    };

    // 6. Run the bot
    let token = secrets::discord_token()
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))?;
    bot::run(&token, BotData::new(db, shop_config, mailer)).await
}
