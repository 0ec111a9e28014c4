//! DevRelay server binary.
//!
//! Start the relay with:
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx AUTHORIZED_CHAT_IDS=123456 cargo run -p devrelay-api
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use devrelay_api::{serve, ApiConfig, AppState};
use devrelay_core::RelayConfig;
use devrelay_telegram::{MessagingGateway, TelegramGateway};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// How long in-flight follow-ups may run after shutdown begins.
const FOLLOW_UP_GRACE: Duration = Duration::from_secs(3);

/// DevRelay - relay device commands between a dashboard and a Telegram bot
#[derive(Parser, Debug)]
#[command(name = "devrelay")]
#[command(about = "Relay device commands between a web dashboard, a Telegram bot and browser reporters")]
struct Args {
    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    bot_token: Option<String>,

    /// Comma-separated chat ids allowed to issue commands
    #[arg(long, env = "AUTHORIZED_CHAT_IDS", default_value = "")]
    authorized_chat_ids: String,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "30000")]
    port: u16,

    /// Public base URL; when set the webhook is registered on startup
    #[arg(long, env = "PUBLIC_URL")]
    public_url: Option<String>,

    /// Bot API base URL override
    #[arg(long, env = "TELEGRAM_API_URL")]
    telegram_api_url: Option<String>,

    /// Timeout for each Bot API request, in seconds
    #[arg(long, env = "GATEWAY_TIMEOUT_SECS", default_value = "10")]
    gateway_timeout_secs: u64,

    /// Allowed CORS origins (comma-separated, `*` for any)
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    cors_origins: Vec<String>,

    /// Do not reply to chats outside the allow-list
    #[arg(long)]
    silent_rejections: bool,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env.local or .env before clap reads the environment
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let args = Args::parse();

    let filter = match args.verbose {
        0 => "devrelay=info,devrelay_api=info,devrelay_telegram=info,devrelay_core=info,tower_http=warn",
        1 => "devrelay=debug,devrelay_api=debug,devrelay_telegram=debug,devrelay_core=debug,tower_http=info",
        2 => "devrelay=trace,devrelay_api=trace,devrelay_telegram=trace,devrelay_core=trace,tower_http=debug,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(filter))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let relay = build_relay_config(&args).map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;

    if relay.guard.is_empty() {
        warn!("AUTHORIZED_CHAT_IDS is empty; every chat will be rejected");
    }
    info!(
        token = %relay.masked_token(),
        authorized_chats = relay.guard.len(),
        silent_rejections = !relay.notify_unauthorized,
        "Relay configured"
    );

    let gateway = TelegramGateway::from_config(&relay)?;
    tokio::spawn(announce(gateway.clone(), relay.webhook_url()));

    let config = ApiConfig::new(&args.host, args.port).with_cors_origins(args.cors_origins.clone());
    let state = AppState::new(config.clone(), relay, Arc::new(gateway));
    let scheduler = Arc::clone(&state.scheduler);

    println!("\n[relay] DevRelay");
    println!("   Listening: http://{}", config.bind_address());
    println!("   Press Ctrl+C to stop\n");

    serve(config, state, shutdown_signal()).await?;

    if !scheduler.shutdown(FOLLOW_UP_GRACE).await {
        warn!("Exiting with follow-ups still in flight");
    }
    info!("Relay stopped");
    Ok(())
}

fn build_relay_config(args: &Args) -> devrelay_core::Result<RelayConfig> {
    let mut config = RelayConfig::new(args.bot_token.clone())?
        .with_authorized_list(&args.authorized_chat_ids)
        .with_gateway_timeout(Duration::from_secs(args.gateway_timeout_secs))
        .with_notify_unauthorized(!args.silent_rejections);

    // Hosting platforms export the deployment host without a scheme
    let public_url = args
        .public_url
        .clone()
        .or_else(|| std::env::var("VERCEL_URL").ok())
        .filter(|url| !url.trim().is_empty());
    if let Some(url) = public_url {
        config = config.with_public_url(&url)?;
    }

    if let Some(url) = args.telegram_api_url.as_deref().filter(|url| !url.trim().is_empty()) {
        config = config.with_telegram_api_url(url)?;
    }

    Ok(config)
}

/// Validate the token and register the webhook without delaying startup.
async fn announce(gateway: TelegramGateway, webhook_url: Option<String>) {
    match gateway.username().await {
        Ok(username) => info!(username = %username, "Bot initialized successfully"),
        Err(e) => warn!(error = %e, "Failed to get bot info"),
    }

    let Some(url) = webhook_url else {
        info!("PUBLIC_URL not set; webhook left unchanged");
        return;
    };
    match gateway.set_webhook(&url).await {
        Ok(_) => info!(url = %url, "Webhook registered"),
        Err(e) => error!(url = %url, error = %e, "Failed to register webhook"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to set up SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received shutdown signal"),
        _ = terminate => info!("Received SIGTERM signal"),
    }
}
