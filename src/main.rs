use dotenvy::dotenv;
use mediapilot::bot::handlers::{self, Command};
use mediapilot::bot::Backends;
use mediapilot::backend::CatalogKind;
use mediapilot::config::Settings;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Load .env file
    dotenv().ok();

    init_logging();

    info!("Starting MediaPilot Bot...");

    // Fail fast on missing/placeholder credentials: the bot never starts.
    let settings = init_settings();
    let backends = Arc::new(Backends::from_settings(&settings));

    let bot = Bot::new(settings.telegram_bot_token.clone());
    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![backends])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_settings() -> Settings {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handle_callback))
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    backends: Arc<Backends>,
) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start => handlers::start(bot, msg).await,
        Command::Help => handlers::help(bot, msg).await,
        Command::Status => handlers::status(bot, msg, backends).await,
        Command::Search(query) => {
            handlers::search(bot, msg, backends, CatalogKind::Movie, query).await
        }
        Command::Series(query) => {
            handlers::search(bot, msg, backends, CatalogKind::Series, query).await
        }
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    backends: Arc<Backends>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::callback(bot, q, backends).await {
        error!("Callback handler error: {}", e);
    }
    respond(())
}
