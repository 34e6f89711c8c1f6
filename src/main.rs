mod bot;
mod core;
mod infrastructure;

use crate::bot::delivery;
use crate::bot::dialogue::{dialogue_for, Dialogue, InMemStorage};
use crate::core::dialogue::{Input, ReservationDialogue, Session};
use crate::core::record::Participant;
use crate::infrastructure::config::Config;
use crate::infrastructure::health;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::registry::JsonFileRegistry;
use anyhow::anyhow;
use dotenv::dotenv;
use std::sync::Arc;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::UserId;
use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
enum Command {
    #[command(description = "Offer a class or take one.")]
    Start,
    #[command(description = "Cancel the current operation.")]
    Cancel,
}

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type Desk = Arc<ReservationDialogue<JsonFileRegistry>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let _guard = init_logging();

    let config = Config::from_env().map_err(|e| {
        log::error!("Refusing to start: {}", e);
        e
    })?;
    log::info!("Starting bot...");

    let port = config.port;
    tokio::spawn(async move {
        if let Err(e) = health::serve(port).await {
            log::error!("Health check server stopped: {:?}", e);
        }
    });

    let bot = Bot::new(&config.token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Failed to set commands: {:?}", e);
    }

    let registry = JsonFileRegistry::new(config.classes_file.clone());
    let desk: Desk = Arc::new(ReservationDialogue::new(registry, config.fields));
    log::info!(
        "Using registry {} with {:?} fields",
        desk.store().path().display(),
        desk.fields()
    );
    if config.admin_chat.is_none() {
        log::info!("ADMIN_CHAT_ID not set, reservations will not be forwarded.");
    }

    let handler = Update::filter_message()
        .filter_map(|msg: Message| msg.from().map(|user| user.id))
        .map(|user_id: UserId, storage: Arc<InMemStorage<Session>>| dialogue_for(storage, user_id))
        .branch(dptree::entry().filter_command::<Command>().endpoint(command_handler))
        .branch(dptree::entry().endpoint(message_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<Session>::new(), desk, Arc::new(config)])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn command_handler(
    bot: Bot,
    dialogue: Dialogue,
    msg: Message,
    cmd: Command,
    desk: Desk,
    config: Arc<Config>,
) -> HandlerResult {
    let input = match cmd {
        Command::Start => Input::Start,
        Command::Cancel => Input::Cancel,
    };
    advance(&bot, &dialogue, &msg, input, desk, &config).await
}

async fn message_handler(
    bot: Bot,
    dialogue: Dialogue,
    msg: Message,
    desk: Desk,
    config: Arc<Config>,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        log::debug!("Ignoring non-text message in chat {}", msg.chat.id);
        return Ok(());
    };

    if text.starts_with('/') {
        bot.send_message(msg.chat.id, "ℹ️ Please use /start or /cancel.").await?;
        return Ok(());
    }

    let input = Input::Text(text.to_string());
    advance(&bot, &dialogue, &msg, input, desk, &config).await
}

async fn advance(
    bot: &Bot,
    dialogue: &Dialogue,
    msg: &Message,
    input: Input,
    desk: Desk,
    config: &Config,
) -> HandlerResult {
    let user = msg.from().ok_or_else(|| anyhow!("Message has no sender"))?;
    let participant = Participant {
        id: user.id.0,
        username: user.username.clone(),
    };
    let session = dialogue.get().await?.unwrap_or_default();

    let fields = desk.fields();
    let outcome =
        tokio::task::spawn_blocking(move || desk.handle(session, &participant, input)).await?;

    if outcome.next == Session::Idle {
        dialogue.exit().await?;
    } else {
        dialogue.update(outcome.next).await?;
    }

    let deliveries = delivery::plan(
        msg.chat.id,
        outcome.replies,
        outcome.reservation.as_ref(),
        config.admin_chat,
        fields,
    );
    delivery::send_all(bot, deliveries).await;

    Ok(())
}
