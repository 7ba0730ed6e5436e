//! # Main Entry Point
//!
//! Wires the layers together:
//! - Domain: Configuration, Traits and Types
//! - Infrastructure: Matrix, LLM
//! - Application: Router, State, Confirmation Gate, Logging
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::Result;
use clap::Parser;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::SyncRoomMessageEvent,
    },
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::router::CommandRouter;
use crate::application::state::BotState;
use crate::domain::config::AppConfig;
use crate::domain::traits::{ChatProvider, LlmProvider};
use crate::infrastructure::llm::Client as LlmClient;
use crate::infrastructure::matrix::MatrixService;

#[derive(Parser, Debug)]
#[command(name = "bombocord", about = "Jamaican Patois dictionary and translation bot for Matrix")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "data/config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Configuration
    let args = Args::parse();
    let config = AppConfig::load(&args.config)?;

    // 2. Logging Setup
    let _guard = application::logging::init(&config.system.log_dir)?;
    tracing::info!("Starting Bombocord...");

    // 3. Initialize Application Components
    let state = Arc::new(BotState::load(&config.bot));
    let llm: Arc<dyn LlmProvider> = Arc::new(LlmClient::new(&config.llm)?);
    let router = Arc::new(CommandRouter::new(config.bot.clone(), state, llm));

    // 4. Matrix Setup
    let client = Client::builder()
        .homeserver_url(&config.services.matrix.homeserver)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(
            &config.services.matrix.username,
            &config.services.matrix.password,
        )
        .send()
        .await?;

    tracing::info!("Logged in as {}", config.services.matrix.username);

    if let Some(name) = &config.services.matrix.display_name {
        if let Err(e) = client.account().set_display_name(Some(name.as_str())).await {
            tracing::warn!("Failed to set display name: {}", e);
        }
    }

    // 5. Event Handlers
    let start_time = std::time::SystemTime::now();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let router = router.clone();

        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore events older than start_time
            let ts = ev.origin_server_ts();
            let event_time =
                std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            if original_msg.sender == room.own_user_id() {
                return;
            }

            let chat = MatrixService::new(room);
            let Some(message) = chat.inbound(original_msg).await else {
                return;
            };
            tracing::info!("Received message from {}: \n{}", message.sender, message.body);

            // Event handlers run one event at a time, so admission here follows arrival order.
            // Execution may wait on a confirmation that only a later event can answer,
            // so it must not hold up the sync loop.
            let admission = router.accept(&chat.room_id(), &message).await;
            tokio::spawn(async move {
                if let Err(e) = router.execute(&chat, &message, admission).await {
                    tracing::error!("Failed to route message: {}", e);
                }
            });
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            tracing::info!("Joining room {}", room.room_id());
            if let Err(e) = room.join().await {
                tracing::error!("Failed to join room {}: {}", room.room_id(), e);
            }
        }
    });

    // 6. Sync forever
    client.sync(SyncSettings::default()).await?;

    Ok(())
}
