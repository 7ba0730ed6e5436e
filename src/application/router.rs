//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in `interface/commands`).
//!
//! Routing is split in two halves. `accept` runs in arrival order: the message is offered
//! to the confirmation gate, parsed, and metered commands are admitted by their rate
//! limiter. `execute` may then run on its own task, since it can wait on the provider or on
//! a confirmation. Every handler failure is turned into a reply in `execute`; only
//! transport errors are returned to the caller.

use anyhow::{Result, anyhow};
use std::sync::Arc;

use crate::application::error::{CommandError, CommandResult};
use crate::application::parsing;
use crate::application::state::{BotState, Metered};
use crate::domain::config::BotConfig;
use crate::domain::traits::{ChatProvider, LlmProvider};
use crate::domain::types::{Command, InboundMessage};
use crate::interface::commands::{self, Reply};

/// What the ordered half of routing decided for a message.
pub enum Admission {
    /// Answered a pending confirmation, or was not addressed to the bot.
    Handled,
    Rejected(CommandError),
    Dispatch(Command),
}

fn metered(command: &Command) -> Option<Metered> {
    match command {
        Command::Translate { .. } => Some(Metered::Translate),
        Command::Talk { .. } => Some(Metered::Talk),
        Command::Random => Some(Metered::Random),
        _ => None,
    }
}

pub struct CommandRouter {
    config: BotConfig,
    state: Arc<BotState>,
    llm: Arc<dyn LlmProvider>,
}

impl CommandRouter {
    pub fn new(config: BotConfig, state: Arc<BotState>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { config, state, llm }
    }

    /// The order-sensitive half. Callers must invoke it for one message at a time, in
    /// the order messages arrive.
    pub async fn accept(&self, room_id: &str, message: &InboundMessage) -> Admission {
        if self
            .state
            .confirmations
            .offer(&message.sender, room_id, &message.body)
        {
            return Admission::Handled;
        }

        let reply_to = message.reply_to.as_ref();
        let command = match parsing::parse(&message.body, &self.config.prefix, reply_to) {
            Ok(Some(command)) => command,
            Ok(None) => return Admission::Handled,
            Err(e) => return Admission::Rejected(e),
        };

        if let Some(kind) = metered(&command)
            && let Err(e) = self.state.limiters.admit(kind, &message.sender).await
        {
            return Admission::Rejected(e);
        }

        tracing::info!(
            "Router dispatching cmd='{}' sender='{}' room='{}'",
            command.name(),
            message.sender,
            room_id
        );
        Admission::Dispatch(command)
    }

    /// Runs the handler chosen by `accept` and posts its reply or error.
    pub async fn execute<C>(
        &self,
        chat: &C,
        message: &InboundMessage,
        admission: Admission,
    ) -> Result<()>
    where
        C: ChatProvider,
    {
        match admission {
            Admission::Handled => Ok(()),
            Admission::Rejected(e) => self.send_error(chat, &message.sender, e).await,
            Admission::Dispatch(command) => match self.dispatch(chat, message, command).await {
                Ok(reply) => send_reply(chat, &reply).await,
                Err(e) => self.send_error(chat, &message.sender, e).await,
            },
        }
    }

    async fn dispatch<C>(
        &self,
        chat: &C,
        message: &InboundMessage,
        command: Command,
    ) -> CommandResult<Reply>
    where
        C: ChatProvider,
    {
        let sender = message.sender.as_str();
        let parent = message.reply_to.as_ref().map(|r| r.event_id.as_str());
        let state = self.state.as_ref();

        match command {
            Command::Lookup { key } => commands::dictionary::handle_lookup(state, &key, parent).await,
            Command::List => commands::dictionary::handle_list(state).await,
            Command::Random => commands::dictionary::handle_random(state, parent).await,
            Command::Add { key, value } => {
                commands::admin::handle_add(&self.config, state, sender, &key, &value).await
            }
            Command::Remove { key } => {
                commands::admin::handle_remove(&self.config, state, chat, sender, &key).await
            }
            Command::Edit { key, value } => {
                commands::admin::handle_edit(&self.config, state, chat, sender, &key, &value)
                    .await
            }
            Command::Translate { text } => {
                commands::translate::handle_translate(&self.llm, chat, &text).await
            }
            Command::Talk {
                text,
                quoted,
                language,
            } => {
                commands::translate::handle_talk(
                    state,
                    &self.llm,
                    chat,
                    sender,
                    &text,
                    quoted.as_deref(),
                    language,
                )
                .await
            }
            Command::Help => Ok(commands::help::handle_help(&self.config)),
        }
    }

    async fn send_error<C>(&self, chat: &C, sender: &str, error: CommandError) -> Result<()>
    where
        C: ChatProvider,
    {
        if error.is_internal() {
            tracing::error!("Command from {} failed: {}", sender, error);
        } else {
            tracing::debug!("Command from {} rejected: {}", sender, error);
        }
        chat.send_message(&error.user_message())
            .await
            .map(|_| ())
            .map_err(|e| anyhow!(e))
    }
}

async fn send_reply<C>(chat: &C, reply: &Reply) -> Result<()>
where
    C: ChatProvider,
{
    tracing::debug!("Sending reply ({} chars)", reply.text().len());
    match reply {
        Reply::Text(text) => chat.send_message(text).await.map(|_| ()).map_err(|e| anyhow!(e)),
        Reply::Threaded { in_reply_to, text } => {
            if let Err(e) = chat.send_reply(in_reply_to, text).await {
                // Parent may be gone or unreadable; fall back to the room
                tracing::error!("Error replying to message {}: {}", in_reply_to, e);
                chat.send_message(text).await.map_err(|e| anyhow!(e))?;
            }
            Ok(())
        }
    }
}
