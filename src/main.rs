use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use teloxide::prelude::*;
use tokio::sync::Mutex;

mod admin;
mod broadcast;
mod keyboard;
mod markup;
mod messenger;
mod router;
mod store;
mod tree;


use crate::admin::{CreateOutcome, ModifyOutcome};
use crate::broadcast::{broadcast, resync_all, send_top_menu};
use crate::keyboard::{project, Keyboard, BACK_CAPTION, DEFAULT_GROUP_SIZE};
use crate::messenger::{Messenger, SendOptions, TelegramMessenger};
use crate::router::{handle_update, InboundEvent};
use crate::store::{FileStore, TreeStore};
use crate::tree::{
    contains_top_level, delete_by_id, find_by_id, find_by_text, insert, next_id, update_by_id,
    ButtonNode, ButtonPatch,
};

#[derive(Debug, Deserialize, Clone)]
struct Config {
    token: String,
    #[serde(default)]
    admin_ids: Vec<i64>,
    data_dir: PathBuf,
    group_size: Option<usize>,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the bot (default).
    Serve,
    /// Print the top-level button tree as JSON.
    List,
    /// Print one button, searched at any depth.
    Show { id: String },
    /// Create a button at the top level or under --parent.
    Add {
        #[arg(long)]
        text: String,
        #[arg(long)]
        response: String,
        #[arg(long)]
        parent: Option<String>,
    },
    /// Replace text and response of a top-level button.
    Edit {
        id: String,
        #[arg(long)]
        text: String,
        #[arg(long)]
        response: String,
    },
    /// Delete a top-level button.
    Remove { id: String },
    /// Report whether a chat id is on the admin list.
    CheckAdmin { chat_id: i64 },
}

struct AppState {
    store: TreeStore,
    messenger: Arc<dyn Messenger>,
    admin_ids: Vec<i64>,
    group_size: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = load_config(&args.config)?;
    fs::create_dir_all(&config.data_dir).context("create data_dir")?;

    let kv = FileStore::open(config.data_dir.join("kv.json"))?;
    let bot = Bot::new(config.token.clone());
    let state = Arc::new(AppState {
        store: TreeStore::new(Arc::new(kv)),
        messenger: Arc::new(TelegramMessenger::new(bot.clone())),
        admin_ids: config.admin_ids.clone(),
        group_size: config.group_size.unwrap_or(DEFAULT_GROUP_SIZE),
    });

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(bot, state).await,
        command => run_admin_command(&state, command).await,
    }
}

async fn serve(bot: Bot, state: Arc<AppState>) -> Result<()> {
    info!("starting menu bot");
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(msg: Message, state: Arc<AppState>) -> Result<()> {
    let text = match msg.text() {
        Some(text) => text.to_string(),
        None => return Ok(()),
    };
    let event = InboundEvent::Text {
        chat_id: msg.chat.id.0,
        text,
    };
    handle_update(&state, event).await
}

async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> Result<()> {
    let Some(data) = q.data.clone() else {
        return Ok(());
    };
    let chat_id = callback_chat_id(q.message.as_ref().map(|m| m.chat.id.0), q.from.id.0)?;
    let event = InboundEvent::Callback {
        callback_id: q.id.clone(),
        chat_id,
        data,
    };
    handle_update(&state, event).await
}

/// Chat of the message carrying the button, or the sender's private chat.
fn callback_chat_id(message_chat: Option<i64>, user_id: u64) -> Result<i64> {
    match message_chat {
        Some(chat_id) => Ok(chat_id),
        None => i64::try_from(user_id)
            .map_err(|_| anyhow!("user id {} out of chat id range", user_id)),
    }
}

async fn run_admin_command(state: &AppState, command: Command) -> Result<()> {
    match command {
        Command::Serve => return Err(anyhow!("serve is not an admin command")),
        Command::List => {
            let tree = admin::list_buttons(state).await?;
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
        Command::Show { id } => match admin::get_button(state, &id).await? {
            Some(node) => println!("{}", serde_json::to_string_pretty(&node)?),
            None => println!("Not Found"),
        },
        Command::Add {
            text,
            response,
            parent,
        } => match admin::create_button(state, &text, &response, parent.as_deref()).await? {
            CreateOutcome::Created(node) => println!("{}", serde_json::to_string_pretty(&node)?),
            CreateOutcome::ParentNotFound => println!("Parent not found"),
        },
        Command::Edit { id, text, response } => {
            report_modify(admin::update_button(state, &id, &text, &response).await?)
        }
        Command::Remove { id } => report_modify(admin::delete_button(state, &id).await?),
        Command::CheckAdmin { chat_id } => {
            println!("{}", is_admin(chat_id, &state.admin_ids));
        }
    }
    Ok(())
}

fn report_modify(outcome: ModifyOutcome) {
    match outcome {
        ModifyOutcome::Applied => println!("Done"),
        ModifyOutcome::NotFound => println!("Not Found"),
    }
}

fn is_admin(chat_id: i64, admin_ids: &[i64]) -> bool {
    admin_ids.contains(&chat_id)
}

fn load_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let config: Config = toml::from_str(&contents).context("parse config")?;
    if config.group_size == Some(0) {
        return Err(anyhow!("group_size must be at least 1"));
    }
    Ok(config)
}
