use super::*;

const MENU_DECORATION: &str = " 📁";
const CALLBACK_ACK: &str = "Success!";

/// Updates the bot reacts to, already stripped of transport detail.
#[derive(Clone, Debug)]
pub(super) enum InboundEvent {
    Callback {
        callback_id: String,
        chat_id: i64,
        data: String,
    },
    Text {
        chat_id: i64,
        text: String,
    },
}

impl InboundEvent {
    pub(super) fn chat_id(&self) -> i64 {
        match self {
            InboundEvent::Callback { chat_id, .. } | InboundEvent::Text { chat_id, .. } => *chat_id,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Action<'a> {
    Select {
        node: &'a ButtonNode,
        callback_id: Option<&'a str>,
    },
    /// Callback whose data names no node; still needs an answer.
    StaleCallback { callback_id: &'a str },
    Back,
    Menu { start: bool },
    Save(&'a str),
    Get,
    Update(&'a str),
    Delete,
    Broadcast(&'a str),
    Unknown(&'a str),
}

pub(super) fn classify<'a>(
    event: &'a InboundEvent,
    tree: &'a [ButtonNode],
    admin_ids: &[i64],
) -> Action<'a> {
    let (chat_id, text) = match event {
        InboundEvent::Callback {
            callback_id, data, ..
        } => {
            return match find_by_id(tree, data) {
                Some(node) => Action::Select {
                    node,
                    callback_id: Some(callback_id.as_str()),
                },
                None => Action::StaleCallback {
                    callback_id: callback_id.as_str(),
                },
            };
        }
        InboundEvent::Text { chat_id, text } => (*chat_id, text.trim()),
    };

    let label = text.strip_suffix(MENU_DECORATION).unwrap_or(text);
    if let Some(node) = find_by_text(tree, label) {
        return Action::Select {
            node,
            callback_id: None,
        };
    }

    if text == BACK_CAPTION {
        return Action::Back;
    }

    let Some(cmd) = parse_command(text) else {
        return Action::Unknown(text);
    };
    let rest = command_argument(text);
    match cmd.to_lowercase().as_str() {
        "start" => Action::Menu { start: true },
        "menu" | "refresh" => Action::Menu { start: false },
        "save" => Action::Save(rest),
        "get" => Action::Get,
        "update" => Action::Update(rest),
        "delete" => Action::Delete,
        "broadcast" if is_admin(chat_id, admin_ids) => Action::Broadcast(rest),
        _ => Action::Unknown(text),
    }
}

pub(super) async fn handle_update(state: &AppState, event: InboundEvent) -> Result<()> {
    debug!("Update received: {:?}", event);
    let chat_id = event.chat_id();
    let tree = state.store.load_tree().await?;

    match classify(&event, &tree, &state.admin_ids) {
        Action::Select { node, callback_id } => {
            let sent = send_selection(state, chat_id, node).await;
            if let Some(callback_id) = callback_id {
                state
                    .messenger
                    .answer_callback(callback_id, CALLBACK_ACK)
                    .await?;
            }
            sent?;
        }
        Action::StaleCallback { callback_id } => {
            state.messenger.answer_callback(callback_id, "").await?;
        }
        Action::Back => {
            send_top_menu(state, chat_id, &tree).await?;
        }
        Action::Menu { start } => {
            send_top_menu(state, chat_id, &tree).await?;
            if start {
                state.store.mark_started(chat_id).await?;
            }
        }
        Action::Save(data) => {
            state.store.put_user_data(chat_id, data).await?;
            send_text(state, chat_id, "Data saved.").await?;
        }
        Action::Get => {
            let reply = match state.store.get_user_data(chat_id).await? {
                Some(data) => format!("Saved Data: {}", data),
                None => "No saved data.".to_string(),
            };
            send_text(state, chat_id, &reply).await?;
        }
        Action::Update(data) => {
            state.store.put_user_data(chat_id, data).await?;
            send_text(state, chat_id, "Data updated.").await?;
        }
        Action::Delete => {
            state.store.delete_user_data(chat_id).await?;
            send_text(state, chat_id, "Data deleted.").await?;
        }
        Action::Broadcast(text) => {
            if text.is_empty() {
                send_text(state, chat_id, "Provide text to broadcast.").await?;
            } else {
                broadcast(state, text).await?;
                send_text(state, chat_id, "Broadcast sent!").await?;
            }
        }
        Action::Unknown(text) => {
            send_text(state, chat_id, &format!("Unknown command: {}", text)).await?;
        }
    }

    Ok(())
}

/// Submenu keyboard (when the node has children), then the node's own response.
async fn send_selection(state: &AppState, chat_id: i64, node: &ButtonNode) -> Result<()> {
    if node.has_children() {
        let keyboard = project(&node.sub_buttons, state.group_size, true);
        state
            .messenger
            .send_message(
                chat_id,
                &format!("{}:", node.text),
                SendOptions::keyboard(keyboard),
            )
            .await?;
    }
    state
        .messenger
        .send_message(chat_id, &node.response, SendOptions::html())
        .await
}

async fn send_text(state: &AppState, chat_id: i64, text: &str) -> Result<()> {
    state
        .messenger
        .send_message(chat_id, text, SendOptions::default())
        .await
}

fn parse_command(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    let cmd = first.trim_start_matches('/');
    Some(cmd.split('@').next().unwrap_or(cmd))
}

fn command_argument(text: &str) -> &str {
    text.splitn(2, |c: char| c.is_whitespace())
        .nth(1)
        .unwrap_or("")
        .trim()
}
