use super::*;

pub(super) const MENU_BANNER: &str = "Menu";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct FanoutReport {
    pub(super) delivered: usize,
    pub(super) failed: usize,
}

/// Sends the top-level keyboard. Returns false when the tree is empty and nothing was sent.
pub(super) async fn send_top_menu(
    state: &AppState,
    chat_id: i64,
    tree: &[ButtonNode],
) -> Result<bool> {
    if tree.is_empty() {
        return Ok(false);
    }
    let keyboard = project(tree, state.group_size, false);
    state
        .messenger
        .send_message(chat_id, MENU_BANNER, SendOptions::keyboard(keyboard))
        .await?;
    Ok(true)
}

pub(super) async fn list_active_users(state: &AppState) -> Result<Vec<i64>> {
    state.store.list_active_users().await
}

/// Pushes the current top-level keyboard to every active user.
pub(super) async fn resync_all(state: &AppState) -> Result<FanoutReport> {
    let tree = state.store.load_tree().await?;
    let users = list_active_users(state).await?;
    let mut report = FanoutReport::default();
    for chat_id in users {
        match send_top_menu(state, chat_id, &tree).await {
            Ok(true) => report.delivered += 1,
            Ok(false) => {}
            Err(err) => {
                error!("Failed to update keyboard for {}: {:#}", chat_id, err);
                report.failed += 1;
            }
        }
    }
    info!(
        "keyboard resync finished: {} delivered, {} failed",
        report.delivered, report.failed
    );
    Ok(report)
}

pub(super) async fn broadcast(state: &AppState, text: &str) -> Result<FanoutReport> {
    let users = list_active_users(state).await?;
    let mut report = FanoutReport::default();
    for chat_id in users {
        match state
            .messenger
            .send_message(chat_id, text, SendOptions::default())
            .await
        {
            Ok(()) => report.delivered += 1,
            Err(err) => {
                error!("Failed to send message to {}: {:#}", chat_id, err);
                report.failed += 1;
            }
        }
    }
    info!(
        "broadcast finished: {} delivered, {} failed",
        report.delivered, report.failed
    );
    Ok(report)
}
