use super::*;

#[derive(Debug)]
pub(super) enum CreateOutcome {
    Created(ButtonNode),
    ParentNotFound,
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum ModifyOutcome {
    Applied,
    NotFound,
}

pub(super) async fn list_buttons(state: &AppState) -> Result<Vec<ButtonNode>> {
    state.store.load_tree().await
}

pub(super) async fn get_button(state: &AppState, id: &str) -> Result<Option<ButtonNode>> {
    let tree = state.store.load_tree().await?;
    Ok(find_by_id(&tree, id).cloned())
}

/// The response is stored already converted to HTML.
pub(super) async fn create_button(
    state: &AppState,
    text: &str,
    response: &str,
    parent_id: Option<&str>,
) -> Result<CreateOutcome> {
    let tree = state.store.load_tree().await?;
    if let Some(parent_id) = parent_id {
        if find_by_id(&tree, parent_id).is_none() {
            warn!("create skipped: parent {} not found", parent_id);
            return Ok(CreateOutcome::ParentNotFound);
        }
    }
    let node = ButtonNode::new(next_id(&tree), text, markup::to_html(response));
    let tree = insert(tree, node.clone(), parent_id);
    state.store.save_tree(&tree).await?;
    info!("button {} created", node.id);
    resync_all(state).await?;
    Ok(CreateOutcome::Created(node))
}

pub(super) async fn update_button(
    state: &AppState,
    id: &str,
    text: &str,
    response: &str,
) -> Result<ModifyOutcome> {
    let tree = state.store.load_tree().await?;
    if !contains_top_level(&tree, id) {
        return Ok(ModifyOutcome::NotFound);
    }
    let patch = ButtonPatch {
        text: text.to_string(),
        response: markup::to_html(response),
    };
    let tree = update_by_id(tree, id, &patch);
    state.store.save_tree(&tree).await?;
    info!("button {} updated", id);
    resync_all(state).await?;
    Ok(ModifyOutcome::Applied)
}

pub(super) async fn delete_button(state: &AppState, id: &str) -> Result<ModifyOutcome> {
    let tree = state.store.load_tree().await?;
    if !contains_top_level(&tree, id) {
        return Ok(ModifyOutcome::NotFound);
    }
    let tree = delete_by_id(tree, id);
    state.store.save_tree(&tree).await?;
    info!("button {} deleted", id);
    resync_all(state).await?;
    Ok(ModifyOutcome::Applied)
}
