use super::*;

/// One entry of the menu. Nodes with children open a sub-menu, leaves only reply.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(super) struct ButtonNode {
    pub(super) id: String,
    pub(super) text: String,
    pub(super) response: String,
    #[serde(rename = "subButtons", default)]
    pub(super) sub_buttons: Vec<ButtonNode>,
}

impl ButtonNode {
    pub(super) fn new(id: impl Into<String>, text: impl Into<String>, response: impl Into<String>) -> Self {
        ButtonNode {
            id: id.into(),
            text: text.into(),
            response: response.into(),
            sub_buttons: Vec::new(),
        }
    }

    pub(super) fn has_children(&self) -> bool {
        !self.sub_buttons.is_empty()
    }
}

/// Text/response replacement applied by `update_by_id`.
#[derive(Clone, Debug)]
pub(super) struct ButtonPatch {
    pub(super) text: String,
    pub(super) response: String,
}

pub(super) fn find_by_id<'a>(tree: &'a [ButtonNode], id: &str) -> Option<&'a ButtonNode> {
    for node in tree {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_by_id(&node.sub_buttons, id) {
            return Some(found);
        }
    }
    None
}

pub(super) fn find_by_text<'a>(tree: &'a [ButtonNode], text: &str) -> Option<&'a ButtonNode> {
    let needle = text.to_lowercase();
    find_by_text_lower(tree, &needle)
}

fn find_by_text_lower<'a>(tree: &'a [ButtonNode], needle: &str) -> Option<&'a ButtonNode> {
    for node in tree {
        if node.text.to_lowercase() == needle {
            return Some(node);
        }
        if let Some(found) = find_by_text_lower(&node.sub_buttons, needle) {
            return Some(found);
        }
    }
    None
}

fn find_by_id_mut<'a>(tree: &'a mut [ButtonNode], id: &str) -> Option<&'a mut ButtonNode> {
    for node in tree.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_by_id_mut(&mut node.sub_buttons, id) {
            return Some(found);
        }
    }
    None
}

/// Appends `node` at the top level, or under `parent_id` at any depth.
/// An unknown parent leaves the tree as it was.
pub(super) fn insert(
    mut tree: Vec<ButtonNode>,
    node: ButtonNode,
    parent_id: Option<&str>,
) -> Vec<ButtonNode> {
    match parent_id {
        None => tree.push(node),
        Some(parent_id) => {
            if let Some(parent) = find_by_id_mut(&mut tree, parent_id) {
                parent.sub_buttons.push(node);
            }
        }
    }
    tree
}

/// Top-level nodes only; nested nodes are not editable by id.
pub(super) fn update_by_id(
    mut tree: Vec<ButtonNode>,
    id: &str,
    patch: &ButtonPatch,
) -> Vec<ButtonNode> {
    if let Some(node) = tree.iter_mut().find(|node| node.id == id) {
        node.text = patch.text.clone();
        node.response = patch.response.clone();
    }
    tree
}

/// Top-level nodes only, same as `update_by_id`.
pub(super) fn delete_by_id(mut tree: Vec<ButtonNode>, id: &str) -> Vec<ButtonNode> {
    tree.retain(|node| node.id != id);
    tree
}

pub(super) fn contains_top_level(tree: &[ButtonNode], id: &str) -> bool {
    tree.iter().any(|node| node.id == id)
}

/// Millisecond timestamp, bumped past any id already present in the tree.
pub(super) fn next_id(tree: &[ButtonNode]) -> String {
    let mut candidate = chrono::Utc::now().timestamp_millis();
    while find_by_id(tree, &candidate.to_string()).is_some() {
        candidate += 1;
    }
    candidate.to_string()
}
