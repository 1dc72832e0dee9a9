use super::*;

pub(super) const BACK_CAPTION: &str = "⬅️ Back";
pub(super) const DEFAULT_GROUP_SIZE: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct KeyCell {
    pub(super) text: String,
}

/// Row-major reply keyboard layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Keyboard {
    pub(super) rows: Vec<Vec<KeyCell>>,
}

impl Keyboard {
    #[cfg(test)]
    pub(super) fn captions(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.text.clone()).collect())
            .collect()
    }
}

pub(super) fn project(nodes: &[ButtonNode], group_size: usize, include_back: bool) -> Keyboard {
    let group_size = group_size.max(1);
    let mut rows = Vec::with_capacity(nodes.len() / group_size + 2);
    if include_back {
        rows.push(vec![KeyCell {
            text: BACK_CAPTION.to_string(),
        }]);
    }
    for chunk in nodes.chunks(group_size) {
        rows.push(
            chunk
                .iter()
                .map(|node| KeyCell {
                    text: node.text.clone(),
                })
                .collect(),
        );
    }
    Keyboard { rows }
}
