use super::*;

use std::collections::BTreeMap;

const TREE_KEY: &str = "buttons";
const USER_PREFIX: &str = "user_";
const STARTED_SUFFIX: &str = "_started";

#[async_trait]
pub(super) trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: &str) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Whole keyspace as one JSON object, rewritten on every mutation.
pub(super) struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub(super) fn open(path: PathBuf) -> Result<Self> {
        let entries: BTreeMap<String, String> = if path.exists() {
            let data = fs::read_to_string(&path)
                .with_context(|| format!("read store {}", path.display()))?;
            if data.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&data).context("parse store")?
            }
        } else {
            BTreeMap::new()
        };
        Ok(FileStore {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let data = serde_json::to_vec_pretty(entries).context("serialize store")?;
        atomic_write(&self.path, &data)
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = self.entries.lock().await;
        Ok(entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| anyhow!("no parent dir for {}", path.display()))?;
    fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(data).context("write temp file")?;
    tmp.flush().context("flush temp file")?;
    tmp.as_file_mut().sync_all().context("sync temp file")?;
    tmp.persist(path)
        .map_err(|e| anyhow!("persist temp file: {}", e))?;
    Ok(())
}

/// Typed access to the menu tree and the per-user records.
#[derive(Clone)]
pub(super) struct TreeStore {
    kv: Arc<dyn KvStore>,
}

impl TreeStore {
    pub(super) fn new(kv: Arc<dyn KvStore>) -> Self {
        TreeStore { kv }
    }

    pub(super) async fn load_tree(&self) -> Result<Vec<ButtonNode>> {
        match self.kv.get(TREE_KEY).await? {
            Some(data) => serde_json::from_str(&data).context("parse button tree"),
            None => Ok(Vec::new()),
        }
    }

    pub(super) async fn save_tree(&self, tree: &[ButtonNode]) -> Result<()> {
        let data = serde_json::to_string(tree).context("serialize button tree")?;
        self.kv.put(TREE_KEY, &data).await
    }

    pub(super) async fn get_user_data(&self, chat_id: i64) -> Result<Option<String>> {
        self.kv.get(&user_key(chat_id)).await
    }

    pub(super) async fn put_user_data(&self, chat_id: i64, value: &str) -> Result<()> {
        self.kv.put(&user_key(chat_id), value).await
    }

    pub(super) async fn delete_user_data(&self, chat_id: i64) -> Result<()> {
        self.kv.delete(&user_key(chat_id)).await
    }

    pub(super) async fn mark_started(&self, chat_id: i64) -> Result<()> {
        self.kv.put(&started_key(chat_id), "true").await
    }

    pub(super) async fn list_active_users(&self) -> Result<Vec<i64>> {
        let keys = self.kv.list(USER_PREFIX).await?;
        Ok(keys.iter().filter_map(|key| active_chat_id(key)).collect())
    }
}

fn user_key(chat_id: i64) -> String {
    format!("{}{}", USER_PREFIX, chat_id)
}

fn started_key(chat_id: i64) -> String {
    format!("{}{}{}", USER_PREFIX, chat_id, STARTED_SUFFIX)
}

pub(super) fn active_chat_id(key: &str) -> Option<i64> {
    let raw = key
        .strip_prefix(USER_PREFIX)?
        .strip_suffix(STARTED_SUFFIX)?;
    match raw.parse::<i64>() {
        Ok(chat_id) => Some(chat_id),
        Err(_) => {
            warn!("skipping malformed marker key {}", key);
            None
        }
    }
}
