use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::{
    EntityId, FactLogError, FactRecord, LogQuery, Result, Sequence,
    store::{AppendOptions, FactLog, validate_batch},
};

struct FileLogInner {
    file: File,
    /// In-process mirror of the file contents, kept in append order.
    /// Reads are served from here; the file itself is only parsed once,
    /// at open time, and only ever appended to afterwards.
    facts: Vec<FactRecord>,
}

/// Durable fact log backed by an append-only file.
///
/// One JSON-serialized fact record per line. Every line is decoded back
/// into a typed [`FactRecord`] when the log is opened; a line that fails
/// to decode aborts the open with [`FactLogError::CorruptRecord`] rather
/// than being skipped, since a silently dropped fact would corrupt every
/// replay that follows. The file is never rewritten in place.
#[derive(Clone)]
pub struct FileFactLog {
    path: PathBuf,
    inner: Arc<Mutex<FileLogInner>>,
}

impl FileFactLog {
    /// Opens the log at `path`, creating the file if it does not exist,
    /// and decodes any existing history.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let facts = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => decode_lines(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        tracing::debug!(path = %path.display(), facts = facts.len(), "opened fact log");

        Ok(Self {
            path,
            inner: Arc::new(Mutex::new(FileLogInner { file, facts })),
        })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the total number of facts stored.
    pub async fn fact_count(&self) -> usize {
        self.inner.lock().await.facts.len()
    }
}

fn decode_lines(contents: &str) -> Result<Vec<FactRecord>> {
    let mut facts = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let record: FactRecord =
            serde_json::from_str(line).map_err(|source| FactLogError::CorruptRecord {
                line: index + 1,
                source,
            })?;
        facts.push(record);
    }
    Ok(facts)
}

#[async_trait]
impl FactLog for FileFactLog {
    async fn append(&self, facts: Vec<FactRecord>, options: AppendOptions) -> Result<Sequence> {
        validate_batch(&facts)?;

        let entity_id = facts[0].entity_id;
        let mut inner = self.inner.lock().await;

        let current = inner
            .facts
            .iter()
            .filter(|f| f.entity_id == entity_id)
            .map(|f| f.sequence)
            .max()
            .unwrap_or(Sequence::initial());

        if let Some(expected) = options.expected_sequence
            && current != expected
        {
            return Err(FactLogError::SequenceConflict {
                entity_id,
                expected,
                actual: current,
            });
        }

        if facts[0].sequence != current.next() {
            return Err(FactLogError::SequenceConflict {
                entity_id,
                expected: current,
                actual: facts[0].sequence,
            });
        }

        // Serialize the whole batch into one buffer so it reaches the file
        // in a single write: the batch lands completely or not at all, and
        // the mirror is only updated after the flush succeeds.
        let mut buffer = String::new();
        for record in &facts {
            buffer.push_str(&serde_json::to_string(record)?);
            buffer.push('\n');
        }

        inner.file.write_all(buffer.as_bytes()).await?;
        inner.file.flush().await?;
        inner.file.sync_data().await?;

        let last = facts.last().map(|f| f.sequence).unwrap_or(current);
        inner.facts.extend(facts);

        metrics::counter!("fact_log_facts_appended").increment(1);

        Ok(last)
    }

    async fn facts_for_entity(&self, entity_id: EntityId) -> Result<Vec<FactRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .facts
            .iter()
            .filter(|f| f.entity_id == entity_id)
            .cloned()
            .collect())
    }

    async fn load_all(&self) -> Result<Vec<FactRecord>> {
        Ok(self.inner.lock().await.facts.clone())
    }

    async fn query(&self, query: LogQuery) -> Result<Vec<FactRecord>> {
        let inner = self.inner.lock().await;
        let matched = inner.facts.iter().filter(|f| query.matches(f)).cloned();

        let matched: Vec<_> = match query.offset {
            Some(offset) => matched.skip(offset).collect(),
            None => matched.collect(),
        };

        let matched = match query.limit {
            Some(limit) => matched.into_iter().take(limit).collect(),
            None => matched,
        };

        Ok(matched)
    }

    async fn entity_sequence(&self, entity_id: EntityId) -> Result<Option<Sequence>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .facts
            .iter()
            .filter(|f| f.entity_id == entity_id)
            .map(|f| f.sequence)
            .max())
    }
}
