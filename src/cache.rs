use anyhow::{Context, anyhow};
use async_trait::async_trait;
use fjall::Keyspace;
use std::path::Path;
use tokio::sync::Mutex;
use tokio::task;

use crate::Result;
use crate::models::WeatherSnapshot;

const NEXT_ID_KEY: &str = "next_id";

/// Lookup and append access to stored snapshots.
///
/// A miss is `Ok(None)`; `Err` is reserved for failures of the store itself.
/// Inserts never update or deduplicate, so several records may exist for one
/// key. Which of them a lookup returns is implementation-defined.
#[async_trait]
pub trait WeatherCache: Send + Sync {
    async fn find_by_location(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<WeatherSnapshot>>;

    /// Exact, case-sensitive match on the stored city name
    async fn find_by_city(&self, city: &str) -> Result<Option<WeatherSnapshot>>;

    async fn insert(&self, snapshot: &WeatherSnapshot) -> Result<()>;
}

/// Snapshot store on an embedded fjall database.
///
/// Records live in `snapshots` under a monotonically increasing id. The
/// `by_location` and `by_city` keyspaces map a lookup key to the ids stored
/// under it in insertion order, and lookups return the oldest record.
pub struct FjallWeatherCache {
    snapshots: Keyspace,
    by_location: Keyspace,
    by_city: Keyspace,
    meta: Keyspace,
    // index updates are read-modify-write
    write_lock: Mutex<()>,
}

/// Exact-equality key for a coordinate pair. `-0.0` is folded into `0.0` so
/// the key agrees with float comparison.
#[must_use]
pub fn location_key(latitude: f64, longitude: f64) -> Vec<u8> {
    fn canonical_bits(value: f64) -> u64 {
        if value == 0.0 { 0.0_f64.to_bits() } else { value.to_bits() }
    }

    let mut key = Vec::with_capacity(16);
    key.extend_from_slice(&canonical_bits(latitude).to_be_bytes());
    key.extend_from_slice(&canonical_bits(longitude).to_be_bytes());
    key
}

fn get_from_store(store: &Keyspace, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

fn read_ids(index: &Keyspace, key: &[u8]) -> anyhow::Result<Vec<u64>> {
    match get_from_store(index, key)? {
        Some(bytes) => Ok(postcard::from_bytes(&bytes)?),
        None => Ok(Vec::new()),
    }
}

fn append_id(index: &Keyspace, key: Vec<u8>, id: u64) -> anyhow::Result<()> {
    let mut ids = read_ids(index, &key)?;
    ids.push(id);
    index.insert(key, postcard::to_stdvec(&ids)?)?;
    Ok(())
}

fn first_match(
    snapshots: &Keyspace,
    index: &Keyspace,
    key: &[u8],
) -> anyhow::Result<Option<WeatherSnapshot>> {
    let Some(id) = read_ids(index, key)?.first().copied() else {
        return Ok(None);
    };

    let bytes = get_from_store(snapshots, &id.to_be_bytes())?
        .ok_or_else(|| anyhow!("Index points at missing snapshot record {id}"))?;
    Ok(Some(postcard::from_bytes(&bytes)?))
}

fn allocate_id(meta: &Keyspace) -> anyhow::Result<u64> {
    let id = match get_from_store(meta, NEXT_ID_KEY.as_bytes())? {
        Some(bytes) => u64::from_be_bytes(
            bytes
                .as_slice()
                .try_into()
                .context("Corrupt snapshot id counter")?,
        ),
        None => 0,
    };
    meta.insert(NEXT_ID_KEY.as_bytes().to_vec(), (id + 1).to_be_bytes().to_vec())?;
    Ok(id)
}

impl FjallWeatherCache {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let db = fjall::Database::builder(path)
            .open()
            .with_context(|| format!("Failed to open snapshot store at {}", path.display()))?;

        Ok(Self {
            snapshots: db.keyspace("snapshots", fjall::KeyspaceCreateOptions::default)?,
            by_location: db.keyspace("by_location", fjall::KeyspaceCreateOptions::default)?,
            by_city: db.keyspace("by_city", fjall::KeyspaceCreateOptions::default)?,
            meta: db.keyspace("meta", fjall::KeyspaceCreateOptions::default)?,
            write_lock: Mutex::new(()),
        })
    }

    async fn lookup(&self, index: &Keyspace, key: Vec<u8>) -> Result<Option<WeatherSnapshot>> {
        let snapshots = self.snapshots.clone();
        let index = index.clone();

        let found = task::spawn_blocking(move || first_match(&snapshots, &index, &key))
            .await
            .context("Snapshot lookup task failed")??;

        if found.is_some() {
            tracing::debug!("Snapshot found");
        } else {
            tracing::debug!("Snapshot not found");
        }
        Ok(found)
    }
}

#[async_trait]
impl WeatherCache for FjallWeatherCache {
    #[tracing::instrument(name = "find_by_location", level = "debug", skip(self))]
    async fn find_by_location(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<WeatherSnapshot>> {
        self.lookup(&self.by_location, location_key(latitude, longitude))
            .await
    }

    #[tracing::instrument(name = "find_by_city", level = "debug", skip(self))]
    async fn find_by_city(&self, city: &str) -> Result<Option<WeatherSnapshot>> {
        self.lookup(&self.by_city, city.as_bytes().to_vec()).await
    }

    #[tracing::instrument(name = "insert_snapshot", level = "debug", skip_all)]
    async fn insert(&self, snapshot: &WeatherSnapshot) -> Result<()> {
        let bytes = postcard::to_stdvec(snapshot).context("Failed to encode snapshot")?;
        let location = location_key(snapshot.latitude, snapshot.longitude);
        let city = snapshot.city.as_ref().map(|c| c.as_bytes().to_vec());

        let snapshots = self.snapshots.clone();
        let by_location = self.by_location.clone();
        let by_city = self.by_city.clone();
        let meta = self.meta.clone();

        let _guard = self.write_lock.lock().await;
        let id = task::spawn_blocking(move || -> anyhow::Result<u64> {
            let id = allocate_id(&meta)?;
            // record first, so an index entry never points at nothing
            snapshots.insert(id.to_be_bytes().to_vec(), bytes)?;
            append_id(&by_location, location, id)?;
            if let Some(city) = city {
                append_id(&by_city, city, id)?;
            }
            Ok(id)
        })
        .await
        .context("Snapshot insert task failed")??;

        tracing::debug!(id, "Snapshot stored");
        Ok(())
    }
}
