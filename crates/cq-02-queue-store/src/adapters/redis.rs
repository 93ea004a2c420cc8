//! # Redis Sorted Sets
//!
//! [`SortedSetStore`] over Redis `ZSET`s.
//!
//! Redis scores are IEEE doubles, so nanosecond ids above 2^53 lose their low
//! bits. Each member is therefore stored as `"<event id>:<envelope>"`: the
//! score orders, the prefix identifies. Removal by id matches the prefix, so
//! two events whose ids round to the same score never shadow each other.
//!
//! Blocking pops run on a dedicated connection so a parked `BZPOPMIN` never
//! stalls the shared multiplexed connection.

use crate::ports::outbound::{BoundedInsert, SortedSetStore, StoreBackendError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError, Script};
use std::time::Duration;
use tracing::debug;

const INSERT_BOUNDED: &str = r"
local len = redis.call('ZCARD', KEYS[1])
if len >= tonumber(ARGV[1]) then
  return {0, len}
end
for _, m in ipairs(redis.call('ZRANGEBYSCORE', KEYS[1], ARGV[2], ARGV[2])) do
  if string.sub(m, 1, #ARGV[5]) == ARGV[5] then
    redis.call('ZREM', KEYS[1], m)
  end
end
redis.call('ZADD', KEYS[1], ARGV[2], ARGV[3])
redis.call('PEXPIRE', KEYS[1], ARGV[4])
return {1, len}
";

const REMOVE_BY_ID: &str = r"
local removed = 0
for _, m in ipairs(redis.call('ZRANGEBYSCORE', KEYS[1], ARGV[1], ARGV[1])) do
  if string.sub(m, 1, #ARGV[2]) == ARGV[2] then
    removed = removed + redis.call('ZREM', KEYS[1], m)
  end
end
return removed
";

impl From<RedisError> for StoreBackendError {
    fn from(e: RedisError) -> Self {
        if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout()
        {
            StoreBackendError::Unavailable(e.to_string())
        } else {
            StoreBackendError::Protocol(e.to_string())
        }
    }
}

/// Redis-backed sorted-set store.
#[derive(Clone)]
pub struct RedisSortedSetStore {
    client: redis::Client,
    conn: ConnectionManager,
    insert_bounded: Script,
    remove_by_id: Script,
}

impl RedisSortedSetStore {
    /// Connect to `url` (e.g. `redis://127.0.0.1:6379/0`).
    pub async fn connect(url: &str) -> Result<Self, StoreBackendError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client.clone()).await?;
        debug!("connected to redis");
        Ok(Self {
            client,
            conn,
            insert_bounded: Script::new(INSERT_BOUNDED),
            remove_by_id: Script::new(REMOVE_BY_ID),
        })
    }

    async fn run_insert(
        &self,
        key: &str,
        score: u64,
        member: &str,
        max_len: usize,
        ttl: Duration,
    ) -> Result<BoundedInsert, StoreBackendError> {
        let mut conn = self.conn.clone();
        let (stored, len): (i64, usize) = self
            .insert_bounded
            .key(key)
            .arg(max_len)
            .arg(score)
            .arg(tag(score, member))
            .arg(ttl_millis(ttl))
            .arg(id_prefix(score))
            .invoke_async(&mut conn)
            .await?;

        Ok(if stored == 1 {
            BoundedInsert::Inserted { len }
        } else {
            BoundedInsert::Full { len }
        })
    }
}

impl std::fmt::Debug for RedisSortedSetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSortedSetStore").finish_non_exhaustive()
    }
}

fn id_prefix(score: u64) -> String {
    format!("{score}:")
}

fn tag(score: u64, member: &str) -> String {
    format!("{score}:{member}")
}

fn untag(tagged: &str) -> Result<(u64, String), StoreBackendError> {
    let (id, member) = tagged
        .split_once(':')
        .ok_or_else(|| StoreBackendError::Protocol("member without id prefix".into()))?;
    let id = id
        .parse::<u64>()
        .map_err(|e| StoreBackendError::Protocol(format!("bad member id: {e}")))?;
    Ok((id, member.to_string()))
}

fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl SortedSetStore for RedisSortedSetStore {
    async fn insert_bounded(
        &self,
        key: &str,
        score: u64,
        member: &str,
        max_len: usize,
        ttl: Duration,
    ) -> Result<BoundedInsert, StoreBackendError> {
        self.run_insert(key, score, member, max_len, ttl).await
    }

    async fn insert(
        &self,
        key: &str,
        score: u64,
        member: &str,
        ttl: Duration,
    ) -> Result<(), StoreBackendError> {
        self.run_insert(key, score, member, usize::MAX, ttl).await?;
        Ok(())
    }

    async fn pop_min(&self, key: &str) -> Result<Option<(u64, String)>, StoreBackendError> {
        let mut conn = self.conn.clone();
        let popped: Vec<(String, f64)> = conn.zpopmin(key, 1).await?;
        popped
            .into_iter()
            .next()
            .map(|(tagged, _)| untag(&tagged))
            .transpose()
    }

    async fn blocking_pop_min(
        &self,
        key: &str,
        timeout: Duration,
    ) -> Result<Option<(u64, String)>, StoreBackendError> {
        // BZPOPMIN treats 0 as "wait forever".
        if timeout.is_zero() {
            return self.pop_min(key).await;
        }

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let popped: Option<(String, String, f64)> = redis::cmd("BZPOPMIN")
            .arg(key)
            .arg(timeout.as_secs_f64())
            .query_async(&mut conn)
            .await?;

        popped.map(|(_, tagged, _)| untag(&tagged)).transpose()
    }

    async fn peek_min(&self, key: &str) -> Result<Option<(u64, String)>, StoreBackendError> {
        let mut conn = self.conn.clone();
        let head: Vec<String> = conn.zrange(key, 0, 0).await?;
        head.first().map(|tagged| untag(tagged)).transpose()
    }

    async fn remove_by_score(&self, key: &str, score: u64) -> Result<usize, StoreBackendError> {
        let mut conn = self.conn.clone();
        let removed: usize = self
            .remove_by_id
            .key(key)
            .arg(score)
            .arg(id_prefix(score))
            .invoke_async(&mut conn)
            .await?;
        Ok(removed)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreBackendError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn cardinality(&self, key: &str) -> Result<usize, StoreBackendError> {
        let mut conn = self.conn.clone();
        Ok(conn.zcard(key).await?)
    }
}
