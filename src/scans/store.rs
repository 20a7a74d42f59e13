use std::collections::HashMap;

use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::nutrition::dto::ScannedFood;

pub const PENDING_TTL: Duration = Duration::minutes(15);

struct PendingScan {
    food: ScannedFood,
    stored_at: OffsetDateTime,
}

/// Scanned items waiting to be turned into journal entries, one per user.
pub struct PendingScans {
    ttl: Duration,
    items: Mutex<HashMap<Uuid, PendingScan>>,
}

impl Default for PendingScans {
    fn default() -> Self {
        Self::with_ttl(PENDING_TTL)
    }
}

impl PendingScans {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            items: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces whatever the user had pending.
    pub async fn put(&self, user_id: Uuid, food: ScannedFood) {
        self.put_at(user_id, food, OffsetDateTime::now_utc()).await
    }

    /// Removes and returns the user's item unless it has expired.
    pub async fn take(&self, user_id: Uuid) -> Option<ScannedFood> {
        self.take_at(user_id, OffsetDateTime::now_utc()).await
    }

    async fn put_at(&self, user_id: Uuid, food: ScannedFood, now: OffsetDateTime) {
        let mut items = self.items.lock().await;
        items.retain(|_, p| now - p.stored_at < self.ttl);
        items.insert(
            user_id,
            PendingScan {
                food,
                stored_at: now,
            },
        );
    }

    async fn take_at(&self, user_id: Uuid, now: OffsetDateTime) -> Option<ScannedFood> {
        let pending = self.items.lock().await.remove(&user_id)?;
        (now - pending.stored_at < self.ttl).then_some(pending.food)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(name: &str) -> ScannedFood {
        ScannedFood {
            food_name: name.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn take_consumes_once() {
        let store = PendingScans::default();
        let user = Uuid::new_v4();
        store.put(user, food("Cheerios")).await;
        assert_eq!(store.take(user).await.map(|f| f.food_name), Some("Cheerios".into()));
        assert!(store.take(user).await.is_none());
    }

    #[tokio::test]
    async fn latest_scan_wins_and_users_are_separate() {
        let store = PendingScans::default();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.put(a, food("first")).await;
        store.put(a, food("second")).await;
        store.put(b, food("other")).await;
        assert_eq!(store.take(a).await.unwrap().food_name, "second");
        assert_eq!(store.take(b).await.unwrap().food_name, "other");
    }

    #[tokio::test]
    async fn expired_items_are_dropped() {
        let store = PendingScans::with_ttl(Duration::minutes(5));
        let user = Uuid::new_v4();
        let then = OffsetDateTime::now_utc();
        store.put_at(user, food("old"), then).await;
        assert!(store
            .take_at(user, then + Duration::minutes(6))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn writes_prune_expired_items() {
        let store = PendingScans::with_ttl(Duration::minutes(5));
        let then = OffsetDateTime::now_utc();
        store.put_at(Uuid::new_v4(), food("stale"), then).await;
        store
            .put_at(Uuid::new_v4(), food("fresh"), then + Duration::minutes(10))
            .await;
        assert_eq!(store.items.lock().await.len(), 1);
    }
}
