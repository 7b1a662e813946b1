//! Per-key async locks

use std::collections::HashMap;
use std::sync::{Arc, Mutex as SyncMutex, MutexGuard as SyncGuard};
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<Mutex<()>>>;

/// One async mutex per user id. An entry lives only while someone holds or
/// waits for it, so the map stays as small as the set of active users.
#[derive(Default)]
pub struct UserLocks {
    locks: SyncMutex<LockMap>,
}

/// Held lock for one user; dropping it releases the lock and forgets the
/// user's entry when nobody else is waiting
pub struct UserGuard<'a> {
    owner: &'a UserLocks,
    user_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl UserLocks {
    fn map(&self) -> SyncGuard<'_, LockMap> {
        // the map holds no invariants a panicking holder could break
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Wait for exclusive access to `user_id`
    pub async fn lock(&self, user_id: &str) -> UserGuard<'_> {
        let mutex = self
            .map()
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;
        UserGuard {
            owner: self,
            user_id: user_id.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of users with a live entry
    pub fn tracked(&self) -> usize {
        self.map().len()
    }
}

impl Drop for UserGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut map = self.owner.map();
        if map
            .get(&self.user_id)
            .is_some_and(|m| Arc::strong_count(m) == 1)
        {
            map.remove(&self.user_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_is_serialized() {
        let locks = Arc::new(UserLocks::default());
        let held = locks.lock("u").await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _g = locks.lock("u").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        // another user is not blocked
        drop(locks.lock("v").await);

        drop(held);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_entries_are_pruned_after_use() {
        let locks = UserLocks::default();
        for i in 0..50 {
            let _g = locks.lock(&format!("user-{}", i)).await;
        }
        assert_eq!(locks.tracked(), 0);

        let g = locks.lock("alice").await;
        assert_eq!(locks.tracked(), 1);
        drop(g);
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_entry_kept_while_someone_waits() {
        let locks = Arc::new(UserLocks::default());
        let held = locks.lock("u").await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _g = locks.lock("u").await;
                locks.tracked()
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(held);

        // the waiter saw its own entry while holding the lock
        assert_eq!(waiter.await.unwrap(), 1);
        assert_eq!(locks.tracked(), 0);
    }
}
