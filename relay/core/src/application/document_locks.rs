// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Per-document async locks.
//!
//! Serializes workflow steps that read and then mutate the same registry
//! record. Entries only live while some task holds or waits on them.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::document::DocumentId;

#[derive(Default)]
pub struct DocumentLocks {
    locks: DashMap<DocumentId, Arc<Mutex<()>>>,
}

impl DocumentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    pub async fn acquire(&self, id: &DocumentId) -> DocumentLockGuard<'_> {
        let mutex = self.locks.entry(id.clone()).or_default().clone();
        let guard = mutex.lock_owned().await;
        DocumentLockGuard {
            locks: self,
            id: id.clone(),
            guard: Some(guard),
        }
    }

    /// Number of documents with a held or awaited lock
    pub fn active(&self) -> usize {
        self.locks.len()
    }
}

pub struct DocumentLockGuard<'a> {
    locks: &'a DocumentLocks,
    id: DocumentId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for DocumentLockGuard<'_> {
    fn drop(&mut self) {
        // Release first so the table entry is the only remaining reference
        // when nobody else is waiting.
        self.guard.take();
        self.locks
            .locks
            .remove_if(&self.id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_entry_removed_after_release() {
        let locks = DocumentLocks::new();
        {
            let _guard = locks.acquire(&DocumentId::new("T1")).await;
            assert_eq!(locks.active(), 1);
        }
        assert_eq!(locks.active(), 0);
    }

    #[tokio::test]
    async fn test_same_document_is_serialized() {
        let locks = Arc::new(DocumentLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let inside = inside.clone();
            let max_inside = max_inside.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(&DocumentId::new("T1")).await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_inside.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert_eq!(locks.active(), 0);
    }

    #[tokio::test]
    async fn test_different_documents_do_not_block() {
        let locks = DocumentLocks::new();
        let _first = locks.acquire(&DocumentId::new("T1")).await;

        let second = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(&DocumentId::new("T2")),
        )
        .await;
        assert!(second.is_ok());
    }
}
