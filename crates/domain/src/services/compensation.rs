//! Parent-with-children writes with a compensating delete.
//!
//! Creating a plan template or an assigned plan writes a parent row and then
//! its item rows as two separate storage calls. If the second call fails the
//! parent row is deleted again so no empty parent is left behind. The cleanup
//! is best-effort: if it also fails the orphan remains and a warning is logged.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{DomainError, StorageError};

/// A two-step write of one parent row and its child rows.
#[async_trait]
pub trait ParentWithChildren: Send + Sync {
    type Parent: Send;
    type NewChild: Send;
    type Child: Send;

    /// Entity name used in errors and logs.
    const ENTITY: &'static str;

    fn parent_id(parent: &Self::Parent) -> i64;

    async fn insert_parent(&self) -> Result<Self::Parent, StorageError>;

    async fn insert_children(
        &self,
        parent_id: i64,
        children: Vec<Self::NewChild>,
    ) -> Result<Vec<Self::Child>, StorageError>;

    async fn delete_parent(&self, parent_id: i64) -> Result<bool, StorageError>;
}

/// Inserts the parent, then its children. On child failure the parent is
/// deleted and [`DomainError::PartialWrite`] is returned.
pub async fn create_with_children<W: ParentWithChildren>(
    write: &W,
    children: Vec<W::NewChild>,
) -> Result<(W::Parent, Vec<W::Child>), DomainError> {
    let parent = write.insert_parent().await?;
    if children.is_empty() {
        return Ok((parent, Vec::new()));
    }

    let parent_id = W::parent_id(&parent);
    match write.insert_children(parent_id, children).await {
        Ok(children) => Ok((parent, children)),
        Err(err) => {
            warn!(
                entity = W::ENTITY,
                parent_id,
                error = %err,
                "Child insert failed, deleting parent"
            );
            match write.delete_parent(parent_id).await {
                Ok(_) => info!(entity = W::ENTITY, parent_id, "Orphaned parent removed"),
                Err(cleanup) => warn!(
                    entity = W::ENTITY,
                    parent_id,
                    error = %cleanup,
                    "Compensating delete failed, parent row left behind"
                ),
            }
            Err(DomainError::PartialWrite {
                entity: W::ENTITY,
                reason: err.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeWrite {
        fail_children: bool,
        fail_cleanup: bool,
        parents: Mutex<Vec<i64>>,
        children: Mutex<Vec<(i64, u32)>>,
    }

    #[async_trait]
    impl ParentWithChildren for FakeWrite {
        type Parent = i64;
        type NewChild = u32;
        type Child = (i64, u32);

        const ENTITY: &'static str = "widget";

        fn parent_id(parent: &i64) -> i64 {
            *parent
        }

        async fn insert_parent(&self) -> Result<i64, StorageError> {
            let mut parents = self.parents.lock().unwrap();
            let id = parents.len() as i64 + 1;
            parents.push(id);
            Ok(id)
        }

        async fn insert_children(
            &self,
            parent_id: i64,
            children: Vec<u32>,
        ) -> Result<Vec<(i64, u32)>, StorageError> {
            if self.fail_children {
                return Err(StorageError::Backend("items rejected".into()));
            }
            let rows: Vec<_> = children.into_iter().map(|c| (parent_id, c)).collect();
            self.children.lock().unwrap().extend(rows.iter().cloned());
            Ok(rows)
        }

        async fn delete_parent(&self, parent_id: i64) -> Result<bool, StorageError> {
            if self.fail_cleanup {
                return Err(StorageError::Backend("connection lost".into()));
            }
            let mut parents = self.parents.lock().unwrap();
            let before = parents.len();
            parents.retain(|p| *p != parent_id);
            Ok(parents.len() != before)
        }
    }

    #[tokio::test]
    async fn test_parent_and_children_written() {
        let write = FakeWrite::default();
        let (parent, children) = create_with_children(&write, vec![1, 2, 3]).await.unwrap();
        assert_eq!(parent, 1);
        assert_eq!(children, vec![(1, 1), (1, 2), (1, 3)]);
        assert_eq!(write.parents.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_children_skips_child_insert() {
        let write = FakeWrite {
            fail_children: true,
            ..Default::default()
        };
        let (_, children) = create_with_children(&write, vec![]).await.unwrap();
        assert!(children.is_empty());
    }

    #[tokio::test]
    async fn test_child_failure_deletes_parent() {
        let write = FakeWrite {
            fail_children: true,
            ..Default::default()
        };
        let err = create_with_children(&write, vec![1]).await.unwrap_err();
        match err {
            DomainError::PartialWrite { entity, reason } => {
                assert_eq!(entity, "widget");
                assert!(reason.contains("items rejected"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(write.parents.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_cleanup_still_reports_partial_write() {
        let write = FakeWrite {
            fail_children: true,
            fail_cleanup: true,
            ..Default::default()
        };
        let err = create_with_children(&write, vec![1]).await.unwrap_err();
        assert!(matches!(err, DomainError::PartialWrite { .. }));
        assert_eq!(write.parents.lock().unwrap().len(), 1);
    }
}
