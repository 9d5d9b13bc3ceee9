//! In-process member store
//!
//! Keeps rows in a `Vec` behind a mutex. Used by the router tests and by
//! `memberdesk serve --memory` for local runs without PostgreSQL.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::db::migrations::EMAIL_UNIQUE_INDEX;
use crate::db::store::{MemberStore, StoreError};
use crate::models::{Member, MemberSubmission};

struct Rows {
    next_id: i64,
    members: Vec<Member>,
}

/// Member store held in memory, ids start at 1
pub struct MemoryMemberStore {
    unique_email: bool,
    rows: Mutex<Rows>,
}

impl MemoryMemberStore {
    pub fn new() -> Self {
        Self {
            unique_email: false,
            rows: Mutex::new(Rows {
                next_id: 1,
                members: Vec::new(),
            }),
        }
    }

    /// Reject a second submission with the same email, like the unique index.
    pub fn with_unique_email(mut self, unique_email: bool) -> Self {
        self.unique_email = unique_email;
        self
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows().members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn rows(&self) -> MutexGuard<'_, Rows> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryMemberStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberStore for MemoryMemberStore {
    async fn insert(&self, member: MemberSubmission) -> Result<i64, StoreError> {
        let mut rows = self.rows();

        if self.unique_email && rows.members.iter().any(|m| m.email == member.email.as_str()) {
            return Err(StoreError::Duplicate(format!(
                "duplicate key value violates unique constraint \"{EMAIL_UNIQUE_INDEX}\""
            )));
        }

        let id = rows.next_id;
        rows.next_id += 1;
        rows.members.push(Member::from_submission(id, member));
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Member, StoreError> {
        self.rows()
            .members
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<Member>, StoreError> {
        Ok(self.rows().members.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(email: &str) -> MemberSubmission {
        MemberSubmission::from_json(&json!({
            "name": "Bob",
            "dob": "1985-07-14",
            "age": 39,
            "date_of_joining": "2024-01-10",
            "height": 180,
            "weight": 82.5,
            "occupation": "Teacher",
            "address": "2 High St",
            "email": email,
            "phone": "555-0199",
            "looking_for": "Cardio",
            "membership_mode": "yearly",
            "end_of_membership": "2025-01-10",
            "physical_problems": "no",
            "fractures": "yes",
            "fractureDescription": "left wrist, 2019",
            "agreed_to_terms": true,
            "submitted_at": "2024-01-10T08:30:00Z"
        }))
        .expect("valid submission")
    }

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let store = MemoryMemberStore::new();
        assert_eq!(store.insert(submission("a@example.com")).await.unwrap(), 1);
        assert_eq!(store.insert(submission("b@example.com")).await.unwrap(), 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn get_returns_stored_row() {
        let store = MemoryMemberStore::new();
        let input = submission("bob@example.com");
        let id = store.insert(input.clone()).await.unwrap();

        let member = store.get(id).await.unwrap();
        assert_eq!(member, Member::from_submission(id, input));
        assert_eq!(member.fracture_description.as_deref(), Some("left wrist, 2019"));
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = MemoryMemberStore::new();
        let err = store.get(42).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(42)));
    }

    #[tokio::test]
    async fn list_empty_then_filled() {
        let store = MemoryMemberStore::new();
        assert!(store.list().await.unwrap().is_empty());

        for i in 0..3 {
            store
                .insert(submission(&format!("m{i}@example.com")))
                .await
                .unwrap();
        }
        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[tokio::test]
    async fn duplicate_email_allowed_by_default() {
        let store = MemoryMemberStore::new();
        store.insert(submission("same@example.com")).await.unwrap();
        store.insert(submission("same@example.com")).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_email_rejected_when_unique() {
        let store = MemoryMemberStore::new().with_unique_email(true);
        store.insert(submission("same@example.com")).await.unwrap();

        let err = store.insert(submission("same@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert!(err.to_string().contains(EMAIL_UNIQUE_INDEX));
        assert_eq!(store.len(), 1);
    }
}
