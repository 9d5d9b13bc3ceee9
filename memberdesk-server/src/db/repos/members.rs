//! Member repository on PostgreSQL
//!
//! - insert: single INSERT ... RETURNING id
//! - get / list: plain SELECTs, dates decoded into chrono types

use async_trait::async_trait;
use sqlx::PgPool;

use crate::config::StoreConfig;
use crate::db::store::{MemberStore, StoreError};
use crate::db::{create_pool, migrations};
use crate::models::{Member, MemberSubmission};

const SELECT_ONE: &str = r#"
    SELECT id, name, dob, age, date_of_joining, height, weight, occupation,
           address, email, phone, alternate_phone, looking_for, membership_mode,
           end_of_membership, physical_problems, physical_description, fractures,
           fracture_description, agreed_to_terms, photo, submitted_at
    FROM members
    WHERE id = $1
"#;

const SELECT_ALL: &str = r#"
    SELECT id, name, dob, age, date_of_joining, height, weight, occupation,
           address, email, phone, alternate_phone, looking_for, membership_mode,
           end_of_membership, physical_problems, physical_description, fractures,
           fracture_description, agreed_to_terms, photo, submitted_at
    FROM members
    ORDER BY id
"#;

const INSERT: &str = r#"
    INSERT INTO members
        (name, dob, age, date_of_joining, height, weight, occupation, address,
         email, phone, alternate_phone, looking_for, membership_mode,
         end_of_membership, physical_problems, physical_description,
         fractures, fracture_description, agreed_to_terms, photo, submitted_at)
    VALUES
        ($1, $2, $3, $4, $5, $6, $7, $8,
         $9, $10, $11, $12, $13,
         $14, $15, $16,
         $17, $18, $19, $20, $21)
    RETURNING id
"#;

/// PostgreSQL-backed member store
#[derive(Clone)]
pub struct PgMemberStore {
    pool: PgPool,
}

impl PgMemberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build the pool from `config` and make sure the table exists.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = create_pool(config).await?;
        migrations::run(&pool, config).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MemberStore for PgMemberStore {
    async fn insert(&self, member: MemberSubmission) -> Result<i64, StoreError> {
        let mut conn = self.pool.acquire().await?;

        let id: i64 = sqlx::query_scalar(INSERT)
            .bind(&member.name)
            .bind(member.dob)
            .bind(member.age)
            .bind(member.date_of_joining)
            .bind(member.height)
            .bind(member.weight)
            .bind(&member.occupation)
            .bind(&member.address)
            .bind(member.email.as_str())
            .bind(&member.phone)
            .bind(member.alternate_phone.as_deref())
            .bind(&member.looking_for)
            .bind(&member.membership_mode)
            .bind(member.end_of_membership)
            .bind(&member.physical_problems)
            .bind(member.physical_description.as_deref())
            .bind(&member.fractures)
            .bind(member.fracture_description.as_deref())
            .bind(member.agreed_to_terms)
            .bind(member.photo.as_deref())
            .bind(member.submitted_at)
            .fetch_one(&mut *conn)
            .await?;

        tracing::debug!(id, "Inserted member");
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Member, StoreError> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query_as::<_, Member>(SELECT_ONE)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<Member>, StoreError> {
        let mut conn = self.pool.acquire().await?;

        let members = sqlx::query_as::<_, Member>(SELECT_ALL)
            .fetch_all(&mut *conn)
            .await?;

        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Integration tests - run with MEMBERDESK_DB_* set
    // cargo test -p memberdesk-server -- --ignored

    fn submission(email: &str) -> MemberSubmission {
        MemberSubmission::from_json(&json!({
            "name": "Alice",
            "dob": "1990-01-01",
            "age": 30,
            "date_of_joining": "2024-05-01",
            "height": 165.5,
            "weight": 60.25,
            "occupation": "Engineer",
            "address": "1 Main St",
            "email": email,
            "phone": "555-0100",
            "looking_for": "Strength training",
            "membership_mode": "monthly",
            "end_of_membership": "2024-06-01",
            "physical_problems": "yes",
            "physicalDescription": "bad knee",
            "fractures": "no",
            "agreed_to_terms": true,
            "photo": "aGVsbG8=",
            "submitted_at": "2024-05-01T10:00:00Z"
        }))
        .expect("valid submission")
    }

    async fn store() -> PgMemberStore {
        let config = StoreConfig::from_env().expect("config");
        PgMemberStore::connect(&config).await.expect("connect failed")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_then_get_round_trips() {
        let store = store().await;
        let input = submission("roundtrip@example.com");

        let id = store.insert(input.clone()).await.expect("insert failed");
        let member = store.get(id).await.expect("get failed");

        assert_eq!(member, Member::from_submission(id, input));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn get_missing_is_not_found() {
        let store = store().await;
        let err = store.get(i64::MAX).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == i64::MAX));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn ids_are_unique_and_listed() {
        let store = store().await;
        let a = store.insert(submission("list-a@example.com")).await.unwrap();
        let b = store.insert(submission("list-b@example.com")).await.unwrap();
        assert_ne!(a, b);

        let ids: Vec<i64> = store.list().await.unwrap().into_iter().map(|m| m.id).collect();
        assert!(ids.contains(&a));
        assert!(ids.contains(&b));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn unique_email_reports_duplicate() {
        let config = StoreConfig {
            unique_email: true,
            ..StoreConfig::from_env().expect("config")
        };
        let store = PgMemberStore::connect(&config).await.expect("connect failed");
        let email = format!("dup-{}@example.com", chrono::Utc::now().timestamp_micros());

        store.insert(submission(&email)).await.expect("first insert");
        let err = store.insert(submission(&email)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        // leave the shared test database without the index
        migrations::drop_email_unique_index(store.pool())
            .await
            .expect("reset index");
    }
}
