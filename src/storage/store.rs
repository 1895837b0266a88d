use super::{DeniedInquiry, PolicyInquiry, User};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use libsql::{Builder, Connection, Database, Row, params, params::IntoParams};
use std::sync::Arc;
use tracing::{debug, info};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        full_name TEXT NOT NULL,
        email TEXT UNIQUE NOT NULL,
        patient_id TEXT,
        password TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS policy_inquiries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        age INTEGER NOT NULL,
        gender TEXT NOT NULL,
        mobile_number TEXT NOT NULL,
        dob TEXT NOT NULL,
        place TEXT NOT NULL,
        insurance_policy TEXT NOT NULL,
        recommended_policy TEXT NOT NULL,
        timestamp TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS denied_inquiries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        patient_name TEXT NOT NULL,
        patient_id TEXT NOT NULL,
        policy_id TEXT NOT NULL,
        policy_name TEXT NOT NULL,
        denial_reason TEXT NOT NULL,
        document_path TEXT,
        timestamp TEXT NOT NULL
    )
    "#,
];

// Primary result code; extended codes keep it in the low byte.
const SQLITE_CONSTRAINT: std::ffi::c_int = 19;

/// Users and inquiry submissions in one libSQL database.
#[derive(Clone)]
pub struct HelpdeskStore {
    _db: Arc<Database>,
    // A single connection, so `:memory:` databases keep their tables.
    conn: Connection,
}

impl HelpdeskStore {
    pub async fn new(db_path: &str) -> Result<Self> {
        let db = Builder::new_local(db_path).build().await?;
        let conn = db.connect()?;

        for statement in SCHEMA {
            conn.execute(statement, ()).await?;
        }

        info!("Database initialized successfully: {}", db_path);
        Ok(Self {
            _db: Arc::new(db),
            conn,
        })
    }

    /// Inserts a user and returns its id. Fails with [`Error::EmailTaken`]
    /// when the email is already registered.
    pub async fn insert_user(&self, user: &User) -> Result<i64> {
        let result = self
            .insert_returning_id(
                "INSERT INTO users (full_name, email, patient_id, password) VALUES (?, ?, ?, ?) RETURNING id",
                params![
                    user.full_name.as_str(),
                    user.email.as_str(),
                    user.patient_id.clone(),
                    user.password_hash.as_str(),
                ],
            )
            .await;

        match result {
            Ok(id) => {
                debug!("User {} stored with id {}", user.email, id);
                Ok(id)
            }
            Err(Error::Database(libsql::Error::SqliteFailure(code, _)))
                if code & 0xff == SQLITE_CONSTRAINT =>
            {
                Err(Error::EmailTaken)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, full_name, email, patient_id, password FROM users WHERE email = ?",
                [email],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(User {
                id: Some(row.get(0)?),
                full_name: row.get(1)?,
                email: row.get(2)?,
                patient_id: row.get(3)?,
                password_hash: row.get(4)?,
            })),
            None => Ok(None),
        }
    }

    pub async fn insert_policy_inquiry(&self, inquiry: &PolicyInquiry) -> Result<i64> {
        let id = self
            .insert_returning_id(
                r#"
                INSERT INTO policy_inquiries
                    (name, age, gender, mobile_number, dob, place, insurance_policy, recommended_policy, timestamp)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING id
                "#,
                params![
                    inquiry.name.as_str(),
                    i64::from(inquiry.age),
                    inquiry.gender.as_str(),
                    inquiry.mobile_number.as_str(),
                    inquiry.dob.to_string(),
                    inquiry.place.as_str(),
                    inquiry.insurance_policy.as_str(),
                    inquiry.recommended_policy.as_str(),
                    inquiry.created_at.to_rfc3339(),
                ],
            )
            .await?;
        debug!("Policy inquiry stored with id {}", id);
        Ok(id)
    }

    pub async fn get_policy_inquiry(&self, id: i64) -> Result<PolicyInquiry> {
        let mut rows = self
            .conn
            .query(
                r#"
                SELECT id, name, age, gender, mobile_number, dob, place, insurance_policy, recommended_policy, timestamp
                FROM policy_inquiries WHERE id = ?
                "#,
                [id],
            )
            .await?;

        let row = rows
            .next()
            .await?
            .ok_or_else(|| Error::not_found(format!("policy inquiry {id}")))?;

        let age: i64 = row.get(2)?;
        let dob: String = row.get(5)?;
        Ok(PolicyInquiry {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            age: u32::try_from(age)
                .map_err(|e| Error::internal(format!("Stored age out of range: {e}")))?,
            gender: row.get(3)?,
            mobile_number: row.get(4)?,
            dob: NaiveDate::parse_from_str(&dob, "%Y-%m-%d")
                .map_err(|e| Error::internal(format!("Failed to parse date of birth: {e}")))?,
            place: row.get(6)?,
            insurance_policy: row.get(7)?,
            recommended_policy: row.get(8)?,
            created_at: timestamp(&row, 9)?,
        })
    }

    pub async fn insert_denied_inquiry(&self, inquiry: &DeniedInquiry) -> Result<i64> {
        let id = self
            .insert_returning_id(
                r#"
                INSERT INTO denied_inquiries
                    (patient_name, patient_id, policy_id, policy_name, denial_reason, document_path, timestamp)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                RETURNING id
                "#,
                params![
                    inquiry.patient_name.as_str(),
                    inquiry.patient_id.as_str(),
                    inquiry.policy_id.as_str(),
                    inquiry.policy_name.as_str(),
                    inquiry.denial_reason.as_str(),
                    inquiry.document_path.clone(),
                    inquiry.created_at.to_rfc3339(),
                ],
            )
            .await?;
        debug!("Denied inquiry stored with id {}", id);
        Ok(id)
    }

    pub async fn get_denied_inquiry(&self, id: i64) -> Result<DeniedInquiry> {
        let mut rows = self
            .conn
            .query(
                r#"
                SELECT id, patient_name, patient_id, policy_id, policy_name, denial_reason, document_path, timestamp
                FROM denied_inquiries WHERE id = ?
                "#,
                [id],
            )
            .await?;

        let row = rows
            .next()
            .await?
            .ok_or_else(|| Error::not_found(format!("denied inquiry {id}")))?;

        Ok(DeniedInquiry {
            id: Some(row.get(0)?),
            patient_name: row.get(1)?,
            patient_id: row.get(2)?,
            policy_id: row.get(3)?,
            policy_name: row.get(4)?,
            denial_reason: row.get(5)?,
            document_path: row.get(6)?,
            created_at: timestamp(&row, 7)?,
        })
    }
}

impl HelpdeskStore {
    // The id comes back from the statement itself, so concurrent inserts on
    // the shared connection cannot observe each other's rowid.
    async fn insert_returning_id(&self, sql: &str, params: impl IntoParams) -> Result<i64> {
        let mut rows = self.conn.query(sql, params).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| Error::internal("INSERT returned no id"))?;
        Ok(row.get(0)?)
    }

    #[cfg(test)]
    pub(crate) async fn execute_raw(&self, sql: &str) -> Result<()> {
        self.conn.execute(sql, ()).await?;
        Ok(())
    }
}

fn timestamp(row: &Row, idx: i32) -> Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    Ok(DateTime::parse_from_rfc3339(&raw)
        .map_err(|e| Error::internal(format!("Failed to parse timestamp: {e}")))?
        .with_timezone(&Utc))
}
