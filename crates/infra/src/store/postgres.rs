//! Postgres-backed company store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Duplicate name (`LOWER(name)` index) or duplicate id (primary key) |
//! | Database (string too long) | `22001` | `Validation` | Column width exceeded (should be caught by validation first) |
//! | Database (check constraint violation) | `23514` | `Validation` | Invalid data |
//! | Database (other) | Any other | `Database` | Other database errors |
//! | PoolClosed | N/A | `Database` | Connection pool was closed |
//! | Other | N/A | `Database` | Network errors, connection failures, etc. |
//!
//! The name pre-check before insert/update is a fast path only; concurrent
//! writers are caught by the unique index and land in the same `Conflict`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::instrument;

use company_core::{Company, CompanyId, CompanyPatch, validate_company};

use super::{CompanyStore, ID_TAKEN_MESSAGE, NAME_TAKEN_MESSAGE, StoreError};

const PRIMARY_KEY_CONSTRAINT: &str = "companies_pkey";

const SELECT_COLUMNS: &str =
    "id, name, description, employees, registered, type, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresCompanyStore {
    pool: Arc<PgPool>,
}

impl PostgresCompanyStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `companies` table and its case-insensitive name index if
    /// they do not exist. Safe to run on every start-up.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS companies (
                id UUID PRIMARY KEY,
                name VARCHAR(15) NOT NULL,
                description VARCHAR(3000) NOT NULL DEFAULT '',
                employees BIGINT NOT NULL,
                registered BOOLEAN NOT NULL,
                type TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS companies_name_lower_key ON companies (LOWER(name))",
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        Ok(())
    }

    async fn name_taken(&self, name: &str, except: Option<CompanyId>) -> Result<bool, StoreError> {
        let row = sqlx::query(
            "SELECT EXISTS (SELECT 1 FROM companies WHERE LOWER(name) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2)) AS taken",
        )
        .bind(name)
        .bind(except.map(|id| *id.as_uuid()))
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("name_taken", e))?;

        row.try_get::<bool, _>("taken")
            .map_err(|e| map_sqlx_error("name_taken", e))
    }
}

#[async_trait]
impl CompanyStore for PostgresCompanyStore {
    #[instrument(skip(self), fields(company_id = %id), err)]
    async fn find_by_id(&self, id: CompanyId) -> Result<Company, StoreError> {
        let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM companies WHERE id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?
            .ok_or(StoreError::NotFound)?;

        company_from_row(&row)
    }

    #[instrument(skip(self, company), fields(company_id = %company.id), err)]
    async fn create(&self, company: Company) -> Result<Company, StoreError> {
        validate_company(&company)?;

        if self.name_taken(&company.name, None).await? {
            return Err(StoreError::Conflict(NAME_TAKEN_MESSAGE.to_string()));
        }

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO companies (id, name, description, employees, registered, type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(*company.id.as_uuid())
        .bind(&company.name)
        .bind(&company.description)
        .bind(company.employees)
        .bind(company.registered)
        .bind(&company.company_type)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        company_from_row(&row)
    }

    #[instrument(skip(self, company), fields(company_id = %company.id), err)]
    async fn delete(&self, company: &Company) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(*company.id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self, company, patch), fields(company_id = %company.id), err)]
    async fn patch_update(&self, company: &Company, patch: &CompanyPatch) -> Result<Company, StoreError> {
        patch.validate()?;

        if patch.is_empty() {
            return self.find_by_id(company.id).await;
        }

        if let Some(name) = &patch.name {
            if self.name_taken(name, Some(company.id)).await? {
                return Err(StoreError::Conflict(NAME_TAKEN_MESSAGE.to_string()));
            }
        }

        // One statement: either every present field lands or none does.
        let row = sqlx::query(&format!(
            r#"
            UPDATE companies SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                employees = COALESCE($4, employees),
                registered = COALESCE($5, registered),
                type = COALESCE($6, type),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(*company.id.as_uuid())
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.employees)
        .bind(patch.registered)
        .bind(patch.company_type.as_deref())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("patch_update", e))?
        .ok_or(StoreError::NotFound)?;

        company_from_row(&row)
    }
}

struct CompanyRow {
    id: uuid::Uuid,
    name: String,
    description: String,
    employees: i64,
    registered: bool,
    company_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for CompanyRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(CompanyRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            employees: row.try_get("employees")?,
            registered: row.try_get("registered")?,
            company_type: row.try_get("type")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: CompanyId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            employees: row.employees,
            registered: row.registered,
            company_type: row.company_type,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

fn company_from_row(row: &sqlx::postgres::PgRow) -> Result<Company, StoreError> {
    use sqlx::FromRow;

    CompanyRow::from_row(row)
        .map(Company::from)
        .map_err(|e| StoreError::Database(format!("failed to decode company row: {e}")))
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned());
            match code.as_deref() {
                Some("23505") => {
                    if db_err.constraint() == Some(PRIMARY_KEY_CONSTRAINT) {
                        StoreError::Conflict(ID_TAKEN_MESSAGE.to_string())
                    } else {
                        StoreError::Conflict(NAME_TAKEN_MESSAGE.to_string())
                    }
                }
                Some("22001") | Some("23514") => StoreError::Validation(db_err.message().to_string()),
                _ => StoreError::Database(format!(
                    "database error in {}: {}",
                    operation,
                    db_err.message()
                )),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Database(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}
