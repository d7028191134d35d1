use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use company_core::{Company, CompanyId, CompanyPatch, validate_company};

use super::{CompanyStore, ID_TAKEN_MESSAGE, NAME_TAKEN_MESSAGE, StoreError};

/// In-memory company store.
///
/// Intended for tests/dev. Check-then-write happens under one write lock, so
/// unlike Postgres there is no window between the name check and the insert.
#[derive(Debug, Default)]
pub struct InMemoryCompanyStore {
    companies: RwLock<HashMap<CompanyId, Company>>,
}

impl InMemoryCompanyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.companies.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn name_taken(companies: &HashMap<CompanyId, Company>, name: &str, except: Option<CompanyId>) -> bool {
        let wanted = name.to_lowercase();
        companies
            .values()
            .any(|c| Some(c.id) != except && c.name.to_lowercase() == wanted)
    }
}

fn poisoned() -> StoreError {
    StoreError::Database("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl CompanyStore for InMemoryCompanyStore {
    async fn find_by_id(&self, id: CompanyId) -> Result<Company, StoreError> {
        let companies = self.companies.read().map_err(|_| poisoned())?;
        companies.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create(&self, mut company: Company) -> Result<Company, StoreError> {
        validate_company(&company)?;

        let mut companies = self.companies.write().map_err(|_| poisoned())?;
        if companies.contains_key(&company.id) {
            return Err(StoreError::Conflict(ID_TAKEN_MESSAGE.to_string()));
        }
        if Self::name_taken(&companies, &company.name, None) {
            return Err(StoreError::Conflict(NAME_TAKEN_MESSAGE.to_string()));
        }

        let now = Utc::now();
        company.created_at = Some(now);
        company.updated_at = Some(now);
        companies.insert(company.id, company.clone());
        Ok(company)
    }

    async fn delete(&self, company: &Company) -> Result<(), StoreError> {
        let mut companies = self.companies.write().map_err(|_| poisoned())?;
        companies
            .remove(&company.id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn patch_update(&self, company: &Company, patch: &CompanyPatch) -> Result<Company, StoreError> {
        patch.validate()?;

        let mut companies = self.companies.write().map_err(|_| poisoned())?;
        let current = companies.get(&company.id).ok_or(StoreError::NotFound)?;
        if patch.is_empty() {
            return Ok(current.clone());
        }

        if let Some(name) = &patch.name {
            if Self::name_taken(&companies, name, Some(company.id)) {
                return Err(StoreError::Conflict(NAME_TAKEN_MESSAGE.to_string()));
            }
        }

        let mut updated = patch.apply_to(current);
        updated.updated_at = Some(Utc::now());
        companies.insert(updated.id, updated.clone());
        Ok(updated)
    }
}
