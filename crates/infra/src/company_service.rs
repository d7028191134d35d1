//! Company operations: store call + outcome event.
//!
//! Every mutating operation that reaches the store emits exactly one event,
//! `_SUCCESS` or `_FAILED`, keyed by the company id. Publishing happens after
//! the store call returns and its result never changes the operation's
//! outcome: a failed publish is logged by the publisher and dropped.

use tracing::{info, instrument};

use company_core::{Company, CompanyId, CompanyPatch, validate_company};
use company_events::{CompanyEventPublisher, CompanyEventType, EventBus};

use crate::store::{CompanyStore, StoreError};

pub struct CompanyService<S, B> {
    store: S,
    events: CompanyEventPublisher<B>,
}

impl<S, B> CompanyService<S, B>
where
    S: CompanyStore,
    B: EventBus,
{
    pub fn new(store: S, bus: B) -> Self {
        Self {
            store,
            events: CompanyEventPublisher::new(bus),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[instrument(skip(self), fields(company_id = %id), err)]
    pub async fn get_company_by_id(&self, id: CompanyId) -> Result<Company, StoreError> {
        self.store.find_by_id(id).await
    }

    /// Validation failures return before the store and emit nothing.
    /// Store failures emit `COMPANY_CREATED_FAILED` with the input snapshot.
    #[instrument(skip(self, company), fields(company_id = %company.id), err)]
    pub async fn create_company(&self, company: Company) -> Result<Company, StoreError> {
        validate_company(&company)?;

        match self.store.create(company.clone()).await {
            Ok(created) => {
                info!("company created");
                self.emit(CompanyEventType::CreatedSuccess, &created).await;
                Ok(created)
            }
            Err(e) => {
                self.emit(CompanyEventType::CreatedFailed, &company.without_timestamps())
                    .await;
                Err(e)
            }
        }
    }

    /// A missing company is reported as `NotFound` without any event.
    #[instrument(skip(self), fields(company_id = %id), err)]
    pub async fn delete_company(&self, id: CompanyId) -> Result<(), StoreError> {
        let company = self.store.find_by_id(id).await?;

        match self.store.delete(&company).await {
            Ok(()) => {
                info!("company deleted");
                self.emit(CompanyEventType::DeletedSuccess, &company).await;
                Ok(())
            }
            Err(e) => {
                self.emit(CompanyEventType::DeletedFailed, &company).await;
                Err(e)
            }
        }
    }

    /// `current` is the entity as loaded by the caller; the failure event
    /// carries it unchanged.
    #[instrument(skip(self, current, patch), fields(company_id = %current.id), err)]
    pub async fn patch_company(
        &self,
        current: &Company,
        patch: &CompanyPatch,
    ) -> Result<Company, StoreError> {
        match self.store.patch_update(current, patch).await {
            Ok(updated) => {
                info!("company patched");
                self.emit(CompanyEventType::PatchedSuccess, &updated).await;
                Ok(updated)
            }
            Err(e) => {
                self.emit(CompanyEventType::PatchedFailed, current).await;
                Err(e)
            }
        }
    }

    async fn emit(&self, event_type: CompanyEventType, company: &Company) {
        // Logged by the publisher.
        let _ = self.events.publish(event_type, company).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use company_events::{BusError, CompanyEvent, InMemoryEventBus, KeyedMessage, Subscription};
    use std::sync::Arc;

    use crate::store::{InMemoryCompanyStore, NAME_TAKEN_MESSAGE};

    type Service = CompanyService<Arc<InMemoryCompanyStore>, Arc<InMemoryEventBus>>;

    fn setup() -> (Service, Subscription<KeyedMessage>) {
        let bus = Arc::new(InMemoryEventBus::new("company-events"));
        let sub = bus.subscribe();
        let service = CompanyService::new(Arc::new(InMemoryCompanyStore::new()), bus);
        (service, sub)
    }

    fn company(name: &str) -> Company {
        Company::new(CompanyId::new(), name, "", 5, true, "Corporations")
    }

    fn events(sub: &Subscription<KeyedMessage>) -> Vec<(String, CompanyEvent)> {
        sub.drain()
            .into_iter()
            .map(|m| {
                let event: CompanyEvent = serde_json::from_slice(&m.payload).unwrap();
                (m.key, event)
            })
            .collect()
    }

    #[tokio::test]
    async fn create_emits_one_success_event_keyed_by_id() {
        let (service, sub) = setup();
        let created = service.create_company(company("Acme")).await.unwrap();

        let events = events(&sub);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, created.id.to_string());
        assert_eq!(events[0].1.event_type(), CompanyEventType::CreatedSuccess);
        assert_eq!(events[0].1.company(), &created);
    }

    #[tokio::test]
    async fn duplicate_create_emits_failed_event_with_input_snapshot() {
        let (service, sub) = setup();
        service.create_company(company("Acme")).await.unwrap();
        sub.drain();

        let input = company("ACME");
        let err = service.create_company(input.clone()).await.unwrap_err();
        assert_eq!(err, StoreError::Conflict(NAME_TAKEN_MESSAGE.to_string()));

        let events = events(&sub);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, input.id.to_string());
        assert_eq!(events[0].1.event_type(), CompanyEventType::CreatedFailed);
        assert_eq!(events[0].1.company(), &input);
        assert!(events[0].1.company().created_at.is_none());
    }

    #[tokio::test]
    async fn invalid_create_never_reaches_store_or_bus() {
        let (service, sub) = setup();
        let err = service.create_company(company("")).await.unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert!(service.store().is_empty());
        assert!(events(&sub).is_empty());
    }

    #[tokio::test]
    async fn delete_of_missing_company_is_not_found_without_event() {
        let (service, sub) = setup();
        let err = service.delete_company(CompanyId::new()).await.unwrap_err();

        assert_eq!(err, StoreError::NotFound);
        assert!(events(&sub).is_empty());
    }

    #[tokio::test]
    async fn delete_emits_success_with_fetched_entity() {
        let (service, sub) = setup();
        let created = service.create_company(company("Acme")).await.unwrap();
        sub.drain();

        service.delete_company(created.id).await.unwrap();

        let events = events(&sub);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].1.event_type(), CompanyEventType::DeletedSuccess);
        assert_eq!(events[0].1.company(), &created);
        assert_eq!(
            service.get_company_by_id(created.id).await,
            Err(StoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn patch_success_and_failure_snapshots() {
        let (service, sub) = setup();
        let acme = service.create_company(company("Acme")).await.unwrap();
        service.create_company(company("Globex")).await.unwrap();
        sub.drain();

        let ok = CompanyPatch {
            employees: Some(10),
            ..CompanyPatch::default()
        };
        let updated = service.patch_company(&acme, &ok).await.unwrap();
        assert_eq!(updated.employees, 10);
        assert_eq!(updated.name, "Acme");

        let clash = CompanyPatch {
            name: Some("globex".into()),
            ..CompanyPatch::default()
        };
        let err = service.patch_company(&updated, &clash).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let events = events(&sub);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].1.event_type(), CompanyEventType::PatchedSuccess);
        assert_eq!(events[0].1.company(), &updated);
        assert_eq!(events[1].1.event_type(), CompanyEventType::PatchedFailed);
        assert_eq!(events[1].1.company(), &updated);
        assert!(events.iter().all(|(key, _)| key == &acme.id.to_string()));
    }

    /// In-memory store whose deletes always fail at the database.
    struct DeleteFailsStore {
        inner: InMemoryCompanyStore,
    }

    #[async_trait]
    impl CompanyStore for DeleteFailsStore {
        async fn find_by_id(&self, id: CompanyId) -> Result<Company, StoreError> {
            self.inner.find_by_id(id).await
        }

        async fn create(&self, company: Company) -> Result<Company, StoreError> {
            self.inner.create(company).await
        }

        async fn delete(&self, _company: &Company) -> Result<(), StoreError> {
            Err(StoreError::Database("connection reset".into()))
        }

        async fn patch_update(
            &self,
            company: &Company,
            patch: &CompanyPatch,
        ) -> Result<Company, StoreError> {
            self.inner.patch_update(company, patch).await
        }
    }

    #[tokio::test]
    async fn failed_delete_emits_one_failed_event_with_fetched_entity() {
        let bus = Arc::new(InMemoryEventBus::new("company-events"));
        let sub = bus.subscribe();
        let store = DeleteFailsStore {
            inner: InMemoryCompanyStore::new(),
        };
        let service = CompanyService::new(store, bus);

        let created = service.create_company(company("Acme")).await.unwrap();
        sub.drain();

        let err = service.delete_company(created.id).await.unwrap_err();
        assert_eq!(err, StoreError::Database("connection reset".into()));

        let events = events(&sub);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, created.id.to_string());
        assert_eq!(events[0].1.event_type(), CompanyEventType::DeletedFailed);
        assert_eq!(events[0].1.company(), &created);
        assert_eq!(service.get_company_by_id(created.id).await.unwrap(), created);
    }

    struct BrokenBus;

    #[async_trait]
    impl EventBus for BrokenBus {
        fn topic(&self) -> &str {
            "broken"
        }

        async fn publish(&self, _message: KeyedMessage) -> Result<(), BusError> {
            Err(BusError::Connection("broker down".into()))
        }
    }

    #[tokio::test]
    async fn publish_failure_does_not_change_outcome() {
        let service = CompanyService::new(InMemoryCompanyStore::new(), BrokenBus);

        let created = service.create_company(company("Acme")).await.unwrap();
        let patch = CompanyPatch {
            registered: Some(false),
            ..CompanyPatch::default()
        };
        assert!(!service.patch_company(&created, &patch).await.unwrap().registered);
        service.delete_company(created.id).await.unwrap();
        assert!(service.store().is_empty());
    }
}
