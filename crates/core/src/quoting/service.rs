//! Quote service - issuance, revision and listing rules
//!
//! All money math happens here (or in the domain helpers it calls): line
//! subtotals, the quote total and the price snapshot taken from the material
//! catalog. Repositories only persist what this service derived.

use std::sync::Arc;

use chrono::{Duration, Utc};
use oficina_domain::{
    quote_total, NewQuote, NewQuoteItem, OficinaError, Page, Quote, QuoteItemDraft, QuoteLineItem,
    QuoteStatus, QuoteSummary, Result,
};
use rust_decimal::Decimal;

use super::ports::{NewQuoteRecord, QuoteFilter, QuoteRepository, QuoteRevision, QuoteUpdate};
use crate::catalog::ports::{ClientRepository, MaterialRepository};
use crate::user::ports::UserRepository;

/// Quote service
pub struct QuoteService {
    quotes: Arc<dyn QuoteRepository>,
    clients: Arc<dyn ClientRepository>,
    materials: Arc<dyn MaterialRepository>,
    users: Arc<dyn UserRepository>,
    validity_days: i64,
}

impl QuoteService {
    /// Create a new quote service with the configured default validity.
    pub fn new(
        quotes: Arc<dyn QuoteRepository>,
        clients: Arc<dyn ClientRepository>,
        materials: Arc<dyn MaterialRepository>,
        users: Arc<dyn UserRepository>,
        validity_days: i64,
    ) -> Self {
        Self { quotes, clients, materials, users, validity_days }
    }

    /// Issue a new quote.
    ///
    /// Items without an explicit unit price snapshot the material's current
    /// catalog price. The total is always derived:
    /// `sum(line subtotals) + labor`.
    pub async fn create_quote(&self, input: NewQuote) -> Result<Quote> {
        let service_description = input.service_description.trim().to_string();
        if service_description.is_empty() {
            return Err(OficinaError::Validation("service description is required".to_string()));
        }
        if input.labor_value.is_sign_negative() {
            return Err(OficinaError::Validation("labor value cannot be negative".to_string()));
        }
        if self.clients.get_by_id(input.client_id).await?.is_none() {
            return Err(OficinaError::Validation(format!(
                "client {} not found",
                input.client_id
            )));
        }
        if self.users.get_by_id(input.user_id).await?.is_none() {
            return Err(OficinaError::Validation(format!("user {} not found", input.user_id)));
        }

        let items = self.price_items(&input.items).await?;
        let total_value = quote_total(&items, input.labor_value);
        let validity_days = self.effective_validity(input.validity_days)?;

        let now = Utc::now();
        let record = NewQuoteRecord {
            client_id: input.client_id,
            user_id: input.user_id,
            service_description,
            labor_value: input.labor_value,
            total_value,
            issued_at: now.timestamp(),
            valid_until: now.date_naive() + Duration::days(validity_days),
            notes: input.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            items,
        };
        self.quotes.create(record).await
    }

    /// Replace the contents of a pending quote and recompute its totals.
    pub async fn revise_quote(&self, id: i64, revision: QuoteRevision) -> Result<Quote> {
        let quote = self.get_quote(id).await?;
        if !quote.status.is_editable() {
            return Err(OficinaError::InvalidTransition(format!(
                "quote {} is {} and can no longer be edited",
                quote.number, quote.status
            )));
        }

        let service_description = revision.service_description.trim().to_string();
        if service_description.is_empty() {
            return Err(OficinaError::Validation("service description is required".to_string()));
        }
        if revision.labor_value.is_sign_negative() {
            return Err(OficinaError::Validation("labor value cannot be negative".to_string()));
        }

        let items = self.price_items(&revision.items).await?;
        let total_value = quote_total(&items, revision.labor_value);
        let validity_days = self.effective_validity(revision.validity_days)?;

        let update = QuoteUpdate {
            service_description,
            labor_value: revision.labor_value,
            total_value,
            valid_until: Utc::now().date_naive() + Duration::days(validity_days),
            notes: revision.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            items,
        };
        self.quotes.update(id, update).await
    }

    /// Get a quote by ID.
    pub async fn get_quote(&self, id: i64) -> Result<Quote> {
        self.quotes
            .get_by_id(id)
            .await?
            .ok_or_else(|| OficinaError::NotFound(format!("quote {id} not found")))
    }

    /// Line items of a quote.
    pub async fn quote_items(&self, id: i64) -> Result<Vec<QuoteLineItem>> {
        self.get_quote(id).await?;
        self.quotes.items(id).await
    }

    /// Page through quotes, newest first.
    pub async fn list_quotes(&self, filter: &QuoteFilter, page: u32) -> Result<Page<QuoteSummary>> {
        self.quotes.list(filter, page).await
    }

    /// Delete a quote and its items. Accepted quotes are anchored by their
    /// service order and cannot be deleted.
    pub async fn delete_quote(&self, id: i64) -> Result<()> {
        let quote = self.get_quote(id).await?;
        if !quote.status.is_deletable() {
            return Err(OficinaError::InvalidTransition(format!(
                "quote {} was accepted and cannot be deleted",
                quote.number
            )));
        }
        self.quotes.delete(id).await
    }

    /// Resolves and prices line items, taking price snapshots where needed.
    async fn price_items(&self, items: &[NewQuoteItem]) -> Result<Vec<QuoteItemDraft>> {
        let mut drafts = Vec::with_capacity(items.len());
        for item in items {
            if item.quantity <= Decimal::ZERO {
                return Err(OficinaError::Validation(format!(
                    "item quantity must be positive (material {})",
                    item.material_id
                )));
            }
            let material =
                self.materials.get_by_id(item.material_id).await?.ok_or_else(|| {
                    OficinaError::Validation(format!("material {} not found", item.material_id))
                })?;
            let unit_price = item.unit_price.unwrap_or(material.unit_price);
            if unit_price.is_sign_negative() {
                return Err(OficinaError::Validation(format!(
                    "unit price cannot be negative (material {})",
                    material.code
                )));
            }
            drafts.push(QuoteItemDraft::price(material.id, item.quantity, unit_price));
        }
        Ok(drafts)
    }

    fn effective_validity(&self, requested: Option<i64>) -> Result<i64> {
        let days = requested.unwrap_or(self.validity_days);
        if days <= 0 {
            return Err(OficinaError::Validation(
                "validity must be at least one day".to_string(),
            ));
        }
        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use oficina_domain::constants::DEFAULT_VALIDITY_DAYS;
    use oficina_domain::{Client, Material, NewClient, NewMaterial, NewUser, User};
    use oficina_domain::DocumentSeries;

    use super::*;

    /// In-memory store standing in for every repository the service needs.
    #[derive(Default)]
    struct FakeStore {
        clients: Mutex<Vec<Client>>,
        materials: Mutex<Vec<Material>>,
        users: Mutex<Vec<User>>,
        quotes: Mutex<Vec<(Quote, Vec<QuoteLineItem>)>>,
    }

    impl FakeStore {
        fn seed_client(&self, id: i64, name: &str) {
            self.clients.lock().unwrap().push(Client {
                id,
                name: name.to_string(),
                tax_id: "12345678901".to_string(),
                phone: None,
                email: None,
                address: None,
                city: None,
                state: None,
                postal_code: None,
                created_at: 0,
            });
        }

        fn seed_material(&self, id: i64, code: &str, price: &str) {
            self.materials.lock().unwrap().push(Material {
                id,
                name: format!("Material {code}"),
                description: None,
                code: code.to_string(),
                unit_price: price.parse().unwrap(),
                stock_qty: 10,
                min_stock_qty: 1,
                unit: "UN".to_string(),
                created_at: 0,
            });
        }

        fn seed_user(&self, id: i64) {
            self.users.lock().unwrap().push(User {
                id,
                name: "Atendente".to_string(),
                email: "atendente@example.com".to_string(),
                active: true,
                created_at: 0,
            });
        }

        fn seed_quote(&self, id: i64, status: QuoteStatus) {
            self.quotes.lock().unwrap().push((
                Quote {
                    id,
                    number: DocumentSeries::Quote.format(2026, id as u32),
                    client_id: 1,
                    user_id: 1,
                    service_description: "Funilaria".to_string(),
                    labor_value: Decimal::ZERO,
                    total_value: Decimal::ZERO,
                    status,
                    issued_at: 0,
                    valid_until: Utc::now().date_naive(),
                    notes: None,
                },
                Vec::new(),
            ));
        }
    }

    #[async_trait]
    impl ClientRepository for FakeStore {
        async fn create(&self, _client: NewClient, _created_at: i64) -> Result<Client> {
            unreachable!("not used by quote tests")
        }
        async fn update(&self, _id: i64, _client: NewClient) -> Result<Client> {
            unreachable!("not used by quote tests")
        }
        async fn get_by_id(&self, id: i64) -> Result<Option<Client>> {
            Ok(self.clients.lock().unwrap().iter().find(|c| c.id == id).cloned())
        }
        async fn get_by_tax_id(&self, _tax_id: &str) -> Result<Option<Client>> {
            Ok(None)
        }
        async fn list(&self, _search: Option<&str>, _page: u32) -> Result<Page<Client>> {
            Ok(Page::new(Vec::new(), 1, 20, 0))
        }
        async fn quick_search(&self, _term: &str, _limit: u32) -> Result<Vec<Client>> {
            Ok(Vec::new())
        }
        async fn quote_count(&self, _id: i64) -> Result<u64> {
            Ok(0)
        }
        async fn delete(&self, _id: i64) -> Result<()> {
            Ok(())
        }
        async fn count(&self) -> Result<u64> {
            Ok(0)
        }
    }

    #[async_trait]
    impl MaterialRepository for FakeStore {
        async fn create(&self, _material: NewMaterial, _created_at: i64) -> Result<Material> {
            unreachable!("not used by quote tests")
        }
        async fn update(&self, _id: i64, _material: NewMaterial) -> Result<Material> {
            unreachable!("not used by quote tests")
        }
        async fn get_by_id(&self, id: i64) -> Result<Option<Material>> {
            Ok(self.materials.lock().unwrap().iter().find(|m| m.id == id).cloned())
        }
        async fn get_by_code(&self, _code: &str) -> Result<Option<Material>> {
            Ok(None)
        }
        async fn list(&self, _search: Option<&str>, _page: u32) -> Result<Page<Material>> {
            Ok(Page::new(Vec::new(), 1, 20, 0))
        }
        async fn quick_search(&self, _term: &str, _limit: u32) -> Result<Vec<Material>> {
            Ok(Vec::new())
        }
        async fn usage_count(&self, _id: i64) -> Result<u64> {
            Ok(0)
        }
        async fn set_stock(&self, _id: i64, _stock_qty: i64) -> Result<Material> {
            unreachable!("not used by quote tests")
        }
        async fn delete(&self, _id: i64) -> Result<()> {
            Ok(())
        }
        async fn count(&self) -> Result<u64> {
            Ok(0)
        }
        async fn low_stock_count(&self) -> Result<u64> {
            Ok(0)
        }
    }

    #[async_trait]
    impl UserRepository for FakeStore {
        async fn create(&self, _user: NewUser, _created_at: i64) -> Result<User> {
            unreachable!("not used by quote tests")
        }
        async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
            Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }
        async fn get_by_email(&self, _email: &str) -> Result<Option<User>> {
            Ok(None)
        }
        async fn list(&self) -> Result<Vec<User>> {
            Ok(Vec::new())
        }
        async fn set_active(&self, _id: i64, _active: bool) -> Result<User> {
            unreachable!("not used by quote tests")
        }
    }

    #[async_trait]
    impl QuoteRepository for FakeStore {
        async fn create(&self, record: NewQuoteRecord) -> Result<Quote> {
            let mut quotes = self.quotes.lock().unwrap();
            let id = quotes.len() as i64 + 1;
            let quote = Quote {
                id,
                number: DocumentSeries::Quote.format(2026, id as u32),
                client_id: record.client_id,
                user_id: record.user_id,
                service_description: record.service_description,
                labor_value: record.labor_value,
                total_value: record.total_value,
                status: QuoteStatus::Pending,
                issued_at: record.issued_at,
                valid_until: record.valid_until,
                notes: record.notes,
            };
            let items = record
                .items
                .iter()
                .enumerate()
                .map(|(i, draft)| QuoteLineItem {
                    id: i as i64 + 1,
                    quote_id: id,
                    material_id: draft.material_id,
                    quantity: draft.quantity,
                    unit_price: draft.unit_price,
                    subtotal: draft.subtotal,
                })
                .collect();
            quotes.push((quote.clone(), items));
            Ok(quote)
        }

        async fn update(&self, id: i64, update: QuoteUpdate) -> Result<Quote> {
            let mut quotes = self.quotes.lock().unwrap();
            let entry = quotes
                .iter_mut()
                .find(|(q, _)| q.id == id)
                .ok_or_else(|| OficinaError::NotFound(format!("quote {id} not found")))?;
            entry.0.service_description = update.service_description;
            entry.0.labor_value = update.labor_value;
            entry.0.total_value = update.total_value;
            entry.0.valid_until = update.valid_until;
            entry.0.notes = update.notes;
            Ok(entry.0.clone())
        }

        async fn get_by_id(&self, id: i64) -> Result<Option<Quote>> {
            Ok(self.quotes.lock().unwrap().iter().find(|(q, _)| q.id == id).map(|(q, _)| q.clone()))
        }

        async fn items(&self, quote_id: i64) -> Result<Vec<QuoteLineItem>> {
            Ok(self
                .quotes
                .lock()
                .unwrap()
                .iter()
                .find(|(q, _)| q.id == quote_id)
                .map(|(_, items)| items.clone())
                .unwrap_or_default())
        }

        async fn list(&self, _filter: &QuoteFilter, _page: u32) -> Result<Page<QuoteSummary>> {
            Ok(Page::new(Vec::new(), 1, 20, 0))
        }

        async fn delete(&self, id: i64) -> Result<()> {
            self.quotes.lock().unwrap().retain(|(q, _)| q.id != id);
            Ok(())
        }

        async fn count(&self) -> Result<u64> {
            Ok(self.quotes.lock().unwrap().len() as u64)
        }

        async fn count_by_status(&self, _status: QuoteStatus) -> Result<u64> {
            Ok(0)
        }

        async fn recent(&self, _limit: u32) -> Result<Vec<QuoteSummary>> {
            Ok(Vec::new())
        }
    }

    fn service(store: &Arc<FakeStore>) -> QuoteService {
        QuoteService::new(
            Arc::clone(store) as Arc<dyn QuoteRepository>,
            Arc::clone(store) as Arc<dyn ClientRepository>,
            Arc::clone(store) as Arc<dyn MaterialRepository>,
            Arc::clone(store) as Arc<dyn UserRepository>,
            DEFAULT_VALIDITY_DAYS,
        )
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn create_quote_snapshots_prices_and_derives_total() {
        let store = Arc::new(FakeStore::default());
        store.seed_client(1, "Ana");
        store.seed_material(1, "M1", "50.00");
        store.seed_user(1);
        let service = service(&store);

        let quote = service
            .create_quote(NewQuote {
                client_id: 1,
                user_id: 1,
                service_description: "Troca de para-choque".to_string(),
                labor_value: dec("100.00"),
                validity_days: None,
                notes: None,
                items: vec![NewQuoteItem { material_id: 1, quantity: dec("2"), unit_price: None }],
            })
            .await
            .unwrap();

        assert_eq!(quote.total_value, dec("200.00"));
        assert_eq!(quote.number, "ORC20260001");
        assert_eq!(quote.status, QuoteStatus::Pending);

        let items = service.quote_items(quote.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price, dec("50.00"));
        assert_eq!(items[0].subtotal, dec("100.00"));
    }

    #[tokio::test]
    async fn explicit_unit_price_overrides_catalog_price() {
        let store = Arc::new(FakeStore::default());
        store.seed_client(1, "Ana");
        store.seed_material(1, "M1", "50.00");
        store.seed_user(1);
        let service = service(&store);

        let quote = service
            .create_quote(NewQuote {
                client_id: 1,
                user_id: 1,
                service_description: "Pintura".to_string(),
                labor_value: Decimal::ZERO,
                validity_days: None,
                notes: None,
                items: vec![NewQuoteItem {
                    material_id: 1,
                    quantity: dec("1"),
                    unit_price: Some(dec("45.50")),
                }],
            })
            .await
            .unwrap();

        assert_eq!(quote.total_value, dec("45.50"));
    }

    #[tokio::test]
    async fn create_quote_rejects_non_positive_quantity() {
        let store = Arc::new(FakeStore::default());
        store.seed_client(1, "Ana");
        store.seed_material(1, "M1", "50.00");
        store.seed_user(1);
        let service = service(&store);

        let result = service
            .create_quote(NewQuote {
                client_id: 1,
                user_id: 1,
                service_description: "Pintura".to_string(),
                labor_value: Decimal::ZERO,
                validity_days: None,
                notes: None,
                items: vec![NewQuoteItem {
                    material_id: 1,
                    quantity: Decimal::ZERO,
                    unit_price: None,
                }],
            })
            .await;

        assert!(matches!(result, Err(OficinaError::Validation(_))));
    }

    #[tokio::test]
    async fn create_quote_rejects_unknown_material_and_empty_description() {
        let store = Arc::new(FakeStore::default());
        store.seed_client(1, "Ana");
        store.seed_user(1);
        let service = service(&store);

        let missing_material = service
            .create_quote(NewQuote {
                client_id: 1,
                user_id: 1,
                service_description: "Pintura".to_string(),
                labor_value: Decimal::ZERO,
                validity_days: None,
                notes: None,
                items: vec![NewQuoteItem { material_id: 99, quantity: dec("1"), unit_price: None }],
            })
            .await;
        assert!(matches!(missing_material, Err(OficinaError::Validation(_))));

        let blank = service
            .create_quote(NewQuote {
                client_id: 1,
                user_id: 1,
                service_description: "   ".to_string(),
                labor_value: Decimal::ZERO,
                validity_days: None,
                notes: None,
                items: Vec::new(),
            })
            .await;
        assert!(matches!(blank, Err(OficinaError::Validation(_))));
    }

    #[tokio::test]
    async fn accepted_quotes_cannot_be_revised_or_deleted() {
        let store = Arc::new(FakeStore::default());
        store.seed_quote(1, QuoteStatus::Accepted);
        let service = service(&store);

        let revision = QuoteRevision {
            service_description: "Nova descrição".to_string(),
            labor_value: Decimal::ZERO,
            validity_days: None,
            notes: None,
            items: Vec::new(),
        };
        let revise = service.revise_quote(1, revision).await;
        assert!(matches!(revise, Err(OficinaError::InvalidTransition(_))));

        let delete = service.delete_quote(1).await;
        assert!(matches!(delete, Err(OficinaError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn pending_quotes_can_be_deleted() {
        let store = Arc::new(FakeStore::default());
        store.seed_quote(1, QuoteStatus::Pending);
        let service = service(&store);

        service.delete_quote(1).await.unwrap();
        assert_eq!(store.quotes.lock().unwrap().len(), 0);
    }
}
