// tests/support/mocks.rs
use async_trait::async_trait;
use cargodesk::application::dto::AuthenticatedUser;
use cargodesk::application::error::{ApplicationError, ApplicationResult};
use cargodesk::application::ports::security::{PasswordHasher, TokenAuthenticator};
use cargodesk::application::ports::time::Clock;
use cargodesk::domain::audit::{AuditFilter, AuditLog, AuditLogRepository, NewAuditLog};
use cargodesk::domain::clearance::{
    Clearance, ClearanceDocument, ClearanceFilter, ClearanceId, ClearanceRepository,
    ClearanceStatus, NewClearance, NewClearanceDocument,
};
use cargodesk::domain::errors::{DomainError, DomainResult};
use cargodesk::domain::lead::{Lead, LeadFilter, LeadId, LeadRepository, LeadStatus, LeadUpdate, NewLead};
use cargodesk::domain::listing::{Page, PageRequest};
use cargodesk::domain::order::{NewOrder, Order, OrderFilter, OrderId, OrderRepository, OrderStatus};
use cargodesk::domain::quotation::{
    NewQuotation, Quotation, QuotationFilter, QuotationId, QuotationItem, QuotationRepository,
    QuotationStatus,
};
use cargodesk::domain::role::{Role, RoleId, RoleName, RoleRepository, normalize_role_name};
use cargodesk::domain::shipment::{
    NewShipment, NewShipmentDocument, Shipment, ShipmentDocument, ShipmentFilter, ShipmentId,
    ShipmentRepository, ShipmentStatus,
};
use cargodesk::domain::user::{
    Email, NewUser, User, UserFilter, UserId, UserRepository, UserUpdate,
};
use cargodesk::domain::workflow::{EntityStatus, StatusTimeline};
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct DummyPasswordHasher;

#[async_trait]
impl PasswordHasher for DummyPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        Ok(format!("hashed:{password}"))
    }

    async fn verify(&self, _password: &str, _expected_hash: &str) -> ApplicationResult<()> {
        Ok(())
    }
}

/// A fixed token table standing in for the database-backed authenticator.
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, AuthenticatedUser>,
}

impl StaticTokenAuthenticator {
    pub fn new(tokens: impl IntoIterator<Item = (&'static str, AuthenticatedUser)>) -> Self {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(token, user)| (token.to_string(), user))
                .collect(),
        }
    }
}

#[async_trait]
impl TokenAuthenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| ApplicationError::unauthorized("Invalid or expired token"))
    }
}

/// Records every audit row it is given; the trail tests read them back.
#[derive(Default)]
pub struct RecordingAuditRepo {
    logs: Mutex<Vec<NewAuditLog>>,
    fail: bool,
}

impl RecordingAuditRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every insert fails, for the fire-and-forget tests.
    pub fn failing() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn records(&self) -> Vec<NewAuditLog> {
        self.logs.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditLogRepository for RecordingAuditRepo {
    async fn insert(&self, log: NewAuditLog) -> DomainResult<()> {
        if self.fail {
            return Err(DomainError::Persistence("audit store unavailable".into()));
        }
        self.logs.lock().unwrap().push(log);
        Ok(())
    }

    async fn list(&self, _filter: &AuditFilter, page: PageRequest) -> DomainResult<Page<AuditLog>> {
        Ok(Page::new(Vec::new(), 0, page))
    }

    async fn list_all(&self, _filter: &AuditFilter) -> DomainResult<Vec<AuditLog>> {
        Ok(Vec::new())
    }

    async fn action_counts(&self, _filter: &AuditFilter) -> DomainResult<Vec<(String, u64)>> {
        Ok(Vec::new())
    }
}

/// Pre-loaded audit rows with real filtering, for the query and CSV tests.
pub struct SeededAuditRepo {
    logs: Vec<AuditLog>,
}

impl SeededAuditRepo {
    pub fn new(logs: Vec<AuditLog>) -> Self {
        Self { logs }
    }

    fn matches(log: &AuditLog, filter: &AuditFilter) -> bool {
        if let Some(user) = &filter.user {
            let matched = if let Ok(id) = user.parse::<i64>() {
                log.user_id.map(i64::from) == Some(id)
            } else {
                let needle = user.to_lowercase();
                log.user_name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
                    || log
                        .user_email
                        .as_deref()
                        .is_some_and(|email| email.to_lowercase().contains(&needle))
            };
            if !matched {
                return false;
            }
        }
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            let haystacks = [
                Some(log.action.as_str().to_string()),
                log.role.clone(),
                log.entity_type.clone(),
                log.description.clone(),
                log.user_name.clone(),
                log.user_email.clone(),
            ];
            if !haystacks
                .iter()
                .flatten()
                .any(|value| value.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        if let Some(role) = &filter.role {
            let wanted = normalize_role_name(role);
            if !log
                .role
                .as_deref()
                .is_some_and(|value| normalize_role_name(value) == wanted)
            {
                return false;
            }
        }
        if let Some(action) = filter.action
            && log.action != action
        {
            return false;
        }
        if !filter.dates.is_empty() && !filter.dates.contains(log.created_at.date_naive()) {
            return false;
        }
        true
    }
}

#[async_trait]
impl AuditLogRepository for SeededAuditRepo {
    async fn insert(&self, _log: NewAuditLog) -> DomainResult<()> {
        Ok(())
    }

    async fn list(&self, filter: &AuditFilter, page: PageRequest) -> DomainResult<Page<AuditLog>> {
        let matching: Vec<AuditLog> = self
            .logs
            .iter()
            .filter(|log| Self::matches(log, filter))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn list_all(&self, filter: &AuditFilter) -> DomainResult<Vec<AuditLog>> {
        Ok(self
            .logs
            .iter()
            .filter(|log| Self::matches(log, filter))
            .cloned()
            .collect())
    }

    async fn action_counts(&self, filter: &AuditFilter) -> DomainResult<Vec<(String, u64)>> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for log in self.logs.iter().filter(|log| Self::matches(log, filter)) {
            *counts.entry(log.action.as_str().to_string()).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

#[derive(Default)]
pub struct InMemoryLeadRepo {
    leads: Mutex<HashMap<i64, Lead>>,
    deleted: Mutex<HashSet<i64>>,
    next_id: Mutex<i64>,
}

impl InMemoryLeadRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(leads: Vec<Lead>) -> Self {
        let max = leads.iter().map(|lead| i64::from(lead.id)).max().unwrap_or(0);
        Self {
            leads: Mutex::new(leads.into_iter().map(|lead| (lead.id.into(), lead)).collect()),
            deleted: Mutex::new(HashSet::new()),
            next_id: Mutex::new(max),
        }
    }

    fn alloc(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        *next
    }

    fn live(&self, id: i64) -> Option<Lead> {
        if self.deleted.lock().unwrap().contains(&id) {
            return None;
        }
        self.leads.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl LeadRepository for InMemoryLeadRepo {
    async fn insert(&self, new_lead: NewLead) -> DomainResult<Lead> {
        let id = self.alloc();
        let lead = Lead {
            id: LeadId(id),
            company: new_lead.company,
            contact: new_lead.contact,
            email: new_lead.email,
            phone: new_lead.phone,
            value: new_lead.value,
            added_date: new_lead.added_date,
            last_contact: new_lead.last_contact,
            status: new_lead.status,
            created_at: new_lead.created_at,
        };
        self.leads.lock().unwrap().insert(id, lead.clone());
        Ok(lead)
    }

    async fn find_by_id(&self, id: LeadId) -> DomainResult<Option<Lead>> {
        Ok(self.live(id.into()))
    }

    async fn update(&self, update: LeadUpdate) -> DomainResult<Lead> {
        let id = i64::from(update.id);
        let mut leads = self.leads.lock().unwrap();
        let lead = leads
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("lead not found".into()))?;
        if let Some(company) = update.company {
            lead.company = company;
        }
        if let Some(contact) = update.contact {
            lead.contact = contact;
        }
        if let Some(email) = update.email {
            lead.email = email;
        }
        if let Some(phone) = update.phone {
            lead.phone = phone;
        }
        if let Some(value) = update.value {
            lead.value = value;
        }
        if let Some(added_date) = update.added_date {
            lead.added_date = added_date;
        }
        if let Some(last_contact) = update.last_contact {
            lead.last_contact = last_contact;
        }
        if let Some(status) = update.status {
            lead.status = status;
        }
        Ok(lead.clone())
    }

    async fn update_status(&self, id: LeadId, status: LeadStatus) -> DomainResult<Lead> {
        let mut leads = self.leads.lock().unwrap();
        let lead = leads
            .get_mut(&i64::from(id))
            .ok_or_else(|| DomainError::NotFound("lead not found".into()))?;
        lead.status = status;
        Ok(lead.clone())
    }

    async fn soft_delete(&self, id: LeadId) -> DomainResult<()> {
        self.deleted.lock().unwrap().insert(id.into());
        Ok(())
    }

    async fn list(&self, filter: &LeadFilter, page: PageRequest) -> DomainResult<Page<Lead>> {
        let deleted = self.deleted.lock().unwrap().clone();
        let mut matching: Vec<Lead> = self
            .leads
            .lock()
            .unwrap()
            .values()
            .filter(|lead| !deleted.contains(&i64::from(lead.id)))
            .filter(|lead| {
                if let Some(search) = &filter.search {
                    let needle = search.to_lowercase();
                    let hit = lead.company.to_lowercase().contains(&needle)
                        || lead.contact.to_lowercase().contains(&needle)
                        || lead
                            .email
                            .as_deref()
                            .is_some_and(|email| email.to_lowercase().contains(&needle))
                        || lead
                            .phone
                            .as_deref()
                            .is_some_and(|phone| phone.to_lowercase().contains(&needle));
                    if !hit {
                        return false;
                    }
                }
                if let Some(status) = filter.status
                    && lead.status != status
                {
                    return false;
                }
                if !filter.dates.is_empty() {
                    return lead
                        .added_date
                        .is_some_and(|date| filter.dates.contains(date));
                }
                true
            })
            .cloned()
            .collect();
        matching.sort_by_key(|lead| std::cmp::Reverse(i64::from(lead.id)));
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }
}

#[derive(Default)]
pub struct InMemoryQuotationRepo {
    quotations: Mutex<HashMap<i64, Quotation>>,
    deleted: Mutex<HashSet<i64>>,
    next_id: Mutex<i64>,
}

impl InMemoryQuotationRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(quotations: Vec<Quotation>) -> Self {
        let max = quotations.iter().map(|q| i64::from(q.id)).max().unwrap_or(0);
        Self {
            quotations: Mutex::new(
                quotations.into_iter().map(|q| (q.id.into(), q)).collect(),
            ),
            deleted: Mutex::new(HashSet::new()),
            next_id: Mutex::new(max),
        }
    }
}

#[async_trait]
impl QuotationRepository for InMemoryQuotationRepo {
    async fn insert(&self, new_quotation: NewQuotation) -> DomainResult<Quotation> {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let quotation = Quotation {
            id: QuotationId(*next),
            quote_id: new_quotation.quote_id,
            customer_id: new_quotation.customer_id,
            date: new_quotation.date,
            valid_until: new_quotation.valid_until,
            status: new_quotation.status,
            terms_and_conditions: new_quotation.terms_and_conditions,
            customer_note: None,
            total_amount: new_quotation.total_amount,
            items: new_quotation.items,
            created_at: new_quotation.created_at,
        };
        self.quotations
            .lock()
            .unwrap()
            .insert(*next, quotation.clone());
        Ok(quotation)
    }

    async fn find_by_id(&self, id: QuotationId) -> DomainResult<Option<Quotation>> {
        let id = i64::from(id);
        if self.deleted.lock().unwrap().contains(&id) {
            return Ok(None);
        }
        Ok(self.quotations.lock().unwrap().get(&id).cloned())
    }

    async fn replace_items(
        &self,
        id: QuotationId,
        items: &[QuotationItem],
        total: Decimal,
    ) -> DomainResult<Quotation> {
        let mut quotations = self.quotations.lock().unwrap();
        let quotation = quotations
            .get_mut(&i64::from(id))
            .ok_or_else(|| DomainError::NotFound("quotation not found".into()))?;
        quotation.items = items.to_vec();
        quotation.total_amount = total;
        Ok(quotation.clone())
    }

    async fn update_status(
        &self,
        id: QuotationId,
        status: QuotationStatus,
        customer_note: Option<&str>,
    ) -> DomainResult<Quotation> {
        let mut quotations = self.quotations.lock().unwrap();
        let quotation = quotations
            .get_mut(&i64::from(id))
            .ok_or_else(|| DomainError::NotFound("quotation not found".into()))?;
        quotation.status = status;
        if let Some(note) = customer_note {
            quotation.customer_note = Some(note.to_string());
        }
        Ok(quotation.clone())
    }

    async fn soft_delete(&self, id: QuotationId) -> DomainResult<()> {
        self.deleted.lock().unwrap().insert(id.into());
        Ok(())
    }

    async fn list(
        &self,
        filter: &QuotationFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Quotation>> {
        let deleted = self.deleted.lock().unwrap().clone();
        let mut matching: Vec<Quotation> = self
            .quotations
            .lock()
            .unwrap()
            .values()
            .filter(|q| !deleted.contains(&i64::from(q.id)))
            .filter(|q| {
                if let Some(status) = filter.status
                    && q.status != status
                {
                    return false;
                }
                if let Some(scope) = filter.customer_scope
                    && q.customer_id != scope
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();
        matching.sort_by_key(|q| std::cmp::Reverse(i64::from(q.id)));
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn count_created_in_year(&self, year: i32) -> DomainResult<u64> {
        // Soft-deleted rows still count so numbers are never reissued.
        Ok(self
            .quotations
            .lock()
            .unwrap()
            .values()
            .filter(|q| q.created_at.year() == year)
            .count() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryOrderRepo {
    orders: Mutex<HashMap<i64, Order>>,
    next_id: Mutex<i64>,
}

impl InMemoryOrderRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(orders: Vec<Order>) -> Self {
        let max = orders.iter().map(|o| i64::from(o.id)).max().unwrap_or(0);
        Self {
            orders: Mutex::new(orders.into_iter().map(|o| (o.id.into(), o)).collect()),
            next_id: Mutex::new(max),
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepo {
    async fn insert(&self, new_order: NewOrder) -> DomainResult<Order> {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let order = Order {
            id: OrderId(*next),
            order_no: new_order.order_no,
            customer_id: new_order.customer_id,
            supplier_id: new_order.supplier_id,
            quotation_id: new_order.quotation_id,
            status: new_order.status,
            status_timeline: new_order.status_timeline,
            origin_country: new_order.origin_country,
            destination_port: new_order.destination_port,
            invoice_value: new_order.invoice_value,
            currency: new_order.currency,
            expected_arrival_date: new_order.expected_arrival_date,
            notes: new_order.notes,
            created_at: new_order.created_at,
        };
        self.orders.lock().unwrap().insert(*next, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> DomainResult<Option<Order>> {
        Ok(self.orders.lock().unwrap().get(&i64::from(id)).cloned())
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        timeline: &StatusTimeline,
    ) -> DomainResult<Order> {
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .get_mut(&i64::from(id))
            .ok_or_else(|| DomainError::NotFound("order not found".into()))?;
        order.status = status;
        order.status_timeline = timeline.clone();
        Ok(order.clone())
    }

    async fn list(&self, filter: &OrderFilter, page: PageRequest) -> DomainResult<Page<Order>> {
        let mut matching: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| {
                if let Some(status) = filter.status
                    && o.status != status
                {
                    return false;
                }
                if let Some(scope) = filter.customer_scope
                    && !o.is_owned_by(scope)
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();
        matching.sort_by_key(|o| std::cmp::Reverse(i64::from(o.id)));
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn count_created_in_year(&self, year: i32) -> DomainResult<u64> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.created_at.year() == year)
            .count() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryShipmentRepo {
    shipments: Mutex<HashMap<i64, Shipment>>,
    documents: Mutex<Vec<ShipmentDocument>>,
    next_id: Mutex<i64>,
}

impl InMemoryShipmentRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(shipments: Vec<Shipment>) -> Self {
        let max = shipments.iter().map(|s| i64::from(s.id)).max().unwrap_or(0);
        Self {
            shipments: Mutex::new(shipments.into_iter().map(|s| (s.id.into(), s)).collect()),
            documents: Mutex::new(Vec::new()),
            next_id: Mutex::new(max),
        }
    }

    fn in_scope(shipment: &Shipment, scope: Option<UserId>) -> bool {
        match scope {
            Some(user_id) => shipment.is_owned_by(user_id),
            None => true,
        }
    }
}

#[async_trait]
impl ShipmentRepository for InMemoryShipmentRepo {
    async fn insert(&self, new_shipment: NewShipment) -> DomainResult<Shipment> {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let shipment = Shipment {
            id: ShipmentId(*next),
            shipment_no: new_shipment.shipment_no,
            order_id: new_shipment.order_id,
            customer_id: new_shipment.customer_id,
            order_customer_id: None,
            origin: new_shipment.origin,
            destination: new_shipment.destination,
            carrier_name: new_shipment.carrier_name,
            tracking_no: new_shipment.tracking_no,
            eta: new_shipment.eta,
            status: new_shipment.status,
            notes: new_shipment.notes,
            created_at: new_shipment.created_at,
        };
        self.shipments.lock().unwrap().insert(*next, shipment.clone());
        Ok(shipment)
    }

    async fn find_by_id(&self, id: ShipmentId) -> DomainResult<Option<Shipment>> {
        Ok(self.shipments.lock().unwrap().get(&i64::from(id)).cloned())
    }

    async fn update_status(
        &self,
        id: ShipmentId,
        status: ShipmentStatus,
    ) -> DomainResult<Shipment> {
        let mut shipments = self.shipments.lock().unwrap();
        let shipment = shipments
            .get_mut(&i64::from(id))
            .ok_or_else(|| DomainError::NotFound("shipment not found".into()))?;
        shipment.status = status;
        Ok(shipment.clone())
    }

    async fn list(
        &self,
        filter: &ShipmentFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Shipment>> {
        let mut matching: Vec<Shipment> = self
            .shipments
            .lock()
            .unwrap()
            .values()
            .filter(|s| Self::in_scope(s, filter.customer_scope))
            .filter(|s| {
                if let Some(status) = filter.status
                    && s.status != status
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();
        matching.sort_by_key(|s| std::cmp::Reverse(i64::from(s.id)));
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn status_counts(&self, scope: Option<UserId>) -> DomainResult<Vec<(String, u64)>> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for shipment in self
            .shipments
            .lock()
            .unwrap()
            .values()
            .filter(|s| Self::in_scope(s, scope))
        {
            *counts
                .entry(shipment.status.as_str().to_string())
                .or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn count_created_in_year(&self, year: i32) -> DomainResult<u64> {
        Ok(self
            .shipments
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.created_at.year() == year)
            .count() as u64)
    }

    async fn add_document(&self, document: NewShipmentDocument) -> DomainResult<ShipmentDocument> {
        let mut documents = self.documents.lock().unwrap();
        let stored = ShipmentDocument {
            id: documents.len() as i64 + 1,
            shipment_id: document.shipment_id,
            uploaded_by: document.uploaded_by,
            file_name: document.file_name,
            file_path: document.file_path,
            mime_type: document.mime_type,
            file_size: document.file_size,
            created_at: Utc::now(),
        };
        documents.push(stored.clone());
        Ok(stored)
    }

    async fn list_documents(&self, id: ShipmentId) -> DomainResult<Vec<ShipmentDocument>> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|doc| doc.shipment_id == id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryClearanceRepo {
    clearances: Mutex<HashMap<i64, Clearance>>,
    documents: Mutex<Vec<ClearanceDocument>>,
    next_id: Mutex<i64>,
}

impl InMemoryClearanceRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(clearances: Vec<Clearance>) -> Self {
        let max = clearances.iter().map(|c| i64::from(c.id)).max().unwrap_or(0);
        Self {
            clearances: Mutex::new(clearances.into_iter().map(|c| (c.id.into(), c)).collect()),
            documents: Mutex::new(Vec::new()),
            next_id: Mutex::new(max),
        }
    }
}

#[async_trait]
impl ClearanceRepository for InMemoryClearanceRepo {
    async fn insert(&self, new_clearance: NewClearance) -> DomainResult<Clearance> {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let clearance = Clearance {
            id: ClearanceId(*next),
            clearance_no: new_clearance.clearance_no,
            shipment_id: new_clearance.shipment_id,
            cha_id: new_clearance.cha_id,
            shipment_customer_id: None,
            arrival_port: new_clearance.arrival_port,
            arrival_date: new_clearance.arrival_date,
            duty_amount: new_clearance.duty_amount,
            currency: new_clearance.currency,
            status: new_clearance.status,
            clearance_date: None,
            released_date: None,
            created_at: new_clearance.created_at,
        };
        self.clearances
            .lock()
            .unwrap()
            .insert(*next, clearance.clone());
        Ok(clearance)
    }

    async fn find_by_id(&self, id: ClearanceId) -> DomainResult<Option<Clearance>> {
        Ok(self.clearances.lock().unwrap().get(&i64::from(id)).cloned())
    }

    async fn update_status(
        &self,
        id: ClearanceId,
        status: ClearanceStatus,
        status_date: Option<chrono::NaiveDate>,
    ) -> DomainResult<Clearance> {
        let mut clearances = self.clearances.lock().unwrap();
        let clearance = clearances
            .get_mut(&i64::from(id))
            .ok_or_else(|| DomainError::NotFound("clearance not found".into()))?;
        clearance.status = status;
        match status {
            ClearanceStatus::Cleared => {
                clearance.clearance_date = clearance.clearance_date.or(status_date);
            }
            ClearanceStatus::Released => {
                clearance.released_date = clearance.released_date.or(status_date);
            }
            _ => {}
        }
        Ok(clearance.clone())
    }

    async fn list(
        &self,
        filter: &ClearanceFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Clearance>> {
        let mut matching: Vec<Clearance> = self
            .clearances
            .lock()
            .unwrap()
            .values()
            .filter(|c| {
                if let Some(status) = filter.status
                    && c.status != status
                {
                    return false;
                }
                if let Some(scope) = filter.customer_scope
                    && !c.is_owned_by(scope)
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();
        matching.sort_by_key(|c| std::cmp::Reverse(i64::from(c.id)));
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn count_created_in_year(&self, year: i32) -> DomainResult<u64> {
        Ok(self
            .clearances
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.created_at.year() == year)
            .count() as u64)
    }

    async fn add_document(
        &self,
        document: NewClearanceDocument,
    ) -> DomainResult<ClearanceDocument> {
        let mut documents = self.documents.lock().unwrap();
        let stored = ClearanceDocument {
            id: documents.len() as i64 + 1,
            clearance_id: document.clearance_id,
            uploaded_by: document.uploaded_by,
            file_name: document.file_name,
            file_path: document.file_path,
            mime_type: document.mime_type,
            file_size: document.file_size,
            created_at: Utc::now(),
        };
        documents.push(stored.clone());
        Ok(stored)
    }

    async fn list_documents(&self, id: ClearanceId) -> DomainResult<Vec<ClearanceDocument>> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|doc| doc.clearance_id == id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepo {
    users: Mutex<HashMap<i64, User>>,
    deleted: Mutex<HashSet<i64>>,
    next_id: Mutex<i64>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(users: Vec<User>) -> Self {
        let max = users.iter().map(|u| i64::from(u.id)).max().unwrap_or(0);
        Self {
            users: Mutex::new(users.into_iter().map(|u| (u.id.into(), u)).collect()),
            deleted: Mutex::new(HashSet::new()),
            next_id: Mutex::new(max),
        }
    }

    pub fn is_deleted(&self, id: i64) -> bool {
        self.deleted.lock().unwrap().contains(&id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let role = RoleName::ALL
            .iter()
            .copied()
            .find(|role| default_role_id(*role) == i64::from(new_user.role_id))
            .unwrap_or(RoleName::Customer);
        let user = User {
            id: UserId::new(*next)?,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role_id: new_user.role_id,
            role,
            status: new_user.status,
            company_detail: new_user.company_detail,
            created_at: new_user.created_at,
        };
        self.users.lock().unwrap().insert(*next, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        let id = i64::from(id);
        if self.deleted.lock().unwrap().contains(&id) {
            return Ok(None);
        }
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> DomainResult<Option<User>> {
        let deleted = self.deleted.lock().unwrap().clone();
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == *email && !deleted.contains(&i64::from(u.id)))
            .cloned())
    }

    async fn update(&self, update: UserUpdate) -> DomainResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&i64::from(update.id))
            .ok_or_else(|| DomainError::NotFound("user not found".into()))?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(role_id) = update.role_id {
            user.role_id = role_id;
            if let Some(role) = RoleName::ALL
                .iter()
                .copied()
                .find(|role| default_role_id(*role) == i64::from(role_id))
            {
                user.role = role;
            }
        }
        if let Some(status) = update.status {
            user.status = status;
        }
        if let Some(detail) = update.company_detail {
            user.company_detail = detail;
        }
        Ok(user.clone())
    }

    async fn soft_delete(&self, id: UserId) -> DomainResult<()> {
        self.deleted.lock().unwrap().insert(id.into());
        Ok(())
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> DomainResult<Page<User>> {
        let deleted = self.deleted.lock().unwrap().clone();
        let mut matching: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| !deleted.contains(&i64::from(u.id)))
            .filter(|u| {
                if let Some(search) = &filter.search {
                    let needle = search.to_lowercase();
                    let hit = u.name.to_lowercase().contains(&needle)
                        || u.email.as_str().contains(&needle)
                        || u.company_detail
                            .as_ref()
                            .is_some_and(|d| d.company_name.to_lowercase().contains(&needle));
                    if !hit {
                        return false;
                    }
                }
                if let Some(role) = filter.role
                    && u.role != role
                {
                    return false;
                }
                if let Some(status) = filter.status
                    && u.status != status
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();
        matching.sort_by_key(|u| std::cmp::Reverse(i64::from(u.id)));
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn count_by_role(&self, role: RoleName) -> DomainResult<u64> {
        let deleted = self.deleted.lock().unwrap().clone();
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.role == role && !deleted.contains(&i64::from(u.id)))
            .count() as u64)
    }

    async fn count_all(&self) -> DomainResult<u64> {
        let deleted = self.deleted.lock().unwrap().clone();
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| !deleted.contains(&i64::from(u.id)))
            .count() as u64)
    }
}

/// Stable ids for the five seeded roles, mirroring the first migration.
pub fn default_role_id(role: RoleName) -> i64 {
    match role {
        RoleName::Admin => 1,
        RoleName::Customer => 2,
        RoleName::Supplier => 3,
        RoleName::Cha => 4,
        RoleName::BackOffice => 5,
    }
}

pub struct InMemoryRoleRepo {
    roles: Mutex<Vec<Role>>,
    user_counts: Mutex<HashMap<i64, u64>>,
}

impl InMemoryRoleRepo {
    /// All five known roles, no users assigned.
    pub fn seeded() -> Self {
        let roles = RoleName::ALL
            .iter()
            .map(|role| Role {
                id: RoleId(default_role_id(*role)),
                name: *role,
                slug: role.slug(),
            })
            .collect();
        Self {
            roles: Mutex::new(roles),
            user_counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_user_count(self, role: RoleName, count: u64) -> Self {
        self.user_counts
            .lock()
            .unwrap()
            .insert(default_role_id(role), count);
        self
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepo {
    async fn insert(&self, name: RoleName, slug: &str) -> DomainResult<Role> {
        let mut roles = self.roles.lock().unwrap();
        let id = roles.iter().map(|r| i64::from(r.id)).max().unwrap_or(0) + 1;
        let role = Role {
            id: RoleId(id),
            name,
            slug: slug.to_string(),
        };
        roles.push(role.clone());
        Ok(role)
    }

    async fn find_by_id(&self, id: RoleId) -> DomainResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: RoleName) -> DomainResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Role>> {
        Ok(self.roles.lock().unwrap().clone())
    }

    async fn rename(&self, id: RoleId, name: RoleName, slug: &str) -> DomainResult<Role> {
        let mut roles = self.roles.lock().unwrap();
        let role = roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DomainError::NotFound("role not found".into()))?;
        role.name = name;
        role.slug = slug.to_string();
        Ok(role.clone())
    }

    async fn delete(&self, id: RoleId) -> DomainResult<()> {
        self.roles.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }

    async fn user_count(&self, id: RoleId) -> DomainResult<u64> {
        Ok(self
            .user_counts
            .lock()
            .unwrap()
            .get(&i64::from(id))
            .copied()
            .unwrap_or(0))
    }
}
