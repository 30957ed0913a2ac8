// tests/support/builders.rs
use cargodesk::application::dto::{AuthenticatedUser, RequestMeta};
use cargodesk::domain::audit::{AuditAction, AuditLog};
use cargodesk::domain::clearance::{Clearance, ClearanceId, ClearanceStatus};
use cargodesk::domain::lead::{Lead, LeadId, LeadStatus};
use cargodesk::domain::order::{Order, OrderId, OrderStatus};
use cargodesk::domain::quotation::{Quotation, QuotationId, QuotationItem, QuotationStatus, total_amount};
use cargodesk::domain::role::{RoleId, RoleName};
use cargodesk::domain::shipment::{Shipment, ShipmentId, ShipmentStatus};
use cargodesk::domain::user::{CompanyDetail, Email, PasswordHash, User, UserId, UserStatus};
use cargodesk::domain::workflow::{StatusTimeline, timeline_entry};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::support::mocks::default_role_id;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 10, 30, 0).unwrap()
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn dec(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap()
}

pub fn actor(id: i64, role: RoleName) -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId(id),
        name: format!("{} user", role.as_str()),
        email: format!("{}@cargodesk.test", role.slug()),
        role,
    }
}

pub fn admin() -> AuthenticatedUser {
    actor(1, RoleName::Admin)
}

pub fn back_office() -> AuthenticatedUser {
    actor(2, RoleName::BackOffice)
}

pub fn customer(id: i64) -> AuthenticatedUser {
    actor(id, RoleName::Customer)
}

pub fn supplier(id: i64) -> AuthenticatedUser {
    actor(id, RoleName::Supplier)
}

pub fn cha(id: i64) -> AuthenticatedUser {
    actor(id, RoleName::Cha)
}

pub fn meta() -> RequestMeta {
    RequestMeta {
        ip_address: Some("203.0.113.9".to_string()),
        user_agent: Some("cargodesk-tests/1.0".to_string()),
    }
}

pub fn lead(id: i64, company: &str) -> Lead {
    Lead {
        id: LeadId(id),
        company: company.to_string(),
        contact: "Jordan Lee".to_string(),
        email: Some(format!("sales@{}.test", company.to_lowercase())),
        phone: Some("+91-98100-00000".to_string()),
        value: Some(dec(12_500.0)),
        added_date: Some(day(2026, 3, 1)),
        last_contact: None,
        status: LeadStatus::New,
        created_at: fixed_now(),
    }
}

pub fn quotation_items() -> Vec<QuotationItem> {
    vec![
        QuotationItem::new("Ocean freight 20ft", 2, None, dec(850.0)).unwrap(),
        QuotationItem::new("Port handling", 1, Some("Lot".to_string()), dec(120.0)).unwrap(),
    ]
}

pub fn quotation(id: i64, customer_id: i64) -> Quotation {
    let items = quotation_items();
    let total = total_amount(&items);
    Quotation {
        id: QuotationId(id),
        quote_id: format!("Q-2026-{id:03}"),
        customer_id: UserId(customer_id),
        date: day(2026, 3, 10),
        valid_until: day(2026, 4, 10),
        status: QuotationStatus::Sent,
        terms_and_conditions: Some("Payment within 30 days.".to_string()),
        customer_note: None,
        total_amount: total,
        items,
        created_at: fixed_now(),
    }
}

pub fn order(id: i64, customer_id: i64) -> Order {
    Order {
        id: OrderId(id),
        order_no: format!("O-2026-{id:03}"),
        customer_id: UserId(customer_id),
        supplier_id: None,
        quotation_id: None,
        status: OrderStatus::Draft,
        status_timeline: StatusTimeline::seeded(timeline_entry(
            "draft",
            Some("Order created".to_string()),
            Some(UserId(1)),
            fixed_now(),
        )),
        origin_country: Some("China".to_string()),
        destination_port: Some("Nhava Sheva".to_string()),
        invoice_value: Some(dec(48_000.0)),
        currency: "USD".to_string(),
        expected_arrival_date: Some(day(2026, 4, 20)),
        notes: None,
        created_at: fixed_now(),
    }
}

pub fn shipment(id: i64, order_id: i64, customer_id: Option<i64>) -> Shipment {
    Shipment {
        id: ShipmentId(id),
        shipment_no: format!("SHIP-2026-{id:03}"),
        order_id: OrderId(order_id),
        customer_id: customer_id.map(UserId),
        order_customer_id: None,
        origin: Some("Shanghai".to_string()),
        destination: Some("Mumbai".to_string()),
        carrier_name: Some("Maersk".to_string()),
        tracking_no: Some(format!("MAEU{id:07}")),
        eta: Some(day(2026, 4, 18)),
        status: ShipmentStatus::InTransit,
        notes: None,
        created_at: fixed_now(),
    }
}

pub fn clearance(id: i64, shipment_id: i64, customer_id: Option<i64>) -> Clearance {
    Clearance {
        id: ClearanceId(id),
        clearance_no: format!("CLR-2026-{id:03}"),
        shipment_id: ShipmentId(shipment_id),
        cha_id: Some(UserId(4)),
        shipment_customer_id: customer_id.map(UserId),
        arrival_port: Some("Nhava Sheva".to_string()),
        arrival_date: Some(day(2026, 4, 18)),
        duty_amount: Some(dec(3_200.0)),
        currency: "USD".to_string(),
        status: ClearanceStatus::Pending,
        clearance_date: None,
        released_date: None,
        created_at: fixed_now(),
    }
}

pub fn user(id: i64, role: RoleName) -> User {
    User {
        id: UserId(id),
        name: format!("User {id}"),
        email: Email::new(format!("user{id}@cargodesk.test")).unwrap(),
        password_hash: PasswordHash::new("hashed:secret123").unwrap(),
        role_id: RoleId(default_role_id(role)),
        role,
        status: UserStatus::Active,
        company_detail: (role == RoleName::Customer).then(|| CompanyDetail {
            company_name: format!("Company {id}"),
        }),
        created_at: fixed_now(),
    }
}

pub fn audit_log(id: i64, action: AuditAction, actor_name: &str) -> AuditLog {
    AuditLog {
        id,
        user_id: Some(UserId(id)),
        user_name: Some(actor_name.to_string()),
        user_email: Some(format!(
            "{}@cargodesk.test",
            actor_name.to_lowercase().replace(' ', ".")
        )),
        role: Some("Admin".to_string()),
        action,
        entity_type: Some("Quotation".to_string()),
        entity_id: Some(id),
        description: Some(format!("{} quotation", action.as_str())),
        meta: Some(serde_json::json!({ "quote_id": format!("Q-2026-{id:03}") })),
        ip_address: Some("203.0.113.9".to_string()),
        user_agent: Some("cargodesk-tests/1.0".to_string()),
        created_at: fixed_now(),
    }
}
