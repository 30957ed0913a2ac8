// src/application/services.rs
//
// Central wiring point: every repository and port comes in as an
// `Arc<dyn ...>`, every service goes out ready to be shared by the HTTP
// layer.
use crate::application::audit::AuditRecorder;
use crate::application::commands::clearances::ClearanceCommandService;
use crate::application::commands::leads::LeadCommandService;
use crate::application::commands::orders::OrderCommandService;
use crate::application::commands::quotations::QuotationCommandService;
use crate::application::commands::roles::RoleCommandService;
use crate::application::commands::shipments::ShipmentCommandService;
use crate::application::commands::users::UserCommandService;
use crate::application::ports::security::{PasswordHasher, TokenAuthenticator};
use crate::application::ports::time::Clock;
use crate::application::queries::audit::AuditQueryService;
use crate::application::queries::clearances::ClearanceQueryService;
use crate::application::queries::leads::LeadQueryService;
use crate::application::queries::orders::OrderQueryService;
use crate::application::queries::quotations::QuotationQueryService;
use crate::application::queries::roles::RoleQueryService;
use crate::application::queries::shipments::ShipmentQueryService;
use crate::application::queries::users::UserQueryService;
use crate::domain::audit::AuditLogRepository;
use crate::domain::clearance::ClearanceRepository;
use crate::domain::lead::LeadRepository;
use crate::domain::order::OrderRepository;
use crate::domain::quotation::QuotationRepository;
use crate::domain::role::RoleRepository;
use crate::domain::shipment::ShipmentRepository;
use crate::domain::user::UserRepository;
use std::sync::Arc;

pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub leads: Arc<dyn LeadRepository>,
    pub quotations: Arc<dyn QuotationRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub shipments: Arc<dyn ShipmentRepository>,
    pub clearances: Arc<dyn ClearanceRepository>,
    pub audit_logs: Arc<dyn AuditLogRepository>,
}

pub struct Ports {
    pub clock: Arc<dyn Clock>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub token_authenticator: Arc<dyn TokenAuthenticator>,
}

pub struct ApplicationServices {
    pub lead_commands: LeadCommandService,
    pub lead_queries: LeadQueryService,
    pub quotation_commands: QuotationCommandService,
    pub quotation_queries: QuotationQueryService,
    pub order_commands: OrderCommandService,
    pub order_queries: OrderQueryService,
    pub shipment_commands: ShipmentCommandService,
    pub shipment_queries: ShipmentQueryService,
    pub clearance_commands: ClearanceCommandService,
    pub clearance_queries: ClearanceQueryService,
    pub user_commands: UserCommandService,
    pub user_queries: UserQueryService,
    pub role_commands: RoleCommandService,
    pub role_queries: RoleQueryService,
    pub audit_queries: AuditQueryService,
    token_authenticator: Arc<dyn TokenAuthenticator>,
}

impl ApplicationServices {
    pub fn new(repos: Repositories, ports: Ports) -> Self {
        let audit = Arc::new(AuditRecorder::new(repos.audit_logs.clone()));

        Self {
            lead_commands: LeadCommandService::new(
                repos.leads.clone(),
                audit.clone(),
                ports.clock.clone(),
            ),
            lead_queries: LeadQueryService::new(repos.leads.clone()),
            quotation_commands: QuotationCommandService::new(
                repos.quotations.clone(),
                repos.users.clone(),
                audit.clone(),
                ports.clock.clone(),
            ),
            quotation_queries: QuotationQueryService::new(repos.quotations.clone()),
            order_commands: OrderCommandService::new(
                repos.orders.clone(),
                repos.quotations.clone(),
                repos.users.clone(),
                audit.clone(),
                ports.clock.clone(),
            ),
            order_queries: OrderQueryService::new(repos.orders.clone()),
            shipment_commands: ShipmentCommandService::new(
                repos.shipments.clone(),
                repos.orders.clone(),
                audit.clone(),
                ports.clock.clone(),
            ),
            shipment_queries: ShipmentQueryService::new(repos.shipments.clone()),
            clearance_commands: ClearanceCommandService::new(
                repos.clearances.clone(),
                repos.shipments.clone(),
                audit.clone(),
                ports.clock.clone(),
            ),
            clearance_queries: ClearanceQueryService::new(repos.clearances.clone()),
            user_commands: UserCommandService::new(
                repos.users.clone(),
                repos.roles.clone(),
                ports.password_hasher.clone(),
                audit.clone(),
                ports.clock.clone(),
            ),
            user_queries: UserQueryService::new(repos.users.clone()),
            role_commands: RoleCommandService::new(repos.roles.clone()),
            role_queries: RoleQueryService::new(repos.roles),
            audit_queries: AuditQueryService::new(repos.audit_logs, ports.clock),
            token_authenticator: ports.token_authenticator,
        }
    }

    pub fn token_authenticator(&self) -> Arc<dyn TokenAuthenticator> {
        self.token_authenticator.clone()
    }
}
