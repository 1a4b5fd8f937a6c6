// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for indexplus-server.
//!
//! This module provides the OpenAPI specification for the Index Plus API,
//! generated from Rust types using utoipa. The raw JSON spec is served at
//! `/api/docs/openapi.json`.

use utoipa::OpenApi;

/// Main OpenAPI documentation struct.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Index Plus API",
        version = "1.0.0",
        description = "Multi-tenant customer messaging and sales dashboard API. Index Plus provides a shared inbox, CRM, sales tracking, automation flows, and role-based team management per company workspace.",
        license(name = "Proprietary"),
        contact(
            name = "Geoffrey Huntley",
            email = "ghuntley@ghuntley.com",
            url = "https://ghuntley.com"
        )
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "auth", description = "Signup, login, logout, and the external channel callback relay"),
        (name = "dashboard", description = "Protected page descriptors with per-capability grants"),
        (name = "team", description = "Team member lifecycle and role management"),
        (name = "customers", description = "CRM customer directory"),
        (name = "sales", description = "Sales ledger"),
        (name = "inbox", description = "Conversations, messages, and conversation-to-sale conversion"),
        (name = "automation", description = "Automation flow templates"),
        (name = "channels", description = "Connected messaging channels"),
        (name = "settings", description = "Company workspace settings"),
        (name = "billing", description = "Subscription payments and account status"),
        (name = "analytics", description = "Company analytics counts"),
        (name = "audit", description = "Company audit trail"),
        (name = "health", description = "Health checks and system status")
    ),
    paths(
        // Auth endpoints
        crate::routes::auth::login_page,
        crate::routes::auth::signup_page,
        crate::routes::auth::signup,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::external_callback,
        // Dashboard pages
        crate::routes::dashboard::overview_page,
        crate::routes::dashboard::inbox_page,
        crate::routes::dashboard::crm_page,
        crate::routes::dashboard::sales_page,
        crate::routes::dashboard::analytics_page,
        crate::routes::dashboard::automation_page,
        crate::routes::dashboard::billing_page,
        crate::routes::dashboard::settings_page,
        crate::routes::dashboard::team_page,
        crate::routes::dashboard::channels_page,
        crate::routes::dashboard::audit_page,
        // Team endpoints
        crate::routes::team::list_members,
        crate::routes::team::create_member,
        crate::routes::team::update_member,
        crate::routes::team::delete_member,
        crate::routes::team::update_member_password,
        // Customer endpoints
        crate::routes::customers::list_customers,
        crate::routes::customers::create_customer,
        crate::routes::customers::update_customer,
        crate::routes::customers::delete_customer,
        // Sale endpoints
        crate::routes::sales::list_sales,
        crate::routes::sales::create_sale,
        crate::routes::sales::update_sale,
        crate::routes::sales::delete_sale,
        // Inbox endpoints
        crate::routes::inbox::list_conversations,
        crate::routes::inbox::create_conversation,
        crate::routes::inbox::update_conversation,
        crate::routes::inbox::list_messages,
        crate::routes::inbox::send_message,
        crate::routes::inbox::convert_conversation,
        // Automation endpoints
        crate::routes::automation::list_templates,
        crate::routes::automation::create_template,
        crate::routes::automation::update_template,
        crate::routes::automation::delete_template,
        // Channel endpoints
        crate::routes::channels::list_channels,
        crate::routes::channels::create_channel,
        crate::routes::channels::delete_channel,
        // Settings endpoints
        crate::routes::settings::get_settings,
        crate::routes::settings::update_settings,
        // Billing endpoints
        crate::routes::billing::billing_overview,
        crate::routes::billing::submit_payment,
        // Analytics endpoints
        crate::routes::analytics::analytics_summary,
        // Audit endpoints
        crate::routes::audit::list_audit_logs,
        // Health endpoints
        crate::routes::health::health_check,
    ),
    components(
        schemas(
            // Auth types
            indexplus_server_api::auth::SignupRequest,
            indexplus_server_api::auth::LoginRequest,
            indexplus_server_api::auth::AuthSessionResponse,
            indexplus_server_api::auth::AuthSuccessResponse,
            indexplus_server_api::auth::AuthPageResponse,
            // Team types
            indexplus_server_api::team::RoleApi,
            indexplus_server_api::team::MemberStatusApi,
            indexplus_server_api::team::MemberResponse,
            indexplus_server_api::team::ListMembersResponse,
            indexplus_server_api::team::CreateMemberRequest,
            indexplus_server_api::team::UpdateMemberRequest,
            indexplus_server_api::team::UpdateMemberPasswordRequest,
            indexplus_server_api::team::MemberEnvelopeResponse,
            indexplus_server_api::team::TeamSuccessResponse,
            // Customer types
            indexplus_server_api::customers::CustomerResponse,
            indexplus_server_api::customers::ListCustomersResponse,
            indexplus_server_api::customers::CreateCustomerRequest,
            indexplus_server_api::customers::UpdateCustomerRequest,
            indexplus_server_api::customers::CustomerEnvelopeResponse,
            indexplus_server_api::customers::CustomerSuccessResponse,
            // Sale types
            indexplus_server_api::sales::SaleResponse,
            indexplus_server_api::sales::ListSalesResponse,
            indexplus_server_api::sales::CreateSaleRequest,
            indexplus_server_api::sales::UpdateSaleRequest,
            indexplus_server_api::sales::SaleEnvelopeResponse,
            indexplus_server_api::sales::SaleSuccessResponse,
            // Inbox types
            indexplus_server_api::inbox::ConversationStatusApi,
            indexplus_server_api::inbox::MessageDirectionApi,
            indexplus_server_api::inbox::ConversationResponse,
            indexplus_server_api::inbox::MessageResponse,
            indexplus_server_api::inbox::ListConversationsResponse,
            indexplus_server_api::inbox::ListMessagesResponse,
            indexplus_server_api::inbox::CreateConversationRequest,
            indexplus_server_api::inbox::UpdateConversationRequest,
            indexplus_server_api::inbox::SendMessageRequest,
            indexplus_server_api::inbox::ConvertConversationRequest,
            indexplus_server_api::inbox::ConversationEnvelopeResponse,
            indexplus_server_api::inbox::MessageEnvelopeResponse,
            indexplus_server_api::inbox::ConvertConversationResponse,
            // Automation types
            indexplus_server_api::automation::TemplateResponse,
            indexplus_server_api::automation::ListTemplatesResponse,
            indexplus_server_api::automation::CreateTemplateRequest,
            indexplus_server_api::automation::UpdateTemplateRequest,
            indexplus_server_api::automation::TemplateEnvelopeResponse,
            indexplus_server_api::automation::TemplateSuccessResponse,
            // Channel types
            indexplus_server_api::channels::ChannelKindApi,
            indexplus_server_api::channels::ChannelResponse,
            indexplus_server_api::channels::ListChannelsResponse,
            indexplus_server_api::channels::CreateChannelRequest,
            indexplus_server_api::channels::ChannelEnvelopeResponse,
            indexplus_server_api::channels::ChannelSuccessResponse,
            // Settings types
            indexplus_server_api::settings::CompanyResponse,
            indexplus_server_api::settings::UpdateSettingsRequest,
            indexplus_server_api::settings::SettingsEnvelopeResponse,
            // Billing types
            indexplus_server_api::billing::PaymentResponse,
            indexplus_server_api::billing::BillingOverviewResponse,
            indexplus_server_api::billing::SubmitPaymentRequest,
            indexplus_server_api::billing::PaymentEnvelopeResponse,
            // Analytics types
            indexplus_server_api::analytics::AnalyticsSummaryData,
            indexplus_server_api::analytics::AnalyticsSummaryResponse,
            // Audit types
            indexplus_server_api::audit::AuditLogEntryResponse,
            indexplus_server_api::audit::ListAuditLogsResponse,
            // Dashboard page types
            indexplus_server_api::dashboard::OverviewPageResponse,
            indexplus_server_api::dashboard::InboxPageResponse,
            indexplus_server_api::dashboard::CrmPageResponse,
            indexplus_server_api::dashboard::SalesPageResponse,
            indexplus_server_api::dashboard::AnalyticsPageResponse,
            indexplus_server_api::dashboard::AutomationPageResponse,
            indexplus_server_api::dashboard::BillingPageResponse,
            indexplus_server_api::dashboard::SettingsPageResponse,
            indexplus_server_api::dashboard::TeamPageResponse,
            indexplus_server_api::dashboard::ChannelsPageResponse,
            indexplus_server_api::dashboard::AuditPageResponse,
            // Error types
            crate::api_response::FailureResponse,
            // Health types
            crate::health::HealthResponse,
            crate::health::HealthStatus,
            crate::health::HealthComponents,
            crate::health::DatabaseHealth,
            crate::health::IdentityHealth,
        )
    )
)]
pub struct ApiDoc;
