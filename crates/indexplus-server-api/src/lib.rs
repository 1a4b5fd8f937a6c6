// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod analytics;
pub mod audit;
pub mod auth;
pub mod automation;
pub mod billing;
pub mod channels;
pub mod customers;
pub mod dashboard;
pub mod inbox;
pub mod sales;
pub mod settings;
pub mod team;

pub use analytics::{AnalyticsSummaryData, AnalyticsSummaryResponse};
pub use audit::{AuditLogEntryResponse, ListAuditLogsParams, ListAuditLogsResponse};
pub use auth::{
	AuthPageResponse, AuthSessionResponse, AuthSuccessResponse, LoginRequest, SignupRequest,
};
pub use automation::{
	CreateTemplateRequest, ListTemplatesResponse, TemplateEnvelopeResponse, TemplateResponse,
	TemplateSuccessResponse, UpdateTemplateRequest,
};
pub use billing::{
	BillingOverviewResponse, PaymentEnvelopeResponse, PaymentResponse, SubmitPaymentRequest,
};
pub use channels::{
	ChannelEnvelopeResponse, ChannelKindApi, ChannelResponse, ChannelSuccessResponse,
	CreateChannelRequest, ListChannelsResponse,
};
pub use customers::{
	CreateCustomerRequest, CustomerEnvelopeResponse, CustomerResponse, CustomerSuccessResponse,
	ListCustomersResponse, UpdateCustomerRequest,
};
pub use dashboard::{
	grants_for, AnalyticsPageResponse, AuditPageResponse, AutomationPageResponse,
	BillingPageResponse, ChannelsPageResponse, CrmPageResponse, GrantsMap, InboxPageResponse,
	OverviewPageResponse, SalesPageResponse, SettingsPageResponse, TeamPageResponse,
};
pub use inbox::{
	ConversationEnvelopeResponse, ConversationResponse, ConversationStatusApi,
	ConvertConversationRequest, ConvertConversationResponse, CreateConversationRequest,
	ListConversationsResponse, ListMessagesResponse, MessageDirectionApi, MessageEnvelopeResponse,
	MessageResponse, SendMessageRequest, UpdateConversationRequest,
};
pub use sales::{
	CreateSaleRequest, ListSalesResponse, SaleEnvelopeResponse, SaleResponse, SaleSuccessResponse,
	UpdateSaleRequest,
};
pub use settings::{CompanyResponse, SettingsEnvelopeResponse, UpdateSettingsRequest};
pub use team::{
	CreateMemberRequest, ListMembersResponse, MemberEnvelopeResponse, MemberResponse,
	MemberStatusApi, RoleApi, TeamSuccessResponse, UpdateMemberPasswordRequest,
	UpdateMemberRequest,
};
