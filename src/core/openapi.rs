use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::activity::{dtos as activity_dtos, handlers as activity_handlers};
use crate::features::airports::{dtos as airports_dtos, handlers as airports_handlers};
use crate::features::attachments::{
    dtos as attachments_dtos, handlers as attachments_handlers, AttachmentKind,
};
use crate::features::auth;
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::documents::{dtos as documents_dtos, handlers as documents_handlers};
use crate::features::flight_records::{
    dtos as flight_records_dtos, handlers as flight_records_handlers,
};
use crate::features::incoming_inspections::{
    dtos as inspections_dtos, handlers as inspections_handlers,
};
use crate::features::sdr_reports::{dtos as sdr_dtos, handlers as sdr_handlers};
use crate::features::sms_reports::{dtos as sms_dtos, handlers as sms_handlers};
use crate::features::stock_inventory::{dtos as stock_dtos, handlers as stock_handlers};
use crate::features::technical_queries::{
    dtos as technical_queries_dtos, handlers as technical_queries_handlers,
};
use crate::features::technician_training::{dtos as training_dtos, handlers as training_handlers};
use crate::modules::storage::FileFailure;
use crate::shared::types::{
    ApiResponse, BulkDeleteRequestDto, BulkDeleteResultDto, DeletedDto, Meta, RecordDeletedDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::resend_pin,
        auth::handlers::verify_pin,
        auth::handlers::login,
        auth::handlers::logout,
        auth::handlers::get_me,
        // Activity
        activity_handlers::list_activities,
        activity_handlers::list_my_activities,
        // Attachments
        attachments_handlers::upload_attachment,
        attachments_handlers::list_attachments,
        attachments_handlers::download_attachment,
        attachments_handlers::delete_attachment,
        // Flight records
        flight_records_handlers::create_flight_record,
        flight_records_handlers::list_flight_records,
        flight_records_handlers::get_flight_record,
        flight_records_handlers::update_flight_record,
        flight_records_handlers::delete_flight_record,
        // Airports
        airports_handlers::create_airport,
        airports_handlers::list_airports,
        airports_handlers::get_airport,
        airports_handlers::update_airport,
        airports_handlers::delete_airport,
        // Stock inventory
        stock_handlers::create_stock_item,
        stock_handlers::list_stock_items,
        stock_handlers::get_stock_item,
        stock_handlers::update_stock_item,
        stock_handlers::delete_stock_item,
        stock_handlers::bulk_delete_stock_items,
        // Incoming inspections
        inspections_handlers::create_inspection,
        inspections_handlers::list_inspections,
        inspections_handlers::get_inspection,
        inspections_handlers::update_inspection,
        inspections_handlers::delete_inspection,
        // SDR reports
        sdr_handlers::create_sdr_report,
        sdr_handlers::list_sdr_reports,
        sdr_handlers::get_sdr_report,
        sdr_handlers::update_sdr_report,
        sdr_handlers::delete_sdr_report,
        // SMS reports
        sms_handlers::create_sms_report,
        sms_handlers::list_sms_reports,
        sms_handlers::get_sms_report,
        sms_handlers::update_sms_report,
        sms_handlers::delete_sms_report,
        // Technician training
        training_handlers::create_training,
        training_handlers::list_trainings,
        training_handlers::get_training,
        training_handlers::update_training,
        training_handlers::delete_training,
        // Documents
        documents_handlers::create_folder,
        documents_handlers::update_folder,
        documents_handlers::delete_folder,
        documents_handlers::get_folder_contents,
        documents_handlers::get_folder_tree,
        documents_handlers::upload_document,
        documents_handlers::get_document,
        documents_handlers::download_document,
        documents_handlers::delete_document,
        // Technical queries
        technical_queries_handlers::create_technical_query,
        technical_queries_handlers::list_technical_queries,
        technical_queries_handlers::get_technical_query,
        technical_queries_handlers::update_technical_query,
        technical_queries_handlers::delete_technical_query,
        technical_queries_handlers::vote_technical_query,
        technical_queries_handlers::create_technical_response,
        technical_queries_handlers::delete_technical_response,
        technical_queries_handlers::vote_technical_response,
        // Dashboard
        dashboard_handlers::get_summary,
    ),
    components(
        schemas(
            Meta,
            DeletedDto,
            RecordDeletedDto,
            BulkDeleteRequestDto,
            BulkDeleteResultDto,
            FileFailure,
            // Auth
            auth::dtos::RegisterRequestDto,
            auth::dtos::ResendPinRequestDto,
            auth::dtos::VerifyPinRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::UserDto,
            auth::dtos::RegisterResponseDto,
            auth::dtos::AuthResponseDto,
            auth::model::AuthenticatedUser,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::RegisterResponseDto>,
            ApiResponse<auth::dtos::UserDto>,
            // Activity
            activity_dtos::ActivityResponseDto,
            ApiResponse<Vec<activity_dtos::ActivityResponseDto>>,
            // Attachments
            AttachmentKind,
            attachments_dtos::UploadAttachmentDto,
            attachments_dtos::AttachmentResponseDto,
            ApiResponse<attachments_dtos::AttachmentResponseDto>,
            ApiResponse<Vec<attachments_dtos::AttachmentResponseDto>>,
            // Flight records
            flight_records_dtos::CreateFlightRecordDto,
            flight_records_dtos::UpdateFlightRecordDto,
            flight_records_dtos::FlightRecordResponseDto,
            ApiResponse<flight_records_dtos::FlightRecordResponseDto>,
            ApiResponse<Vec<flight_records_dtos::FlightRecordResponseDto>>,
            // Airports
            airports_dtos::CreateAirportDto,
            airports_dtos::UpdateAirportDto,
            airports_dtos::AirportResponseDto,
            ApiResponse<airports_dtos::AirportResponseDto>,
            ApiResponse<Vec<airports_dtos::AirportResponseDto>>,
            // Stock inventory
            stock_dtos::CreateStockItemDto,
            stock_dtos::UpdateStockItemDto,
            stock_dtos::StockItemResponseDto,
            ApiResponse<stock_dtos::StockItemResponseDto>,
            ApiResponse<Vec<stock_dtos::StockItemResponseDto>>,
            ApiResponse<BulkDeleteResultDto>,
            ApiResponse<RecordDeletedDto>,
            // Incoming inspections
            inspections_dtos::CreateIncomingInspectionDto,
            inspections_dtos::UpdateIncomingInspectionDto,
            inspections_dtos::IncomingInspectionResponseDto,
            ApiResponse<inspections_dtos::IncomingInspectionResponseDto>,
            ApiResponse<Vec<inspections_dtos::IncomingInspectionResponseDto>>,
            // SDR reports
            sdr_dtos::CreateSdrReportDto,
            sdr_dtos::UpdateSdrReportDto,
            sdr_dtos::SdrReportResponseDto,
            ApiResponse<sdr_dtos::SdrReportResponseDto>,
            ApiResponse<Vec<sdr_dtos::SdrReportResponseDto>>,
            // SMS reports
            sms_dtos::CreateSmsReportDto,
            sms_dtos::UpdateSmsReportDto,
            sms_dtos::SmsReportResponseDto,
            ApiResponse<sms_dtos::SmsReportResponseDto>,
            ApiResponse<Vec<sms_dtos::SmsReportResponseDto>>,
            // Technician training
            training_dtos::CreateTrainingDto,
            training_dtos::UpdateTrainingDto,
            training_dtos::TrainingResponseDto,
            ApiResponse<training_dtos::TrainingResponseDto>,
            ApiResponse<Vec<training_dtos::TrainingResponseDto>>,
            // Documents
            documents_dtos::CreateFolderDto,
            documents_dtos::UpdateFolderDto,
            documents_dtos::UploadDocumentDto,
            documents_dtos::FolderResponseDto,
            documents_dtos::DocumentFileResponseDto,
            documents_dtos::FolderContentsDto,
            documents_dtos::FolderTreeDto,
            ApiResponse<documents_dtos::FolderResponseDto>,
            ApiResponse<documents_dtos::FolderContentsDto>,
            ApiResponse<Vec<documents_dtos::FolderTreeDto>>,
            ApiResponse<documents_dtos::DocumentFileResponseDto>,
            // Technical queries
            technical_queries_dtos::CreateTechnicalQueryDto,
            technical_queries_dtos::UpdateTechnicalQueryDto,
            technical_queries_dtos::CreateTechnicalResponseDto,
            technical_queries_dtos::TechnicalQueryResponseDto,
            technical_queries_dtos::TechnicalResponseDto,
            technical_queries_dtos::TechnicalQueryDetailDto,
            technical_queries_dtos::VoteDirection,
            technical_queries_dtos::VoteRequestDto,
            technical_queries_dtos::VoteCountsDto,
            ApiResponse<technical_queries_dtos::TechnicalQueryResponseDto>,
            ApiResponse<Vec<technical_queries_dtos::TechnicalQueryResponseDto>>,
            ApiResponse<technical_queries_dtos::TechnicalQueryDetailDto>,
            ApiResponse<technical_queries_dtos::TechnicalResponseDto>,
            ApiResponse<technical_queries_dtos::VoteCountsDto>,
            // Dashboard
            dashboard_dtos::DashboardSummaryDto,
            dashboard_dtos::RecordTotalsDto,
            dashboard_dtos::GroupCountDto,
            dashboard_dtos::AircraftUtilizationDto,
            dashboard_dtos::ExpiringTrainingDto,
            ApiResponse<dashboard_dtos::DashboardSummaryDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, PIN verification and sessions"),
        (name = "activity", description = "User activity log"),
        (name = "attachments", description = "Files attached to operational records"),
        (name = "flight-records", description = "Aircraft flight log entries"),
        (name = "airports", description = "Airport identifiers"),
        (name = "stock-inventory", description = "Parts in stock"),
        (name = "incoming-inspections", description = "Receiving inspections of parts"),
        (name = "sdr-reports", description = "Service Difficulty Reports"),
        (name = "sms-reports", description = "Safety Management System hazard reports"),
        (name = "technician-trainings", description = "Technician training records"),
        (name = "documents", description = "Document library folders and files"),
        (name = "technical-queries", description = "Technical queries, responses and votes"),
        (name = "dashboard", description = "Back-office summary"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "MRO Core API",
        version = "0.1.0",
        description = "API documentation for the MRO back office",
    )
)]
pub struct ApiDoc;

/// Adds the session security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_feature() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/auth/verify-pin",
            "/api/attachments/{kind}/{owner_id}/{attachment_id}",
            "/api/stock-inventory/bulk-delete",
            "/api/documents/tree",
            "/api/technical-responses/{id}/vote",
            "/api/dashboard/summary",
        ] {
            assert!(paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_security_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
