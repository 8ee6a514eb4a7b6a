//! API request handlers with proper error propagation.
//!
//! All handlers return `Result<impl IntoResponse, CareError>` so that errors
//! are automatically converted to appropriate HTTP status codes via the
//! `IntoResponse` implementation on `CareError`.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::{ApiResponse, AppState};
use crate::access::filter::filter_navigation;
use crate::access::middleware::{AccessContext, SESSION_HEADER};
use crate::access::registry::NavigationEntry;
use crate::error::CareError;
use crate::store::models::*;

// ═══════════════════════════════════════════════════════════════════════════════
// Health Check
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Navigation
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
pub struct NavigationResponse {
    pub entries: Vec<NavigationEntry>,
}

/// Return the navigation entries visible to the caller.
pub async fn get_navigation(
    State(state): State<AppState>,
    access: AccessContext,
) -> Result<impl IntoResponse, CareError> {
    let entries: Vec<NavigationEntry> = filter_navigation(&state.registry, &access.subject)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ApiResponse::success(NavigationResponse { entries })))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
pub struct IntendedDestinationResponse {
    pub intended_destination: Option<String>,
}

/// Consume the stored post-login redirect path for the caller's session.
pub async fn take_intended_destination(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, CareError> {
    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| CareError::validation("Missing x-session-id header"))?;

    let intended_destination = state.sessions.take_intended_destination(session_id);
    Ok(Json(ApiResponse::success(IntendedDestinationResponse {
        intended_destination,
    })))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pharmacy Orders
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn list_pharmacy_orders(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, CareError> {
    let orders = state.store.list_pharmacy_orders().await?;
    Ok(Json(ApiResponse::success(orders)))
}

pub async fn get_pharmacy_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, CareError> {
    let order = state.store.get_pharmacy_order(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

pub async fn create_pharmacy_order(
    State(state): State<AppState>,
    Json(req): Json<NewPharmacyOrder>,
) -> Result<impl IntoResponse, CareError> {
    if req.patient_name.trim().is_empty() {
        return Err(CareError::validation("Patient name cannot be empty"));
    }
    if req.medication.trim().is_empty() {
        return Err(CareError::validation("Medication cannot be empty"));
    }
    if req.quantity == 0 {
        return Err(CareError::validation("Quantity must be at least 1"));
    }

    let order = state.store.create_pharmacy_order(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

pub async fn update_pharmacy_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePharmacyOrder>,
) -> Result<impl IntoResponse, CareError> {
    let order = state.store.update_pharmacy_order(id, req).await?;
    Ok(Json(ApiResponse::success(order)))
}

pub async fn delete_pharmacy_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, CareError> {
    state.store.delete_pharmacy_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Consultations
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn list_consultations(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, CareError> {
    let consultations = state.store.list_consultations().await?;
    Ok(Json(ApiResponse::success(consultations)))
}

pub async fn get_consultation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, CareError> {
    let consultation = state.store.get_consultation(id).await?;
    Ok(Json(ApiResponse::success(consultation)))
}

pub async fn create_consultation(
    State(state): State<AppState>,
    Json(req): Json<NewConsultation>,
) -> Result<impl IntoResponse, CareError> {
    if req.patient_name.trim().is_empty() {
        return Err(CareError::validation("Patient name cannot be empty"));
    }
    if req.reason.trim().is_empty() {
        return Err(CareError::validation("Reason cannot be empty"));
    }

    let consultation = state.store.create_consultation(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(consultation))))
}

pub async fn update_consultation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateConsultation>,
) -> Result<impl IntoResponse, CareError> {
    let consultation = state.store.update_consultation(id, req).await?;
    Ok(Json(ApiResponse::success(consultation)))
}

pub async fn delete_consultation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, CareError> {
    state.store.delete_consultation(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Homecare Bookings
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn list_homecare_bookings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, CareError> {
    let bookings = state.store.list_homecare_bookings().await?;
    Ok(Json(ApiResponse::success(bookings)))
}

pub async fn get_homecare_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, CareError> {
    let booking = state.store.get_homecare_booking(id).await?;
    Ok(Json(ApiResponse::success(booking)))
}

pub async fn create_homecare_booking(
    State(state): State<AppState>,
    Json(req): Json<NewHomecareBooking>,
) -> Result<impl IntoResponse, CareError> {
    if req.patient_name.trim().is_empty() {
        return Err(CareError::validation("Patient name cannot be empty"));
    }
    if req.address.trim().is_empty() {
        return Err(CareError::validation("Address cannot be empty"));
    }
    if req.service.trim().is_empty() {
        return Err(CareError::validation("Service cannot be empty"));
    }

    let booking = state.store.create_homecare_booking(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(booking))))
}

pub async fn update_homecare_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateHomecareBooking>,
) -> Result<impl IntoResponse, CareError> {
    let booking = state.store.update_homecare_booking(id, req).await?;
    Ok(Json(ApiResponse::success(booking)))
}

pub async fn delete_homecare_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, CareError> {
    state.store.delete_homecare_booking(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Lab Orders
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn list_lab_orders(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, CareError> {
    let orders = state.store.list_lab_orders().await?;
    Ok(Json(ApiResponse::success(orders)))
}

pub async fn get_lab_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, CareError> {
    let order = state.store.get_lab_order(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

pub async fn create_lab_order(
    State(state): State<AppState>,
    Json(req): Json<NewLabOrder>,
) -> Result<impl IntoResponse, CareError> {
    if req.patient_name.trim().is_empty() {
        return Err(CareError::validation("Patient name cannot be empty"));
    }
    if req.test_name.trim().is_empty() {
        return Err(CareError::validation("Test name cannot be empty"));
    }

    let order = state.store.create_lab_order(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

pub async fn update_lab_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateLabOrder>,
) -> Result<impl IntoResponse, CareError> {
    let order = state.store.update_lab_order(id, req).await?;
    Ok(Json(ApiResponse::success(order)))
}

pub async fn delete_lab_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, CareError> {
    state.store.delete_lab_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Medical Records
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn list_medical_records(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, CareError> {
    let records = state.store.list_medical_records().await?;
    Ok(Json(ApiResponse::success(records)))
}

pub async fn get_medical_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, CareError> {
    let record = state.store.get_medical_record(id).await?;
    Ok(Json(ApiResponse::success(record)))
}

pub async fn create_medical_record(
    State(state): State<AppState>,
    Json(req): Json<NewMedicalRecord>,
) -> Result<impl IntoResponse, CareError> {
    if req.patient_name.trim().is_empty() {
        return Err(CareError::validation("Patient name cannot be empty"));
    }
    if req.title.trim().is_empty() {
        return Err(CareError::validation("Title cannot be empty"));
    }

    let record = state.store.create_medical_record(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(record))))
}

pub async fn update_medical_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMedicalRecord>,
) -> Result<impl IntoResponse, CareError> {
    let record = state.store.update_medical_record(id, req).await?;
    Ok(Json(ApiResponse::success(record)))
}

pub async fn delete_medical_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, CareError> {
    state.store.delete_medical_record(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
