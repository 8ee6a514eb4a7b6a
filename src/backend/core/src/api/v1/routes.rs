//! V1 API routes for the CareLink backend.
//!
//! Each route group is wrapped in a [`RequireAccessLayer`] carrying the
//! group's access requirement, mirroring how the dashboard guards its
//! pages. The permission tokens here match the navigation registry so a
//! link a user can see is a route they can call.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::access::guard::AccessRequirement;
use crate::access::middleware::RequireAccessLayer;
use crate::access::model::permissions;
use crate::access::session::SessionStore;
use crate::api::{handlers, AppState};

/// V1 API prefix.
pub const V1_PREFIX: &str = "/api/v1";

/// Build the V1 API router.
///
/// All routes are mounted under `/api/v1/`.
///
/// # Endpoints
///
/// ## Navigation and session
/// - `GET /api/v1/navigation` - Entries visible to the caller
/// - `POST /api/v1/session/intended-destination` - Consume stored redirect
///
/// ## Pharmacy orders
/// - `GET /api/v1/pharmacy-orders` - List pharmacy orders
/// - `POST /api/v1/pharmacy-orders` - Create a pharmacy order
/// - `GET /api/v1/pharmacy-orders/:id` - Get pharmacy order by ID
/// - `PATCH /api/v1/pharmacy-orders/:id` - Update a pharmacy order
/// - `DELETE /api/v1/pharmacy-orders/:id` - Delete a pharmacy order
///
/// Consultations, homecare bookings, lab orders, and medical records
/// follow the same CRUD shape under their own prefixes.
pub fn v1_router(sessions: Arc<dyn SessionStore>) -> Router<AppState> {
    let navigation = Router::new()
        .route("/navigation", get(handlers::get_navigation))
        .route(
            "/session/intended-destination",
            post(handlers::take_intended_destination),
        )
        .layer(RequireAccessLayer::new(
            AccessRequirement::authenticated(),
            sessions.clone(),
        ));

    let pharmacy = Router::new()
        .route(
            "/pharmacy-orders",
            get(handlers::list_pharmacy_orders).post(handlers::create_pharmacy_order),
        )
        .route(
            "/pharmacy-orders/:id",
            get(handlers::get_pharmacy_order)
                .patch(handlers::update_pharmacy_order)
                .delete(handlers::delete_pharmacy_order),
        )
        .layer(RequireAccessLayer::new(
            AccessRequirement::permission(permissions::PHARMACY_MANAGE),
            sessions.clone(),
        ));

    let consultations = Router::new()
        .route(
            "/consultations",
            get(handlers::list_consultations).post(handlers::create_consultation),
        )
        .route(
            "/consultations/:id",
            get(handlers::get_consultation)
                .patch(handlers::update_consultation)
                .delete(handlers::delete_consultation),
        )
        .layer(RequireAccessLayer::new(
            AccessRequirement::permission(permissions::CONSULTATIONS_MANAGE),
            sessions.clone(),
        ));

    let homecare = Router::new()
        .route(
            "/homecare-bookings",
            get(handlers::list_homecare_bookings).post(handlers::create_homecare_booking),
        )
        .route(
            "/homecare-bookings/:id",
            get(handlers::get_homecare_booking)
                .patch(handlers::update_homecare_booking)
                .delete(handlers::delete_homecare_booking),
        )
        .layer(RequireAccessLayer::new(
            AccessRequirement::permission(permissions::HOMECARE_MANAGE),
            sessions.clone(),
        ));

    let labs = Router::new()
        .route(
            "/lab-orders",
            get(handlers::list_lab_orders).post(handlers::create_lab_order),
        )
        .route(
            "/lab-orders/:id",
            get(handlers::get_lab_order)
                .patch(handlers::update_lab_order)
                .delete(handlers::delete_lab_order),
        )
        .layer(RequireAccessLayer::new(
            AccessRequirement::permission(permissions::LAB_MANAGE),
            sessions.clone(),
        ));

    // patients_read is deliberately outside the basic allow-list, so this
    // group is closed to callers holding only baseline permissions.
    let records = Router::new()
        .route(
            "/medical-records",
            get(handlers::list_medical_records).post(handlers::create_medical_record),
        )
        .route(
            "/medical-records/:id",
            get(handlers::get_medical_record)
                .patch(handlers::update_medical_record)
                .delete(handlers::delete_medical_record),
        )
        .layer(RequireAccessLayer::new(
            AccessRequirement::permission(permissions::PATIENTS_READ),
            sessions,
        ));

    Router::new()
        .merge(navigation)
        .merge(pharmacy)
        .merge(consultations)
        .merge(homecare)
        .merge(labs)
        .merge(records)
}

/// V1 API route constants for use in clients and documentation.
pub mod paths {
    pub const NAVIGATION: &str = "/api/v1/navigation";
    pub const INTENDED_DESTINATION: &str = "/api/v1/session/intended-destination";

    pub const PHARMACY_ORDERS: &str = "/api/v1/pharmacy-orders";
    pub const PHARMACY_ORDER: &str = "/api/v1/pharmacy-orders/:id";

    pub const CONSULTATIONS: &str = "/api/v1/consultations";
    pub const CONSULTATION: &str = "/api/v1/consultations/:id";

    pub const HOMECARE_BOOKINGS: &str = "/api/v1/homecare-bookings";
    pub const HOMECARE_BOOKING: &str = "/api/v1/homecare-bookings/:id";

    pub const LAB_ORDERS: &str = "/api/v1/lab-orders";
    pub const LAB_ORDER: &str = "/api/v1/lab-orders/:id";

    pub const MEDICAL_RECORDS: &str = "/api/v1/medical-records";
    pub const MEDICAL_RECORD: &str = "/api/v1/medical-records/:id";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_constants() {
        assert!(paths::NAVIGATION.starts_with(V1_PREFIX));
        assert!(paths::PHARMACY_ORDERS.starts_with(V1_PREFIX));
        assert!(paths::MEDICAL_RECORDS.starts_with(V1_PREFIX));
    }
}
