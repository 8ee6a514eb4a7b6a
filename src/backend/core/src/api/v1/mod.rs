//! V1 API module for the CareLink backend.
//!
//! This module contains the stable V1 API endpoints for:
//! - Role-filtered navigation
//! - Session intended-destination retrieval
//! - Pharmacy orders
//! - Consultations
//! - Homecare bookings
//! - Lab orders
//! - Medical records
//!
//! V1 is the current stable API version.

pub mod routes;
