//! Data access for the dashboard's clinical collections.
//!
//! [`CareStore`] is the capability boundary between the HTTP surface and
//! whatever backs the data. The in-memory [`MockStore`](mock::MockStore)
//! ships today; a database-backed implementation can replace it without
//! touching the handlers.

pub mod mock;
pub mod models;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use models::{
    Consultation, HomecareBooking, LabOrder, MedicalRecord, NewConsultation, NewHomecareBooking,
    NewLabOrder, NewMedicalRecord, NewPharmacyOrder, PharmacyOrder, UpdateConsultation,
    UpdateHomecareBooking, UpdateLabOrder, UpdateMedicalRecord, UpdatePharmacyOrder,
};

pub use mock::MockStore;

/// Async capability contract for clinical data access.
#[async_trait]
pub trait CareStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Pharmacy orders
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_pharmacy_orders(&self) -> Result<Vec<PharmacyOrder>>;
    async fn get_pharmacy_order(&self, id: Uuid) -> Result<PharmacyOrder>;
    async fn create_pharmacy_order(&self, new: NewPharmacyOrder) -> Result<PharmacyOrder>;
    async fn update_pharmacy_order(
        &self,
        id: Uuid,
        update: UpdatePharmacyOrder,
    ) -> Result<PharmacyOrder>;
    async fn delete_pharmacy_order(&self, id: Uuid) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Consultations
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_consultations(&self) -> Result<Vec<Consultation>>;
    async fn get_consultation(&self, id: Uuid) -> Result<Consultation>;
    async fn create_consultation(&self, new: NewConsultation) -> Result<Consultation>;
    async fn update_consultation(
        &self,
        id: Uuid,
        update: UpdateConsultation,
    ) -> Result<Consultation>;
    async fn delete_consultation(&self, id: Uuid) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Homecare bookings
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_homecare_bookings(&self) -> Result<Vec<HomecareBooking>>;
    async fn get_homecare_booking(&self, id: Uuid) -> Result<HomecareBooking>;
    async fn create_homecare_booking(&self, new: NewHomecareBooking) -> Result<HomecareBooking>;
    async fn update_homecare_booking(
        &self,
        id: Uuid,
        update: UpdateHomecareBooking,
    ) -> Result<HomecareBooking>;
    async fn delete_homecare_booking(&self, id: Uuid) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Lab orders
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_lab_orders(&self) -> Result<Vec<LabOrder>>;
    async fn get_lab_order(&self, id: Uuid) -> Result<LabOrder>;
    async fn create_lab_order(&self, new: NewLabOrder) -> Result<LabOrder>;
    async fn update_lab_order(&self, id: Uuid, update: UpdateLabOrder) -> Result<LabOrder>;
    async fn delete_lab_order(&self, id: Uuid) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Medical records
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_medical_records(&self) -> Result<Vec<MedicalRecord>>;
    async fn get_medical_record(&self, id: Uuid) -> Result<MedicalRecord>;
    async fn create_medical_record(&self, new: NewMedicalRecord) -> Result<MedicalRecord>;
    async fn update_medical_record(
        &self,
        id: Uuid,
        update: UpdateMedicalRecord,
    ) -> Result<MedicalRecord>;
    async fn delete_medical_record(&self, id: Uuid) -> Result<()>;
}
