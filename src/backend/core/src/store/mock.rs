//! In-memory [`CareStore`] with simulated latency and failure injection.
//!
//! Used for demos and tests. Every operation sleeps for the configured
//! latency; reads can be forced to fail to exercise the API's error paths.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::models::*;
use super::CareStore;
use crate::config::MockStoreConfig;
use crate::error::{CareError, Result};

pub struct MockStore {
    pharmacy_orders: DashMap<Uuid, PharmacyOrder>,
    consultations: DashMap<Uuid, Consultation>,
    homecare_bookings: DashMap<Uuid, HomecareBooking>,
    lab_orders: DashMap<Uuid, LabOrder>,
    medical_records: DashMap<Uuid, MedicalRecord>,
    latency: Duration,
    fail_reads: AtomicBool,
}

impl MockStore {
    pub fn new(config: &MockStoreConfig) -> Self {
        let store = Self {
            pharmacy_orders: DashMap::new(),
            consultations: DashMap::new(),
            homecare_bookings: DashMap::new(),
            lab_orders: DashMap::new(),
            medical_records: DashMap::new(),
            latency: config.latency,
            fail_reads: AtomicBool::new(config.fail_reads),
        };
        if config.seed_fixtures {
            store.seed();
        }
        store
    }

    /// Zero-latency store for tests.
    pub fn for_tests() -> Self {
        Self::new(&MockStoreConfig {
            latency: Duration::ZERO,
            fail_reads: false,
            seed_fixtures: false,
        })
    }

    /// Toggle read-failure injection at runtime.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Simulate backend latency, failing if injection is active.
    async fn simulate_read(&self) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CareError::data_load("mock store failure injection active"));
        }
        Ok(())
    }

    async fn simulate_write(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Populate demo fixtures.
    fn seed(&self) {
        let now = Utc::now();

        let order = PharmacyOrder {
            id: Uuid::new_v4(),
            patient_name: "Dana Whitfield".to_string(),
            medication: "Amoxicillin 500mg".to_string(),
            quantity: 21,
            status: PharmacyOrderStatus::Processing,
            created_at: now,
            updated_at: now,
        };
        self.pharmacy_orders.insert(order.id, order);

        let consultation = Consultation {
            id: Uuid::new_v4(),
            patient_name: "Marcus Oyelaran".to_string(),
            physician_name: "Dr. Priya Shah".to_string(),
            reason: "Follow-up on hypertension management".to_string(),
            scheduled_for: Some(now + chrono::Duration::days(2)),
            status: ConsultationStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };
        self.consultations.insert(consultation.id, consultation);

        let booking = HomecareBooking {
            id: Uuid::new_v4(),
            patient_name: "Elena Vasquez".to_string(),
            address: "14 Birchwood Lane".to_string(),
            service: "Post-operative wound care".to_string(),
            scheduled_for: Some(now + chrono::Duration::days(1)),
            status: HomecareBookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };
        self.homecare_bookings.insert(booking.id, booking);

        let lab = LabOrder {
            id: Uuid::new_v4(),
            patient_name: "Dana Whitfield".to_string(),
            test_name: "Complete blood count".to_string(),
            status: LabOrderStatus::SpecimenCollected,
            result_summary: None,
            created_at: now,
            updated_at: now,
        };
        self.lab_orders.insert(lab.id, lab);

        let record = MedicalRecord {
            id: Uuid::new_v4(),
            patient_name: "Marcus Oyelaran".to_string(),
            kind: MedicalRecordKind::ConsultationNote,
            title: "Initial hypertension assessment".to_string(),
            body: "Blood pressure elevated at 152/96. Started on lisinopril.".to_string(),
            created_at: now,
            updated_at: now,
        };
        self.medical_records.insert(record.id, record);

        info!("Seeded mock store with demo fixtures");
    }
}

/// Apply a status transition, rejecting invalid ones.
fn transition<S>(current: S, next: S) -> Result<S>
where
    S: Copy + std::fmt::Debug + PartialEq,
    S: StatusTransition,
{
    if current == next {
        return Ok(current);
    }
    if !current.allows(next) {
        return Err(CareError::invalid_status_transition(current, next));
    }
    Ok(next)
}

/// Internal helper trait unifying the per-entity transition tables.
trait StatusTransition: Sized {
    fn allows(&self, next: Self) -> bool;
}

impl StatusTransition for PharmacyOrderStatus {
    fn allows(&self, next: Self) -> bool {
        self.can_transition_to(next)
    }
}

impl StatusTransition for ConsultationStatus {
    fn allows(&self, next: Self) -> bool {
        self.can_transition_to(next)
    }
}

impl StatusTransition for HomecareBookingStatus {
    fn allows(&self, next: Self) -> bool {
        self.can_transition_to(next)
    }
}

impl StatusTransition for LabOrderStatus {
    fn allows(&self, next: Self) -> bool {
        self.can_transition_to(next)
    }
}

#[async_trait]
impl CareStore for MockStore {
    // ─────────────────────────────────────────────────────────────────────────
    // Pharmacy orders
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_pharmacy_orders(&self) -> Result<Vec<PharmacyOrder>> {
        self.simulate_read().await?;
        let mut orders: Vec<_> = self
            .pharmacy_orders
            .iter()
            .map(|e| e.value().clone())
            .collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    async fn get_pharmacy_order(&self, id: Uuid) -> Result<PharmacyOrder> {
        self.simulate_read().await?;
        self.pharmacy_orders
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or_else(|| CareError::not_found("pharmacy_order", id.to_string()))
    }

    async fn create_pharmacy_order(&self, new: NewPharmacyOrder) -> Result<PharmacyOrder> {
        self.simulate_write().await;
        let now = Utc::now();
        let order = PharmacyOrder {
            id: Uuid::new_v4(),
            patient_name: new.patient_name,
            medication: new.medication,
            quantity: new.quantity,
            status: PharmacyOrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.pharmacy_orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn update_pharmacy_order(
        &self,
        id: Uuid,
        update: UpdatePharmacyOrder,
    ) -> Result<PharmacyOrder> {
        self.simulate_write().await;
        let mut entry = self
            .pharmacy_orders
            .get_mut(&id)
            .ok_or_else(|| CareError::not_found("pharmacy_order", id.to_string()))?;
        let order = entry.value_mut();
        if let Some(medication) = update.medication {
            order.medication = medication;
        }
        if let Some(quantity) = update.quantity {
            order.quantity = quantity;
        }
        if let Some(status) = update.status {
            order.status = transition(order.status, status)?;
        }
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn delete_pharmacy_order(&self, id: Uuid) -> Result<()> {
        self.simulate_write().await;
        self.pharmacy_orders
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CareError::not_found("pharmacy_order", id.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Consultations
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_consultations(&self) -> Result<Vec<Consultation>> {
        self.simulate_read().await?;
        let mut items: Vec<_> = self
            .consultations
            .iter()
            .map(|e| e.value().clone())
            .collect();
        items.sort_by_key(|c| c.created_at);
        Ok(items)
    }

    async fn get_consultation(&self, id: Uuid) -> Result<Consultation> {
        self.simulate_read().await?;
        self.consultations
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or_else(|| CareError::not_found("consultation", id.to_string()))
    }

    async fn create_consultation(&self, new: NewConsultation) -> Result<Consultation> {
        self.simulate_write().await;
        let now = Utc::now();
        let consultation = Consultation {
            id: Uuid::new_v4(),
            patient_name: new.patient_name,
            physician_name: new.physician_name,
            reason: new.reason,
            scheduled_for: new.scheduled_for,
            status: ConsultationStatus::Requested,
            created_at: now,
            updated_at: now,
        };
        self.consultations.insert(consultation.id, consultation.clone());
        Ok(consultation)
    }

    async fn update_consultation(
        &self,
        id: Uuid,
        update: UpdateConsultation,
    ) -> Result<Consultation> {
        self.simulate_write().await;
        let mut entry = self
            .consultations
            .get_mut(&id)
            .ok_or_else(|| CareError::not_found("consultation", id.to_string()))?;
        let consultation = entry.value_mut();
        if let Some(reason) = update.reason {
            consultation.reason = reason;
        }
        if let Some(scheduled_for) = update.scheduled_for {
            consultation.scheduled_for = Some(scheduled_for);
        }
        if let Some(status) = update.status {
            consultation.status = transition(consultation.status, status)?;
        }
        consultation.updated_at = Utc::now();
        Ok(consultation.clone())
    }

    async fn delete_consultation(&self, id: Uuid) -> Result<()> {
        self.simulate_write().await;
        self.consultations
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CareError::not_found("consultation", id.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Homecare bookings
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_homecare_bookings(&self) -> Result<Vec<HomecareBooking>> {
        self.simulate_read().await?;
        let mut items: Vec<_> = self
            .homecare_bookings
            .iter()
            .map(|e| e.value().clone())
            .collect();
        items.sort_by_key(|b| b.created_at);
        Ok(items)
    }

    async fn get_homecare_booking(&self, id: Uuid) -> Result<HomecareBooking> {
        self.simulate_read().await?;
        self.homecare_bookings
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or_else(|| CareError::not_found("homecare_booking", id.to_string()))
    }

    async fn create_homecare_booking(&self, new: NewHomecareBooking) -> Result<HomecareBooking> {
        self.simulate_write().await;
        let now = Utc::now();
        let booking = HomecareBooking {
            id: Uuid::new_v4(),
            patient_name: new.patient_name,
            address: new.address,
            service: new.service,
            scheduled_for: new.scheduled_for,
            status: HomecareBookingStatus::Requested,
            created_at: now,
            updated_at: now,
        };
        self.homecare_bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn update_homecare_booking(
        &self,
        id: Uuid,
        update: UpdateHomecareBooking,
    ) -> Result<HomecareBooking> {
        self.simulate_write().await;
        let mut entry = self
            .homecare_bookings
            .get_mut(&id)
            .ok_or_else(|| CareError::not_found("homecare_booking", id.to_string()))?;
        let booking = entry.value_mut();
        if let Some(address) = update.address {
            booking.address = address;
        }
        if let Some(service) = update.service {
            booking.service = service;
        }
        if let Some(scheduled_for) = update.scheduled_for {
            booking.scheduled_for = Some(scheduled_for);
        }
        if let Some(status) = update.status {
            booking.status = transition(booking.status, status)?;
        }
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn delete_homecare_booking(&self, id: Uuid) -> Result<()> {
        self.simulate_write().await;
        self.homecare_bookings
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CareError::not_found("homecare_booking", id.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lab orders
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_lab_orders(&self) -> Result<Vec<LabOrder>> {
        self.simulate_read().await?;
        let mut items: Vec<_> = self.lab_orders.iter().map(|e| e.value().clone()).collect();
        items.sort_by_key(|o| o.created_at);
        Ok(items)
    }

    async fn get_lab_order(&self, id: Uuid) -> Result<LabOrder> {
        self.simulate_read().await?;
        self.lab_orders
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or_else(|| CareError::not_found("lab_order", id.to_string()))
    }

    async fn create_lab_order(&self, new: NewLabOrder) -> Result<LabOrder> {
        self.simulate_write().await;
        let now = Utc::now();
        let order = LabOrder {
            id: Uuid::new_v4(),
            patient_name: new.patient_name,
            test_name: new.test_name,
            status: LabOrderStatus::Ordered,
            result_summary: None,
            created_at: now,
            updated_at: now,
        };
        self.lab_orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn update_lab_order(&self, id: Uuid, update: UpdateLabOrder) -> Result<LabOrder> {
        self.simulate_write().await;
        let mut entry = self
            .lab_orders
            .get_mut(&id)
            .ok_or_else(|| CareError::not_found("lab_order", id.to_string()))?;
        let order = entry.value_mut();
        if let Some(test_name) = update.test_name {
            order.test_name = test_name;
        }
        if let Some(status) = update.status {
            order.status = transition(order.status, status)?;
        }
        if let Some(result_summary) = update.result_summary {
            order.result_summary = Some(result_summary);
        }
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn delete_lab_order(&self, id: Uuid) -> Result<()> {
        self.simulate_write().await;
        self.lab_orders
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CareError::not_found("lab_order", id.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Medical records
    // ─────────────────────────────────────────────────────────────────────────

    async fn list_medical_records(&self) -> Result<Vec<MedicalRecord>> {
        self.simulate_read().await?;
        let mut items: Vec<_> = self
            .medical_records
            .iter()
            .map(|e| e.value().clone())
            .collect();
        items.sort_by_key(|r| r.created_at);
        Ok(items)
    }

    async fn get_medical_record(&self, id: Uuid) -> Result<MedicalRecord> {
        self.simulate_read().await?;
        self.medical_records
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or_else(|| CareError::not_found("medical_record", id.to_string()))
    }

    async fn create_medical_record(&self, new: NewMedicalRecord) -> Result<MedicalRecord> {
        self.simulate_write().await;
        let now = Utc::now();
        let record = MedicalRecord {
            id: Uuid::new_v4(),
            patient_name: new.patient_name,
            kind: new.kind,
            title: new.title,
            body: new.body,
            created_at: now,
            updated_at: now,
        };
        self.medical_records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_medical_record(
        &self,
        id: Uuid,
        update: UpdateMedicalRecord,
    ) -> Result<MedicalRecord> {
        self.simulate_write().await;
        let mut entry = self
            .medical_records
            .get_mut(&id)
            .ok_or_else(|| CareError::not_found("medical_record", id.to_string()))?;
        let record = entry.value_mut();
        if let Some(title) = update.title {
            record.title = title;
        }
        if let Some(body) = update.body {
            record.body = body;
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_medical_record(&self, id: Uuid) -> Result<()> {
        self.simulate_write().await;
        self.medical_records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CareError::not_found("medical_record", id.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_pharmacy_order_crud() {
        let store = MockStore::for_tests();

        let created = store
            .create_pharmacy_order(NewPharmacyOrder {
                patient_name: "Test Patient".to_string(),
                medication: "Ibuprofen 200mg".to_string(),
                quantity: 30,
            })
            .await
            .unwrap();
        assert_eq!(created.status, PharmacyOrderStatus::Pending);

        let fetched = store.get_pharmacy_order(created.id).await.unwrap();
        assert_eq!(fetched.medication, "Ibuprofen 200mg");

        let updated = store
            .update_pharmacy_order(
                created.id,
                UpdatePharmacyOrder {
                    status: Some(PharmacyOrderStatus::Processing),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, PharmacyOrderStatus::Processing);

        store.delete_pharmacy_order(created.id).await.unwrap();
        let err = store.get_pharmacy_order(created.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::RecordNotFound);
    }

    #[tokio::test]
    async fn test_invalid_transition_rejected() {
        let store = MockStore::for_tests();

        let created = store
            .create_pharmacy_order(NewPharmacyOrder {
                patient_name: "Test Patient".to_string(),
                medication: "Ibuprofen 200mg".to_string(),
                quantity: 30,
            })
            .await
            .unwrap();

        // Pending cannot jump straight to Delivered.
        let err = store
            .update_pharmacy_order(
                created.id,
                UpdatePharmacyOrder {
                    status: Some(PharmacyOrderStatus::Delivered),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidStatusTransition);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MockStore::for_tests();
        store.set_fail_reads(true);

        let err = store.list_consultations().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DataLoadFailed);
        assert!(err.is_retryable());

        store.set_fail_reads(false);
        assert!(store.list_consultations().await.is_ok());
    }

    #[tokio::test]
    async fn test_seeded_fixtures_present() {
        let store = MockStore::new(&MockStoreConfig {
            latency: Duration::ZERO,
            fail_reads: false,
            seed_fixtures: true,
        });

        assert_eq!(store.list_pharmacy_orders().await.unwrap().len(), 1);
        assert_eq!(store.list_consultations().await.unwrap().len(), 1);
        assert_eq!(store.list_homecare_bookings().await.unwrap().len(), 1);
        assert_eq!(store.list_lab_orders().await.unwrap().len(), 1);
        assert_eq!(store.list_medical_records().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_lists_sorted_by_creation() {
        let store = MockStore::for_tests();
        for name in ["first", "second", "third"] {
            store
                .create_lab_order(NewLabOrder {
                    patient_name: name.to_string(),
                    test_name: "CBC".to_string(),
                })
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(2)).await;
        }

        let orders = store.list_lab_orders().await.unwrap();
        let names: Vec<&str> = orders.iter().map(|o| o.patient_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }
}
