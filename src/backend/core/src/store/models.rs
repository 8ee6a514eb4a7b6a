//! Clinical data models served through the dashboard API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════════════════
// Status Enums
// ═══════════════════════════════════════════════════════════════════════════════

/// Lifecycle of a pharmacy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PharmacyOrderStatus {
    Pending,
    Processing,
    Dispensed,
    Delivered,
    Cancelled,
}

impl PharmacyOrderStatus {
    /// Valid forward transitions. Cancellation is allowed from any
    /// non-terminal state.
    pub fn can_transition_to(&self, next: Self) -> bool {
        use PharmacyOrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Dispensed)
                | (Dispensed, Delivered)
                | (Pending, Cancelled)
                | (Processing, Cancelled)
                | (Dispensed, Cancelled)
        )
    }
}

/// Lifecycle of a consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationStatus {
    Requested,
    Scheduled,
    Completed,
    Cancelled,
}

impl ConsultationStatus {
    pub fn can_transition_to(&self, next: Self) -> bool {
        use ConsultationStatus::*;
        matches!(
            (self, next),
            (Requested, Scheduled)
                | (Scheduled, Completed)
                | (Requested, Cancelled)
                | (Scheduled, Cancelled)
        )
    }
}

/// Lifecycle of a homecare booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomecareBookingStatus {
    Requested,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl HomecareBookingStatus {
    pub fn can_transition_to(&self, next: Self) -> bool {
        use HomecareBookingStatus::*;
        matches!(
            (self, next),
            (Requested, Confirmed)
                | (Confirmed, InProgress)
                | (InProgress, Completed)
                | (Requested, Cancelled)
                | (Confirmed, Cancelled)
        )
    }
}

/// Lifecycle of a lab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabOrderStatus {
    Ordered,
    SpecimenCollected,
    Processing,
    ResultReady,
    Cancelled,
}

impl LabOrderStatus {
    pub fn can_transition_to(&self, next: Self) -> bool {
        use LabOrderStatus::*;
        matches!(
            (self, next),
            (Ordered, SpecimenCollected)
                | (SpecimenCollected, Processing)
                | (Processing, ResultReady)
                | (Ordered, Cancelled)
                | (SpecimenCollected, Cancelled)
        )
    }
}

/// Kind of document attached to a medical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicalRecordKind {
    ConsultationNote,
    LabResult,
    Prescription,
    DischargeSummary,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Entities
// ═══════════════════════════════════════════════════════════════════════════════

/// A medication order fulfilled by a pharmacy provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PharmacyOrder {
    pub id: Uuid,
    pub patient_name: String,
    pub medication: String,
    pub quantity: u32,
    pub status: PharmacyOrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A consultation between a client and a physician.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    pub id: Uuid,
    pub patient_name: String,
    pub physician_name: String,
    pub reason: String,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub status: ConsultationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A homecare visit booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomecareBooking {
    pub id: Uuid,
    pub patient_name: String,
    pub address: String,
    pub service: String,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub status: HomecareBookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A laboratory test order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabOrder {
    pub id: Uuid,
    pub patient_name: String,
    pub test_name: String,
    pub status: LabOrderStatus,
    pub result_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A document in a patient's medical record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: Uuid,
    pub patient_name: String,
    pub kind: MedicalRecordKind,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Create / Update DTOs
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct NewPharmacyOrder {
    pub patient_name: String,
    pub medication: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePharmacyOrder {
    pub medication: Option<String>,
    pub quantity: Option<u32>,
    pub status: Option<PharmacyOrderStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewConsultation {
    pub patient_name: String,
    pub physician_name: String,
    pub reason: String,
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateConsultation {
    pub reason: Option<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub status: Option<ConsultationStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewHomecareBooking {
    pub patient_name: String,
    pub address: String,
    pub service: String,
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHomecareBooking {
    pub address: Option<String>,
    pub service: Option<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub status: Option<HomecareBookingStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLabOrder {
    pub patient_name: String,
    pub test_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLabOrder {
    pub test_name: Option<String>,
    pub status: Option<LabOrderStatus>,
    pub result_summary: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMedicalRecord {
    pub patient_name: String,
    pub kind: MedicalRecordKind,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMedicalRecord {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pharmacy_order_transitions() {
        use PharmacyOrderStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Dispensed.can_transition_to(Pending));
    }

    #[test]
    fn test_consultation_transitions() {
        use ConsultationStatus::*;
        assert!(Requested.can_transition_to(Scheduled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Scheduled));
    }

    #[test]
    fn test_lab_order_transitions() {
        use LabOrderStatus::*;
        assert!(Ordered.can_transition_to(SpecimenCollected));
        assert!(Processing.can_transition_to(ResultReady));
        // Specimens in processing cannot be cancelled.
        assert!(!Processing.can_transition_to(Cancelled));
    }

    #[test]
    fn test_status_serialization_is_snake_case() {
        let json = serde_json::to_string(&LabOrderStatus::SpecimenCollected).unwrap();
        assert_eq!(json, "\"specimen_collected\"");
    }
}
