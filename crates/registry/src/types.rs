//! Record types for signup requests, volunteers, and certificates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a registered volunteer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolunteerStatus {
    /// Currently volunteering.
    Active,
    /// No longer volunteering; ineligible for certificates.
    Inactive,
    /// Completed their program and holds a certificate.
    Certified,
}

/// Review status of a signup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Awaiting review.
    Pending,
    /// Approved; a volunteer record was created.
    Approved,
    /// Rejected by an administrator.
    Rejected,
}

/// Input for submitting a signup request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRequest {
    /// Applicant name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Applicant gender, as entered.
    pub gender: String,
    /// Intended joining date, kept as entered.
    pub joined_at: String,
    /// Country of residence.
    #[serde(default)]
    pub country: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// A signup request awaiting review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolunteerRequest {
    /// Issued request identifier, e.g. `REQ-000001`.
    pub request_id: String,
    /// Applicant name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Applicant gender, as entered.
    pub gender: String,
    /// Intended joining date, kept as entered.
    pub joined_at: String,
    /// Country of residence.
    #[serde(default)]
    pub country: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Current review status.
    pub status: RequestStatus,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
}

/// Input for adding a volunteer directly, bypassing the request flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewVolunteer {
    /// Volunteer name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Volunteer gender, as entered.
    pub gender: String,
    /// Joining date, kept as entered.
    pub joined_at: String,
    /// Country of residence.
    #[serde(default)]
    pub country: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// A registered volunteer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolunteerRecord {
    /// Issued volunteer identifier, e.g. `VOL-000042`. Doubles as the
    /// document id in the volunteers collection.
    pub volunteer_id: String,
    /// Volunteer name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Volunteer gender, as entered.
    pub gender: String,
    /// Joining date, kept as entered.
    pub joined_at: String,
    /// Accumulated volunteering hours.
    pub hours: u64,
    /// Current lifecycle status.
    pub status: VolunteerStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Country of residence.
    #[serde(default)]
    pub country: String,
    /// Organization the volunteer belongs to.
    #[serde(default)]
    pub organization: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Whether the record was added directly by an administrator rather
    /// than through an approved request.
    #[serde(default)]
    pub added_manually: bool,
}

/// Editable fields of a volunteer record; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolunteerUpdate {
    /// New accumulated hours.
    pub hours: Option<u64>,
    /// New lifecycle status.
    pub status: Option<VolunteerStatus>,
    /// New notes.
    pub notes: Option<String>,
}

/// A certificate, snapshotting the volunteer at issuance time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// Issued certificate identifier, e.g. `CERT-000007`.
    pub cert_id: String,
    /// The volunteer the certificate was issued to.
    pub volunteer_id: String,
    /// Volunteer name at issuance.
    pub name: String,
    /// Accumulated hours at issuance.
    pub hours_at_issue: u64,
    /// Volunteer status at issuance.
    pub status_at_issue: VolunteerStatus,
    /// Joining date at issuance.
    pub joined_at: String,
    /// Country at issuance.
    #[serde(default)]
    pub country: String,
    /// Organization at issuance.
    #[serde(default)]
    pub organization: String,
    /// When the certificate was issued.
    pub issued_at: DateTime<Utc>,
}
