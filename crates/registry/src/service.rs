//! Volunteer registry service over the document store.
//!
//! Data-layer counterpart of the admin surface: signup requests,
//! volunteer records, and certificate issuance. All identifiers come
//! from the sequential issuer; all persistence goes through
//! [`DocumentStore`].

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use snafu::{OptionExt, ensure};
use volreg_issuer::SequentialIdIssuer;
use volreg_store::{Document, DocumentKey, DocumentStore};

use crate::{
    error::{NotFoundSnafu, Result, VolunteerInactiveSnafu},
    types::{
        CertificateRecord, NewRequest, NewVolunteer, RequestStatus, VolunteerRecord,
        VolunteerRequest, VolunteerStatus, VolunteerUpdate,
    },
};

/// Collection of signup requests.
pub const REQUESTS_COLLECTION: &str = "volunteer_requests";

/// Collection of registered volunteers.
pub const VOLUNTEERS_COLLECTION: &str = "volunteers";

/// Collection of issued certificates.
pub const CERTIFICATES_COLLECTION: &str = "certificates";

const REQUEST_NAMESPACE: &str = "requests";
const REQUEST_PREFIX: &str = "REQ";
const VOLUNTEER_NAMESPACE: &str = "volunteers";
const VOLUNTEER_PREFIX: &str = "VOL";
const CERTIFICATE_NAMESPACE: &str = "certificates";
const CERTIFICATE_PREFIX: &str = "CERT";

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct RegistryConfig {
    /// Organization name stamped into volunteer and certificate records.
    #[builder(into, default)]
    pub organization: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { organization: String::new() }
    }
}

/// Service for the request, volunteer, and certificate collections.
///
/// Generic over the backing [`DocumentStore`]; thread safety is the
/// store's. The service holds no state of its own beyond configuration.
pub struct RegistryService<S> {
    store: Arc<S>,
    issuer: SequentialIdIssuer<S>,
    config: RegistryConfig,
}

impl<S: DocumentStore> RegistryService<S> {
    /// Creates a registry service with default configuration.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, RegistryConfig::default())
    }

    /// Creates a registry service with the given configuration.
    pub fn with_config(store: Arc<S>, config: RegistryConfig) -> Self {
        let issuer = SequentialIdIssuer::new(Arc::clone(&store));
        Self { store, issuer, config }
    }

    /// The issuer backing registry identifiers.
    pub fn issuer(&self) -> &SequentialIdIssuer<S> {
        &self.issuer
    }

    // =========================================================================
    // Signup Requests
    // =========================================================================

    /// Submits a signup request for review.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Issuer`](crate::RegistryError::Issuer) if
    /// the request id cannot be issued, or
    /// [`RegistryError::Store`](crate::RegistryError::Store) if the write
    /// fails.
    pub async fn submit_request(&self, input: NewRequest) -> Result<VolunteerRequest> {
        let id = self.issuer.issue(REQUEST_NAMESPACE, REQUEST_PREFIX).await?;
        let request = VolunteerRequest {
            request_id: id.into_string(),
            name: input.name,
            phone: input.phone,
            gender: input.gender,
            joined_at: input.joined_at,
            country: input.country,
            notes: input.notes,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        };

        self.put(REQUESTS_COLLECTION, &request.request_id, &request).await?;
        tracing::info!(request_id = %request.request_id, "signup request submitted");
        Ok(request)
    }

    /// Returns a request by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`](crate::RegistryError::Store) if
    /// the read or decode fails.
    pub async fn get_request(&self, request_id: &str) -> Result<Option<VolunteerRequest>> {
        let key = DocumentKey::new(REQUESTS_COLLECTION, request_id);
        match self.store.get(&key).await? {
            Some(doc) => Ok(Some(doc.deserialize_into()?)),
            None => Ok(None),
        }
    }

    /// Lists requests still awaiting review, ordered by request id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`](crate::RegistryError::Store) if
    /// the list or a decode fails.
    pub async fn pending_requests(&self) -> Result<Vec<VolunteerRequest>> {
        let docs = self.store.list(REQUESTS_COLLECTION).await?;
        let mut pending = Vec::new();
        for (_, doc) in docs {
            let request: VolunteerRequest = doc.deserialize_into()?;
            if request.status == RequestStatus::Pending {
                pending.push(request);
            }
        }
        Ok(pending)
    }

    /// Approves a request: issues a volunteer id, creates the volunteer
    /// record, and marks the request approved.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`](crate::RegistryError::NotFound)
    /// if the request does not exist; issuance and store failures
    /// propagate unchanged.
    pub async fn approve_request(&self, request_id: &str) -> Result<VolunteerRecord> {
        let mut request = self.fetch_request(request_id).await?;

        let input = NewVolunteer {
            name: request.name.clone(),
            phone: request.phone.clone(),
            gender: request.gender.clone(),
            joined_at: request.joined_at.clone(),
            country: request.country.clone(),
            notes: request.notes.clone(),
        };
        let volunteer = self.create_volunteer(input, false).await?;

        request.status = RequestStatus::Approved;
        self.put(REQUESTS_COLLECTION, request_id, &request).await?;

        tracing::info!(
            request_id,
            volunteer_id = %volunteer.volunteer_id,
            "signup request approved"
        );
        Ok(volunteer)
    }

    /// Rejects a request.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`](crate::RegistryError::NotFound)
    /// if the request does not exist.
    pub async fn reject_request(&self, request_id: &str) -> Result<VolunteerRequest> {
        let mut request = self.fetch_request(request_id).await?;
        request.status = RequestStatus::Rejected;
        self.put(REQUESTS_COLLECTION, request_id, &request).await?;
        tracing::info!(request_id, "signup request rejected");
        Ok(request)
    }

    // =========================================================================
    // Volunteers
    // =========================================================================

    /// Adds a volunteer directly, bypassing the request flow.
    ///
    /// # Errors
    ///
    /// Issuance and store failures propagate unchanged.
    pub async fn add_volunteer(&self, input: NewVolunteer) -> Result<VolunteerRecord> {
        self.create_volunteer(input, true).await
    }

    async fn create_volunteer(
        &self,
        input: NewVolunteer,
        added_manually: bool,
    ) -> Result<VolunteerRecord> {
        let id = self.issuer.issue(VOLUNTEER_NAMESPACE, VOLUNTEER_PREFIX).await?;
        let record = VolunteerRecord {
            volunteer_id: id.into_string(),
            name: input.name,
            phone: input.phone,
            gender: input.gender,
            joined_at: input.joined_at,
            hours: 0,
            status: VolunteerStatus::Active,
            notes: input.notes,
            country: input.country,
            organization: self.config.organization.clone(),
            created_at: Utc::now(),
            added_manually,
        };

        self.put(VOLUNTEERS_COLLECTION, &record.volunteer_id, &record).await?;
        tracing::info!(
            volunteer_id = %record.volunteer_id,
            added_manually,
            "volunteer registered"
        );
        Ok(record)
    }

    /// Returns a volunteer by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`](crate::RegistryError::Store) if
    /// the read or decode fails.
    pub async fn get_volunteer(&self, volunteer_id: &str) -> Result<Option<VolunteerRecord>> {
        let key = DocumentKey::new(VOLUNTEERS_COLLECTION, volunteer_id);
        match self.store.get(&key).await? {
            Some(doc) => Ok(Some(doc.deserialize_into()?)),
            None => Ok(None),
        }
    }

    /// Lists all volunteers, ordered by volunteer id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`](crate::RegistryError::Store) if
    /// the list or a decode fails.
    pub async fn list_volunteers(&self) -> Result<Vec<VolunteerRecord>> {
        let docs = self.store.list(VOLUNTEERS_COLLECTION).await?;
        let mut volunteers = Vec::with_capacity(docs.len());
        for (_, doc) in docs {
            volunteers.push(doc.deserialize_into()?);
        }
        Ok(volunteers)
    }

    /// Applies an edit to a volunteer record; unset fields are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`](crate::RegistryError::NotFound)
    /// if the volunteer does not exist.
    pub async fn update_volunteer(
        &self,
        volunteer_id: &str,
        update: VolunteerUpdate,
    ) -> Result<VolunteerRecord> {
        let mut record = self.fetch_volunteer(volunteer_id).await?;
        if let Some(hours) = update.hours {
            record.hours = hours;
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(notes) = update.notes {
            record.notes = notes;
        }

        self.put(VOLUNTEERS_COLLECTION, volunteer_id, &record).await?;
        tracing::info!(volunteer_id, "volunteer record updated");
        Ok(record)
    }

    /// Removes a volunteer. Returns whether the record existed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`](crate::RegistryError::Store) if
    /// the delete fails.
    pub async fn remove_volunteer(&self, volunteer_id: &str) -> Result<bool> {
        let key = DocumentKey::new(VOLUNTEERS_COLLECTION, volunteer_id);
        let existed = self.store.delete(&key).await?;
        if existed {
            tracing::info!(volunteer_id, "volunteer removed");
        }
        Ok(existed)
    }

    // =========================================================================
    // Certificates
    // =========================================================================

    /// Issues a certificate to a volunteer, snapshotting the record at
    /// issuance time. Inactive volunteers are refused.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`](crate::RegistryError::NotFound)
    /// if the volunteer does not exist, or
    /// [`RegistryError::VolunteerInactive`](crate::RegistryError::VolunteerInactive)
    /// if the volunteer is inactive. Issuance and store failures propagate
    /// unchanged.
    pub async fn issue_certificate(&self, volunteer_id: &str) -> Result<CertificateRecord> {
        let volunteer = self.fetch_volunteer(volunteer_id).await?;
        ensure!(
            volunteer.status != VolunteerStatus::Inactive,
            VolunteerInactiveSnafu { volunteer_id }
        );

        let id = self.issuer.issue(CERTIFICATE_NAMESPACE, CERTIFICATE_PREFIX).await?;
        let certificate = CertificateRecord {
            cert_id: id.into_string(),
            volunteer_id: volunteer.volunteer_id.clone(),
            name: volunteer.name.clone(),
            hours_at_issue: volunteer.hours,
            status_at_issue: volunteer.status,
            joined_at: volunteer.joined_at.clone(),
            country: volunteer.country.clone(),
            organization: volunteer.organization.clone(),
            issued_at: Utc::now(),
        };

        self.put(CERTIFICATES_COLLECTION, &certificate.cert_id, &certificate).await?;
        tracing::info!(volunteer_id, cert_id = %certificate.cert_id, "certificate issued");
        Ok(certificate)
    }

    /// Returns a certificate by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`](crate::RegistryError::Store) if
    /// the read or decode fails.
    pub async fn get_certificate(&self, cert_id: &str) -> Result<Option<CertificateRecord>> {
        let key = DocumentKey::new(CERTIFICATES_COLLECTION, cert_id);
        match self.store.get(&key).await? {
            Some(doc) => Ok(Some(doc.deserialize_into()?)),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn fetch_request(&self, request_id: &str) -> Result<VolunteerRequest> {
        let key = DocumentKey::new(REQUESTS_COLLECTION, request_id);
        let doc = self
            .store
            .get(&key)
            .await?
            .context(NotFoundSnafu { entity: format!("request {request_id}") })?;
        Ok(doc.deserialize_into()?)
    }

    async fn fetch_volunteer(&self, volunteer_id: &str) -> Result<VolunteerRecord> {
        let key = DocumentKey::new(VOLUNTEERS_COLLECTION, volunteer_id);
        let doc = self
            .store
            .get(&key)
            .await?
            .context(NotFoundSnafu { entity: format!("volunteer {volunteer_id}") })?;
        Ok(doc.deserialize_into()?)
    }

    async fn put<T: Serialize>(&self, collection: &str, id: &str, record: &T) -> Result<()> {
        let doc = Document::serialize_from(record)?;
        self.store.set(&DocumentKey::new(collection, id), doc.fields, false).await?;
        Ok(())
    }
}
