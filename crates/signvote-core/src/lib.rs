//! Petition signature intake and device deduplication.
//!
//! A device presents two identifiers, a client-generated uuid and a
//! browser-derived fingerprint. Intake refuses a submission when either
//! identifier already belongs to a stored signature; read paths resolve a
//! device by uuid first and fall back to the fingerprint.

mod error;
mod intake;
mod normalizer;
mod resolver;
mod stats;
mod types;
mod views;

pub use error::{IntakeError, ValidationError, ViewError};
pub use intake::IntakeService;
pub use normalizer::{normalize, normalize_at, strip_data_uri, NormalizedSignature};
pub use resolver::IdentityResolver;
pub use stats::{compute_progress, PetitionStats, StatsAggregator, DEFAULT_TARGET};
pub use types::{DeviceIdentity, SignaturePayload};
pub use views::{OwnSignature, PublicSignature, ReadViews, SignatureImage, SignatureStatus};

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use signvote_store::{
        Column, ListOrder, NewSignatureRecord, SignatureRecord, SignatureStore, StoreError,
    };

    mockall::mock! {
        pub Store {}

        #[async_trait]
        impl SignatureStore for Store {
            async fn insert(&self, record: NewSignatureRecord) -> Result<SignatureRecord, StoreError>;
            async fn find_by(&self, column: Column, value: &str) -> Result<Option<SignatureRecord>, StoreError>;
            async fn find_by_or(
                &self,
                column_a: Column,
                value_a: &str,
                column_b: Column,
                value_b: &str,
            ) -> Result<Vec<SignatureRecord>, StoreError>;
            async fn count(&self) -> Result<u64, StoreError>;
            async fn list_all(&self, order: ListOrder) -> Result<Vec<SignatureRecord>, StoreError>;
            async fn find_by_id(&self, id: u64) -> Result<Option<SignatureRecord>, StoreError>;
            async fn health_check(&self) -> bool;
        }
    }

    /// Storage failure used by mocked stores.
    pub fn io_failure() -> StoreError {
        StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk unavailable",
        ))
    }

    /// A complete, valid submission.
    pub fn payload(uuid: &str, fingerprint: &str) -> crate::SignaturePayload {
        crate::SignaturePayload {
            signature_data: Some("data:image/png;base64,AAA".into()),
            signature_name: Some("Alice".into()),
            room_number: Some("12B".into()),
            device_uuid: Some(uuid.into()),
            device_fingerprint: Some(fingerprint.into()),
            signature_time: None,
        }
    }
}
