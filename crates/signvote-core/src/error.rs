//! Intake and read view errors.

use signvote_store::StoreError;
use thiserror::Error;

/// Reason a submission failed structural validation.
///
/// Checked in declaration order; each variant is a distinct message shown
/// to the signer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please complete your signature and enter your name")]
    MissingSignatureOrName,

    #[error("Please enter your room number")]
    MissingRoom,

    #[error("Device information is incomplete, please refresh the page and try again")]
    MissingDeviceInfo,
}

/// Outcome of a rejected submission.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The device already holds a signature.
    #[error("This device has already signed")]
    AlreadySigned,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Read view errors.
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Signature {0} not found")]
    RecordNotFound(u64),

    #[error("Signature {0} has no image")]
    ImageNotFound(u64),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}
