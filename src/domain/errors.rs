use thiserror::Error;

/// Everything that can go wrong inside a bill/barcode transition.
///
/// Variants are deliberately fine-grained so the HTTP layer can map them to
/// the right status code while keeping the messages human-readable for the
/// scanner and back-office clients.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Barcode not found")]
    BarcodeNotFound,

    #[error("Bill not found")]
    BillNotFound,

    #[error("This barcode was not issued to you")]
    BarcodeNotOwned,

    #[error("Barcode is either not issued or already expired")]
    BarcodeNotAvailable,

    #[error("Barcode is not active")]
    BarcodeNotActive,

    #[error("Invalid status for bill")]
    InvalidStatus,

    #[error("Bill has already been completed")]
    AlreadyCompleted,

    #[error("Bill is not in a scannable state")]
    InvalidState,

    #[error("All codes in the requested range are already issued")]
    NoNewCodes,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
