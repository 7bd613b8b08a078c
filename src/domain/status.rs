use super::errors::DomainError;

/// Lifecycle of a physical barcode token.
///
/// `issued` → `active` when a bill is created against the code;
/// `active` → `used` when the bill completes, `active` → `cancelled` when
/// the bill is cancelled. `used` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarcodeStatus {
    Issued,
    Active,
    Used,
    Cancelled,
}

impl BarcodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BarcodeStatus::Issued => "issued",
            BarcodeStatus::Active => "active",
            BarcodeStatus::Used => "used",
            BarcodeStatus::Cancelled => "cancelled",
        }
    }

    /// Parse the varchar the database stores. An unknown value means the row
    /// was written by something other than this service, so it is an
    /// internal error rather than caller input validation.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "issued" => Ok(BarcodeStatus::Issued),
            "active" => Ok(BarcodeStatus::Active),
            "used" => Ok(BarcodeStatus::Used),
            "cancelled" => Ok(BarcodeStatus::Cancelled),
            other => Err(DomainError::Internal(format!(
                "unknown barcode status '{}'",
                other
            ))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BarcodeStatus::Used | BarcodeStatus::Cancelled)
    }
}

/// Lifecycle of a shipment bill: `pending` → `completed` | `cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillStatus {
    Pending,
    Completed,
    Cancelled,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Completed => "completed",
            BillStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(BillStatus::Pending),
            "completed" => Ok(BillStatus::Completed),
            "cancelled" => Ok(BillStatus::Cancelled),
            other => Err(DomainError::Internal(format!(
                "unknown bill status '{}'",
                other
            ))),
        }
    }

    /// Parse a status supplied by a caller; unknown values are their problem.
    pub fn parse_input(s: &str) -> Result<Self, DomainError> {
        Self::parse(s).map_err(|_| {
            DomainError::Validation(format!("'{}' is not a valid bill status", s))
        })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BillStatus::Completed | BillStatus::Cancelled)
    }
}

/// The barcode status that must accompany a manual bill status update.
///
/// Only the two terminal bill states are reachable by update; asking for
/// anything else (including `pending`) is rejected.
pub fn barcode_status_for_update(target: BillStatus) -> Result<BarcodeStatus, DomainError> {
    match target {
        BillStatus::Completed => Ok(BarcodeStatus::Used),
        BillStatus::Cancelled => Ok(BarcodeStatus::Cancelled),
        BillStatus::Pending => Err(DomainError::InvalidStatus),
    }
}

/// Gate a scan against the barcode backing the code.
///
/// A `used` barcode means its bill already completed, so re-scans surface
/// the idempotent `AlreadyCompleted` rejection instead of a generic
/// not-active error; a `cancelled` barcode mirrors its cancelled bill.
pub fn check_barcode_scannable(current: BarcodeStatus) -> Result<(), DomainError> {
    match current {
        BarcodeStatus::Active => Ok(()),
        BarcodeStatus::Used => Err(DomainError::AlreadyCompleted),
        BarcodeStatus::Cancelled => Err(DomainError::InvalidState),
        BarcodeStatus::Issued => Err(DomainError::BarcodeNotActive),
    }
}

/// Gate a scan against the current bill status.
///
/// Pending bills complete; completed bills are rejected idempotently;
/// cancelled bills are an explicit conflict rather than a silent no-op.
pub fn check_scannable(current: BillStatus) -> Result<(), DomainError> {
    match current {
        BillStatus::Pending => Ok(()),
        BillStatus::Completed => Err(DomainError::AlreadyCompleted),
        BillStatus::Cancelled => Err(DomainError::InvalidState),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barcode_status_roundtrips() {
        for s in [
            BarcodeStatus::Issued,
            BarcodeStatus::Active,
            BarcodeStatus::Used,
            BarcodeStatus::Cancelled,
        ] {
            assert_eq!(BarcodeStatus::parse(s.as_str()).unwrap(), s);
        }
    }

    #[test]
    fn unknown_barcode_status_is_internal_error() {
        let err = BarcodeStatus::parse("broken").unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[test]
    fn used_and_cancelled_barcodes_are_terminal() {
        assert!(BarcodeStatus::Used.is_terminal());
        assert!(BarcodeStatus::Cancelled.is_terminal());
        assert!(!BarcodeStatus::Issued.is_terminal());
        assert!(!BarcodeStatus::Active.is_terminal());
    }

    #[test]
    fn bill_status_roundtrips() {
        for s in [
            BillStatus::Pending,
            BillStatus::Completed,
            BillStatus::Cancelled,
        ] {
            assert_eq!(BillStatus::parse(s.as_str()).unwrap(), s);
        }
    }

    #[test]
    fn caller_supplied_garbage_status_is_validation() {
        let err = BillStatus::parse_input("shipped").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn completed_update_marks_barcode_used() {
        assert_eq!(
            barcode_status_for_update(BillStatus::Completed).unwrap(),
            BarcodeStatus::Used
        );
    }

    #[test]
    fn cancelled_update_marks_barcode_cancelled() {
        assert_eq!(
            barcode_status_for_update(BillStatus::Cancelled).unwrap(),
            BarcodeStatus::Cancelled
        );
    }

    #[test]
    fn pending_is_not_a_valid_update_target() {
        assert!(matches!(
            barcode_status_for_update(BillStatus::Pending),
            Err(DomainError::InvalidStatus)
        ));
    }

    #[test]
    fn only_active_barcodes_are_scannable() {
        assert!(check_barcode_scannable(BarcodeStatus::Active).is_ok());
        assert!(matches!(
            check_barcode_scannable(BarcodeStatus::Issued),
            Err(DomainError::BarcodeNotActive)
        ));
        assert!(matches!(
            check_barcode_scannable(BarcodeStatus::Used),
            Err(DomainError::AlreadyCompleted)
        ));
        assert!(matches!(
            check_barcode_scannable(BarcodeStatus::Cancelled),
            Err(DomainError::InvalidState)
        ));
    }

    #[test]
    fn pending_bill_is_scannable() {
        assert!(check_scannable(BillStatus::Pending).is_ok());
    }

    #[test]
    fn completed_bill_rejects_rescan() {
        assert!(matches!(
            check_scannable(BillStatus::Completed),
            Err(DomainError::AlreadyCompleted)
        ));
    }

    #[test]
    fn cancelled_bill_rejects_scan() {
        assert!(matches!(
            check_scannable(BillStatus::Cancelled),
            Err(DomainError::InvalidState)
        ));
    }
}
