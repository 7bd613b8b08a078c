pub mod errors;
pub mod fields;
pub mod status;

pub use errors::DomainError;
pub use fields::{Material, Region, VehicleSize};
pub use status::{BarcodeStatus, BillStatus};
