pub mod barcode;
pub mod bill;
pub mod person;
