pub mod barcodes;
pub mod bills;
pub mod scan;
