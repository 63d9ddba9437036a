pub mod a001_product;
pub mod a002_batch;
pub mod error;
pub mod u501_extract_batch;
pub mod validation;
