pub mod u501_extract_batch;
