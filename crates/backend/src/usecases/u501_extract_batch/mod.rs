pub mod executor;
pub mod page_fetcher;
