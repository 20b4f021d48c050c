pub mod invoices;
pub mod storage;
pub mod trips;
pub mod verification;
