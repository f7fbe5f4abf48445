//! Resume ingestion: document text extraction (with vision fallback),
//! structured field extraction, and the upload handler tying both to storage.

pub mod handlers;
pub mod info;
pub mod prompts;
pub mod text;
