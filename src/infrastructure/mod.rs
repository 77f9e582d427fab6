// Infrastructure layer - External dependencies and adapters
pub mod chunked_csv;
pub mod config;
pub mod firestore_repository;
pub mod firestore_value;
pub mod http_response;
