// Application layer - Use cases and repository ports
pub mod dashboard_service;
pub mod submission_repository;
pub mod visibility_gate;
