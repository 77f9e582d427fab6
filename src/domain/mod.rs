// Domain layer - Pure types and functions, no I/O
pub mod access;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod stats;
pub mod submission;
pub mod visibility;
