/// Basic application code
pub mod app;
/// REST clients for outside services
pub mod client;
/// Controllers for REST endpoints
pub mod controller;
/// Cryptography-related objects
pub mod crypto;
/// Domain objects
pub mod domain;
/// Subscription lifecycle engine
pub mod engine;
/// Error enums
pub mod error;
/// Stock availability rules
pub mod inventory;
/// Confirmation message dispatch
pub mod notify;
/// Repositories
pub mod repo;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
