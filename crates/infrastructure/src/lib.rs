//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_event_log_repository;
mod in_memory_event_repository;
mod in_memory_profile_repository;
mod postgres_event_log_repository;
mod postgres_event_repository;
mod postgres_profile_repository;

pub use in_memory_event_log_repository::InMemoryEventLogRepository;
pub use in_memory_event_repository::InMemoryEventRepository;
pub use in_memory_profile_repository::InMemoryProfileRepository;
pub use postgres_event_log_repository::PostgresEventLogRepository;
pub use postgres_event_repository::PostgresEventRepository;
pub use postgres_profile_repository::PostgresProfileRepository;
