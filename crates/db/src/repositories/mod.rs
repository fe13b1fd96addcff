//! Repository layer.
//!
//! Zero-sized repository types. Record CRUD comes from
//! [`RecordRepo`](crate::store::RecordRepo); the modules here add the
//! queries specific to one kind.

pub mod counter_repo;
pub mod user_repo;

pub use counter_repo::CounterRepo;
pub use user_repo::UserRepo;
