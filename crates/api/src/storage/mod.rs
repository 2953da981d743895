// Storage layer for Pickup Hoops
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// Services talk to storage only through the HoopsStore trait:
// - PostgresStore: sqlx queries, one transaction per action
// - InMemoryStore: parking_lot guarded tables for dev mode and tests

pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::InMemoryStore;
pub use models::*;
pub use postgres::PostgresStore;
pub use store::{BackOutOutcome, DeleteOutcome, HoopsStore, StoreError};
