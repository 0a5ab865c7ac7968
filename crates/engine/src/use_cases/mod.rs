//! Application use cases.
//!
//! One struct per operation. Use cases depend only on port traits so the
//! whole layer runs against mocks in tests.

pub mod character_sheet;
pub mod dm;
pub mod message;
pub mod prolog;
pub mod room;
pub mod summary;
