//! Data layer: the `Storage` trait the site reads through, and an
//! in-memory implementation seeded from a JSON fixture.

pub mod fixture;
pub mod memory;
pub mod query;
pub mod traits;

pub use fixture::{Fixture, FixtureSummary};
pub use memory::InMemoryStorage;
pub use query::{ArticleQuery, CommentQuery};
pub use traits::Storage;
