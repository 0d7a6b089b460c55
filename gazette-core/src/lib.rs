pub mod announcements;
pub mod archive;
pub mod comments;
pub mod common;
pub mod display;
pub mod domain;
pub mod feed;
pub mod jobs;
pub mod layout;
pub mod media;
pub mod storage;

pub use common::error::{GazetteError, Result};
pub use domain::*;
