pub mod diagnostic;
pub mod record;
pub mod summary;
