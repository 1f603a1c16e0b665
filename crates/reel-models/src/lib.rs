pub mod media;
pub mod membership;

pub use media::{MediaType, MovieRecord};
pub use membership::{ListName, Membership};
