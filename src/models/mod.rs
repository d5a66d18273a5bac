mod movie;

pub use movie::{Movie, MovieMetadata};
