mod errors;

pub use errors::Error;

pub type CinerateResult<T> = Result<T, Error>;
