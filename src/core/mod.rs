pub mod fs;
pub mod informer;
pub mod naming;
