pub mod collaboration;
pub mod trip;
pub mod user;
