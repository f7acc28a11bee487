pub mod collaboration;
pub mod trip;
pub mod user;

pub use collaboration::*;
pub use trip::*;
pub use user::*;
