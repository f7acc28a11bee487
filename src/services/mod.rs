pub mod auth;
pub mod gemini;

pub use auth::AuthService;
pub use gemini::GeminiService;
