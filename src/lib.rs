pub mod bot;
pub mod chatbot;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gemini;
pub mod persona;
pub mod prompt;
pub mod user_state;

pub use bot::run;
