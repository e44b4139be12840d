//! Discord side of the bot: runs dispatched actions against Gemini and
//! posts the results.

mod handler;
mod image;
mod response;

pub use handler::handle_message;
