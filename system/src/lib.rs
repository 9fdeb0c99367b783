mod message;
mod room_content;
mod types;

pub use message::*;
pub use room_content::*;
pub use types::*;

pub extern crate serde;
pub extern crate serde_json;
