pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Health, Init, Keygen, List, Receive, Register, Relay, SendFile, Version};
