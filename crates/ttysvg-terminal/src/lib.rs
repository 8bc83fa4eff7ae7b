#![deny(clippy::all)]

mod terminal;

pub use terminal::VirtualTerminal;
