//! One attached page. Commands are split by CDP domain; each file adds an
//! `impl PageSession` block.

mod core;
mod dom;
mod input;
mod js;
mod navigation;

pub use self::core::PageSession;
