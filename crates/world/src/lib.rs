#![warn(missing_docs)]
//! World-side state of the custom item engine: placed custom blocks, the
//! edit queue feeding them and block-mine dispatch.

mod blocks;
mod dispatch;
mod queue;

pub use blocks::*;
pub use dispatch::*;
pub use queue::*;
