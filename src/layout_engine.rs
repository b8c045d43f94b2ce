pub mod chatbox;
mod detector;
mod engine;
pub mod error;
mod fixups;
pub mod ids;
pub mod interface_fix;
pub mod resize;
mod reset;
pub mod tables;
pub mod transform;

pub use chatbox::ChatContext;
pub use detector::detect;
pub use engine::LayoutEngine;
pub use error::FixupError;
pub use resize::ResizeCommit;
pub use transform::{Applied, Guard, Ownership, Revalidate, SpriteSpec, TransformSpec};
