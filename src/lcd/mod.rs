pub mod font;
pub mod framebuffer;
pub mod output;
pub mod panel;
pub mod screen;

pub use framebuffer::Framebuffer;
pub use output::Output;
pub use screen::Color;
