//! UI components and rendering
//!
//! egui pieces of the chat window: color conversion, the transcript view,
//! the connect/error dialogs and the surface state they operate on.

pub mod colors;
pub mod dialogs;
pub mod surface;
pub mod transcript;

// Re-exports for convenience
pub use colors::{ToEguiColor, UiColors};
pub use dialogs::{ConnectDialog, DialogAction, ErrorDialog};
pub use surface::ChatSurface;
pub use transcript::TranscriptView;
