/// Widgets layered over the main screen, and picture area state
pub mod alert;
pub mod filter_menu;
pub mod preview;

pub use alert::Alert;
pub use preview::{PendingIntensity, PreviewChoice};
