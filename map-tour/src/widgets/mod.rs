mod dialogs;
mod overlay;
mod status;
pub use dialogs::show_dialogs;
pub use overlay::{desktop_message, title_overlay};
pub use status::status_bar;
