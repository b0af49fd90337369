mod app;
pub mod board;
pub mod column;
pub mod form;
pub mod input;

pub use app::{build_footer_text, App, AppState, Surface};
pub use board::Board;
pub use column::Column;
pub use form::{Form, FormOutcome, FormStage};
