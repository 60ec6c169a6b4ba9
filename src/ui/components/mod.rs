mod command_overlay;
mod input;
mod key_result;
mod search_input;
mod select_overlay;

pub use command_overlay::draw_command_overlay;
pub use input::{InputResult, TextInput};
pub use key_result::KeyResult;
pub use search_input::{SearchEvent, SearchInput};
pub use select_overlay::{SelectEvent, SelectItem, SelectOverlay};
