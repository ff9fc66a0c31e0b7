pub mod alert;
pub mod header;
pub mod help;
pub mod input_panel;
pub mod network_panel;
pub mod status_bar;
pub mod text_area;
pub mod text_field;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::events::AppEvent;

/// Trait for all UI components
pub trait Component {
    /// Handle a key event, optionally returning an AppEvent
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent>;

    /// Render the component into the given area
    fn render(&mut self, frame: &mut Frame, area: Rect);
}
