use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};

use super::block;
use crate::draw::{add_padding, PaddingDirection};

const TEXT: &str = r#"
Quit: q or <Ctrl+c>
Help: ? (<Esc> to go back)
Landing:
  - l: sign in
  - r: register
Forms:
  - <Tab> / <Shift+Tab>: move
    between fields
  - <Enter>: submit
  - <Esc>: back / cancel
Dashboard:
  - <Up / Down>: select portfolio
  - <Enter>: open portfolio
  - c: create portfolio
  - g: refresh
  - l: log out
Portfolio:
  - d: deposit funds
  - w: withdraw funds
  - a: add stock
  - u: update prices
  - t: transaction history
Transactions:
  - g: refresh
"#;

pub const HELP_WIDTH: u16 = 38;
pub const HELP_HEIGHT: u16 = 28;

#[derive(Copy, Clone)]
pub struct HelpWidget {}

impl HelpWidget {
    pub fn get_rect(self, area: Rect) -> Rect {
        Rect {
            x: (area.width - HELP_WIDTH) / 2,
            y: (area.height - HELP_HEIGHT) / 2,
            width: HELP_WIDTH,
            height: HELP_HEIGHT,
        }
    }
}

impl Widget for HelpWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        block::new(" Help - <ESC> to go back ").render(area, buf);

        let text: Vec<_> = TEXT
            .lines()
            .map(|line| Line::styled(line.to_string(), Style::default()))
            .collect();

        let mut help_area = area;
        help_area = add_padding(help_area, 2, PaddingDirection::Left);
        help_area = add_padding(help_area, 1, PaddingDirection::Top);

        Paragraph::new(text).render(help_area, buf);
    }
}
