use ratatui::layout::{Rect, Layout as RatLayout, Direction, Constraint};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub header_area: Rect,
    pub toolbar_area: Rect,
    pub sidebar_area: Rect,
    pub main_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions, borders excluded.
    /// Width fits the toolbar's fixed boxes plus a short search field.
    /// Height: header 1 + toolbar 3 + editor (3 title + 4 tags + 3 content) + status 1.
    pub const MIN_WIDTH: u16 = 80;
    pub const MIN_HEIGHT: u16 = 15;

    pub fn calculate(size: Rect, sidebar_width_percent: u16, sidebar_open: bool) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // Sidebar: at least 25 columns, at most 40%, and the editor keeps 30
        let sidebar_width = if sidebar_open {
            let requested_width = (inner_area.width * sidebar_width_percent) / 100;
            let max_width = (inner_area.width * 40) / 100;
            requested_width
                .max(25)
                .min(max_width)
                .min(inner_area.width.saturating_sub(30))
        } else {
            0
        };

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(3), // Toolbar
                Constraint::Min(1),    // Sidebar + editor
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(1)])
            .split(vertical[2]);

        Self {
            inner_area,
            header_area: vertical[0],
            toolbar_area: vertical[1],
            sidebar_area: horizontal[0],
            main_area: horizontal[1],
            status_area: vertical[3],
        }
    }

    /// Terminal size including the outer border
    pub fn fits(width: u16, height: u16) -> bool {
        width >= Self::MIN_WIDTH + 2 && height >= Self::MIN_HEIGHT + 2
    }
}
