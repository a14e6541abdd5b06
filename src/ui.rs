use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
};

use crate::domain::RvConfig;
use crate::model::UiData;

pub const CONTROLS_HEIGHT: usize = 3;
pub const TABLE_HEADER_HEIGHT: usize = 1;
pub const STATUS_HEIGHT: usize = 1;
pub const PICKER_WIDTH: usize = 27;
pub const COLUMN_SPACER: usize = 1;

pub struct RosterUI {}

impl RosterUI {
    pub fn new(_cfg: &RvConfig) -> Self {
        Self {}
    }

    pub fn draw(&mut self, uidata: &UiData, frame: &mut Frame) {
        let [controls_area, table_area, status_area] = Layout::vertical([
            Constraint::Length(CONTROLS_HEIGHT as u16),
            Constraint::Fill(1),
            Constraint::Length(STATUS_HEIGHT as u16),
        ])
        .areas(frame.area());

        let [search_area, picker_area] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(PICKER_WIDTH as u16),
        ])
        .areas(controls_area);

        self.draw_search_box(uidata, frame, search_area);
        self.draw_picker(uidata, frame, picker_area);
        self.draw_table(uidata, frame, table_area);
        self.draw_status_line(uidata, frame, status_area);

        if uidata.show_popup {
            self.draw_popup(uidata, frame);
        }
    }

    // Cyan and bold while the filter has matches, light red and dim when
    // the current term matches nothing.
    fn draw_search_box(&self, uidata: &UiData, frame: &mut Frame, area: Rect) {
        let style = if uidata.match_found {
            Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(Color::LightRed).add_modifier(Modifier::DIM)
        };

        let block = Block::bordered().title(" search ").style(style);
        frame.render_widget(
            Paragraph::new(uidata.search.input.as_str()).block(block),
            area,
        );

        if uidata.searching {
            frame.set_cursor_position((
                area.x + 1 + uidata.search.curser_pos as u16,
                area.y + 1,
            ));
        }
    }

    fn draw_picker(&self, uidata: &UiData, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title(" filter column ")
            .border_style(Style::new().fg(uidata.select_color));
        frame.render_widget(
            Paragraph::new(uidata.filter_field.as_str()).block(block),
            area,
        );
    }

    fn draw_table(&self, uidata: &UiData, frame: &mut Frame, area: Rect) {
        let mut xpos = 0u16;
        for (cidx, column) in uidata.table.iter().enumerate() {
            if xpos >= area.width {
                break;
            }
            let width = std::cmp::min((column.width + COLUMN_SPACER) as u16, area.width - xpos);
            let column_area = Rect {
                x: area.x + xpos,
                y: area.y,
                width,
                height: area.height,
            };

            let mut lines = Vec::with_capacity(column.data.len() + TABLE_HEADER_HEIGHT);
            lines.push(Line::styled(
                column.name.clone(),
                Style::new().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
            for (ridx, cell) in column.data.iter().enumerate() {
                let selected = cidx == uidata.selected_column && ridx == uidata.selected_row;
                let style = if selected {
                    Style::new().add_modifier(Modifier::REVERSED)
                } else {
                    Style::new()
                };
                // Pad to the column width so the reversed cell is visible
                // even when the value renders empty (masked ip cells).
                lines.push(Line::styled(
                    format!("{:<width$}", cell, width = column.width),
                    style,
                ));
            }

            frame.render_widget(Paragraph::new(lines), column_area);
            xpos += width;
        }
    }

    fn draw_status_line(&self, uidata: &UiData, frame: &mut Frame, area: Rect) {
        let counts = format!(" {} [{}/{}] ", uidata.name, uidata.nrows, uidata.total_rows);
        let line = Line::from(vec![
            Span::styled(counts, Style::new().add_modifier(Modifier::BOLD)),
            Span::raw(uidata.status_message.clone()),
        ]);
        let hints = Line::from(" / search  Tab column  ? help  q quit ")
            .style(Style::new().add_modifier(Modifier::DIM))
            .right_aligned();

        frame.render_widget(Paragraph::new(line), area);
        frame.render_widget(hints, area);
    }

    fn draw_popup(&self, uidata: &UiData, frame: &mut Frame) {
        let area = Self::centered_area(frame.area(), 60, 18);
        let block = Block::bordered().title(" help ");
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(uidata.popup_message.as_str()).block(block),
            area,
        );
    }

    fn centered_area(area: Rect, width: u16, height: u16) -> Rect {
        let width = std::cmp::min(width, area.width);
        let height = std::cmp::min(height, area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }
}
