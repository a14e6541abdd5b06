use arboard::Clipboard;
use ratatui::crossterm::event::KeyEvent;
use ratatui::style::Color;
use tracing::{debug, trace};

use crate::dataset::{Field, Record, derive_fields, filter};
use crate::display::{Selection, render_cell, select_color};
use crate::domain::{HELP_TEXT, Message, RvConfig, RvError};
use crate::inputter::{InputResult, Inputter};
use crate::ui::{
    COLUMN_SPACER, CONTROLS_HEIGHT, PICKER_WIDTH, STATUS_HEIGHT, TABLE_HEADER_HEIGHT,
};

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    SEARCH,
    POPUP,
}

/// One rendered column handed to the UI: header name, render width and
/// the visible cell strings, display rules already applied.
#[derive(Clone, Debug)]
pub struct ColumnView {
    pub name: String,
    pub width: usize,
    pub data: Vec<String>,
}

#[derive(Default, Clone, Debug)]
pub struct UiLayout {
    pub width: usize,
    pub height: usize,
    pub controls_height: usize,
    pub picker_width: usize,
    pub table_width: usize,
    pub table_height: usize,
    pub status_height: usize,
}

impl UiLayout {
    pub fn from_values(ui_width: usize, ui_height: usize) -> Self {
        let table_height = ui_height
            .saturating_sub(CONTROLS_HEIGHT + TABLE_HEADER_HEIGHT + STATUS_HEIGHT);
        let layout = UiLayout {
            width: ui_width,
            height: ui_height,
            controls_height: CONTROLS_HEIGHT,
            picker_width: PICKER_WIDTH,
            table_width: ui_width,
            table_height,
            status_height: STATUS_HEIGHT,
        };
        trace!("Build UiLayout: {:?}", layout);
        layout
    }
}

/// Snapshot of everything the UI needs for one frame. Rebuilt from the
/// model state after every transition, the UI never keeps derived data.
#[derive(Clone, Debug)]
pub struct UiData {
    pub name: String,
    pub table: Vec<ColumnView>,
    pub nrows: usize,
    pub total_rows: usize,
    pub selected_row: usize,
    pub selected_column: usize,
    pub abs_selected_row: usize,
    pub match_found: bool,
    pub search: InputResult,
    pub searching: bool,
    pub filter_field: String,
    pub select_color: Color,
    pub show_popup: bool,
    pub popup_message: String,
    pub status_message: String,
    pub layout: UiLayout,
}

impl UiData {
    fn empty() -> Self {
        UiData {
            name: String::new(),
            table: Vec::new(),
            nrows: 0,
            total_rows: 0,
            selected_row: 0,
            selected_column: 0,
            abs_selected_row: 0,
            match_found: false,
            search: InputResult::default(),
            searching: false,
            filter_field: String::new(),
            select_color: Color::Reset,
            show_popup: false,
            popup_message: String::new(),
            status_message: String::new(),
            layout: UiLayout::default(),
        }
    }
}

pub struct Model {
    name: String,
    config: RvConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    records: Vec<Record>,
    fields: Vec<Field>,
    selection: Selection,
    search_term: String,
    rows: Vec<usize>, // Mapping of display row index to record index
    curser_row: usize,
    offset_row: usize,
    curser_column: usize,
    uilayout: UiLayout,
    uidata: UiData,
    clipboard: Option<Clipboard>,
    input: Inputter,
    last_input: InputResult,
    status_message: String,
}

impl Model {
    pub fn new(
        name: impl Into<String>,
        records: Vec<Record>,
        config: &RvConfig,
        initial_field: Option<Field>,
        ui_width: usize,
        ui_height: usize,
    ) -> Result<Self, RvError> {
        let fields = derive_fields(&records);
        if fields.is_empty() {
            return Err(RvError::LoadingFailed("Dataset has no records!".into()));
        }

        let mut selection = Selection::default();
        if let Some(field) = initial_field {
            if !fields.contains(&field) {
                return Err(RvError::UnknownField(field.name().to_string()));
            }
            selection = selection.with_filter_field(field);
        }

        let rows = filter(&records, selection.filter_field, "");
        let mut model = Self {
            name: name.into(),
            config: config.clone(),
            status: Status::READY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            records,
            fields,
            selection,
            search_term: String::new(),
            rows,
            curser_row: 0,
            offset_row: 0,
            curser_column: 0,
            uilayout: UiLayout::from_values(ui_width, ui_height),
            uidata: UiData::empty(),
            // The clipboard is best effort, headless sessions run without one
            clipboard: Clipboard::new().ok(),
            input: Inputter::default(),
            last_input: InputResult::default(),
            status_message: String::new(),
        };
        model.update_table_data();
        Ok(model)
    }

    pub fn get_uidata(&self) -> &UiData {
        &self.uidata
    }

    /// While the search box has focus, key events bypass the normal key
    /// map and feed the inputter directly.
    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::SEARCH
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), RvError> {
        let Some(msg) = message else {
            return Ok(());
        };

        match self.modus {
            Modus::TABLE => match msg {
                Message::Quit => self.quit(),
                Message::MoveUp => self.move_selection_up(1),
                Message::MoveDown => self.move_selection_down(1),
                Message::MoveLeft => self.move_selection_left(),
                Message::MoveRight => self.move_selection_right(),
                Message::MoveBeginning => self.move_selection_beginning(),
                Message::MoveEnd => self.move_selection_end(),
                Message::SelectCell => self.click_curser_cell(),
                Message::Click(x, y) => self.click(x as usize, y as usize),
                Message::NextField => self.cycle_filter_field(1),
                Message::PrevField => self.cycle_filter_field(-1),
                Message::Search => self.enter_search(),
                Message::Exit => self.clear_search(),
                Message::SortAscending => self.sort_curser_column(true),
                Message::SortDescending => self.sort_curser_column(false),
                Message::CopyCell => self.copy_cell(),
                Message::CopyRow => self.copy_row(),
                Message::Help => self.show_help(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            },
            Modus::SEARCH => match msg {
                Message::RawKey(key) => self.raw_input(key),
                Message::Click(x, y) => self.click(x as usize, y as usize),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            },
            Modus::POPUP => match msg {
                Message::Quit => self.quit(),
                Message::Exit | Message::Help => self.close_popup(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            },
        }
        Ok(())
    }

    // ------------------------- Derived data -------------------------- //

    /// Re-run the filter over the full dataset and rebuild the rendered
    /// columns. Called after every transition that can change the view.
    fn apply_filter(&mut self) {
        self.rows = filter(&self.records, self.selection.filter_field, &self.search_term);
        debug!(
            "Filter field {:?} term {:?} matched {} of {} records",
            self.selection.filter_field,
            self.search_term,
            self.rows.len(),
            self.records.len()
        );
        if !self.search_term.is_empty() {
            self.status_message = format!(
                "{} of {} rows match \"{}\"",
                self.rows.len(),
                self.records.len(),
                self.search_term
            );
        } else {
            self.status_message.clear();
        }
        self.clamp_curser();
        self.update_table_data();
    }

    fn clamp_curser(&mut self) {
        self.curser_column = self.curser_column.min(self.fields.len() - 1);
        if self.rows.is_empty() {
            self.curser_row = 0;
            self.offset_row = 0;
            return;
        }
        let last = self.rows.len() - 1;
        if self.offset_row + self.curser_row > last {
            self.offset_row = last.saturating_sub(self.uilayout.table_height.saturating_sub(1));
            self.curser_row = last - self.offset_row;
        }
        // A resize can leave the curser below the visible window
        if self.curser_row >= self.uilayout.table_height && self.uilayout.table_height > 0 {
            self.offset_row += self.curser_row - (self.uilayout.table_height - 1);
            self.curser_row = self.uilayout.table_height - 1;
        }
    }

    fn update_table_data(&mut self) {
        let rbegin = self.offset_row;
        let rend = std::cmp::min(rbegin + self.uilayout.table_height, self.rows.len());

        let mut table = Vec::with_capacity(self.fields.len());
        for field in self.fields.iter() {
            let rendered: Vec<String> = self
                .rows
                .iter()
                .map(|&ridx| render_cell(*field, &self.records[ridx], &self.selection))
                .collect();
            let width = rendered
                .iter()
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
                .max(field.name().len())
                .min(self.config.max_column_width);
            table.push(ColumnView {
                name: field.name().to_string(),
                width,
                data: rendered[rbegin..rend].to_vec(),
            });
        }

        self.uidata = UiData {
            name: self.name.clone(),
            table,
            nrows: self.rows.len(),
            total_rows: self.records.len(),
            selected_row: self.curser_row,
            selected_column: self.curser_column,
            abs_selected_row: self.offset_row + self.curser_row,
            match_found: !self.rows.is_empty(),
            search: self.last_input.clone(),
            searching: self.modus == Modus::SEARCH,
            filter_field: self.selection.filter_field.name().to_string(),
            select_color: select_color(self.selection.filter_field),
            show_popup: self.modus == Modus::POPUP,
            popup_message: if self.modus == Modus::POPUP {
                HELP_TEXT.to_string()
            } else {
                String::new()
            },
            status_message: self.status_message.clone(),
            layout: self.uilayout.clone(),
        };
        // Keep the search box content in sync outside of search mode
        if self.modus != Modus::SEARCH {
            self.uidata.search.input = self.search_term.clone();
        }
    }

    // --------------------- Control handling -------------------------- //

    fn move_selection_up(&mut self, size: usize) {
        if self.curser_row > 0 {
            self.curser_row = self.curser_row.saturating_sub(size);
        } else {
            self.offset_row = self.offset_row.saturating_sub(size);
        }
        self.update_table_data();
    }

    fn move_selection_down(&mut self, size: usize) {
        if self.rows.is_empty() {
            return;
        }
        if self.curser_row + self.offset_row < self.rows.len() - 1 {
            if self.curser_row < self.uilayout.table_height.saturating_sub(1) {
                self.curser_row = std::cmp::min(
                    self.curser_row + size,
                    self.rows.len() - self.offset_row - 1,
                );
            } else {
                self.offset_row = std::cmp::min(self.offset_row + size, self.rows.len() - 1);
                self.curser_row = std::cmp::min(
                    self.uilayout.table_height.saturating_sub(1),
                    self.rows.len() - self.offset_row - 1,
                );
            }
            self.update_table_data();
        }
    }

    fn move_selection_left(&mut self) {
        self.curser_column = self.curser_column.saturating_sub(1);
        self.update_table_data();
    }

    fn move_selection_right(&mut self) {
        if self.curser_column < self.fields.len() - 1 {
            self.curser_column += 1;
        }
        self.update_table_data();
    }

    fn move_selection_beginning(&mut self) {
        self.curser_row = 0;
        self.offset_row = 0;
        self.update_table_data();
    }

    fn move_selection_end(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        // table_height can be 0 on very small terminals
        let height = self.uilayout.table_height;
        if self.rows.len() <= height {
            self.offset_row = 0;
            self.curser_row = self.rows.len() - 1;
        } else {
            self.offset_row = self.rows.len() - height.max(1);
            self.curser_row = height.saturating_sub(1);
        }
        self.update_table_data();
    }

    /// The click transition: only `last_clicked` changes, the filter
    /// field stays whatever the picker says.
    fn click_curser_cell(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let field = self.fields[self.curser_column];
        self.selection = self.selection.with_clicked(field);
        self.status_message = format!("Selected a {} cell", field.name());
        self.update_table_data();
    }

    /// Map a terminal mouse click onto the control and table regions.
    fn click(&mut self, x: usize, y: usize) {
        if y < self.uilayout.controls_height {
            if x + self.uilayout.picker_width >= self.uilayout.width {
                self.cycle_filter_field(1);
            } else {
                self.enter_search();
            }
            return;
        }

        let table_top = self.uilayout.controls_height + TABLE_HEADER_HEIGHT;
        if y < table_top || y >= table_top + self.uilayout.table_height {
            return;
        }
        let row = y - table_top;
        if self.offset_row + row >= self.rows.len() {
            return;
        }

        let mut column = None;
        let mut xpos = 0;
        for (cidx, cview) in self.uidata.table.iter().enumerate() {
            if x < xpos + cview.width + COLUMN_SPACER {
                column = Some(cidx);
                break;
            }
            xpos += cview.width + COLUMN_SPACER;
        }
        let Some(column) = column else {
            return;
        };

        trace!("Click on cell {}:{}", self.offset_row + row, column);
        self.curser_row = row;
        self.curser_column = column;
        if self.modus == Modus::SEARCH {
            self.leave_search(false);
        }
        self.click_curser_cell();
    }

    fn cycle_filter_field(&mut self, step: i32) {
        let pos = self
            .fields
            .iter()
            .position(|&f| f == self.selection.filter_field)
            .unwrap_or(0);
        let len = self.fields.len() as i32;
        let next = (pos as i32 + step).rem_euclid(len) as usize;
        self.selection = self.selection.with_filter_field(self.fields[next]);
        self.apply_filter();
    }

    fn enter_search(&mut self) {
        trace!("Entering search mode ...");
        self.modus = Modus::SEARCH;
        self.input.clear();
        self.input.set(&self.search_term);
        self.last_input = self.input.get();
        self.update_table_data();
    }

    /// Live filtering: every keystroke updates the term and re-runs the
    /// filter, Enter keeps the term, Esc cancels and clears it.
    fn raw_input(&mut self, key: KeyEvent) {
        self.last_input = self.input.read(key);
        self.search_term = self.last_input.input.clone();
        if self.last_input.finished {
            self.leave_search(self.last_input.canceled);
        }
        self.apply_filter();
    }

    fn leave_search(&mut self, canceled: bool) {
        if canceled {
            self.search_term.clear();
        }
        self.modus = Modus::TABLE;
        self.input.clear();
        self.last_input = self.input.get();
    }

    fn clear_search(&mut self) {
        if !self.search_term.is_empty() {
            self.search_term.clear();
            self.input.clear();
            self.last_input = self.input.get();
            self.apply_filter();
        }
    }

    fn sort_curser_column(&mut self, ascending: bool) {
        let field = self.fields[self.curser_column];

        let mut indexed_rows: Vec<(usize, String)> = self
            .rows
            .iter()
            .map(|&ridx| (ridx, field.value_of(&self.records[ridx])))
            .collect();

        if field.is_numeric() {
            indexed_rows.sort_by(|(_, a), (_, b)| {
                let a_val: f64 = a.parse().unwrap_or(f64::NAN);
                let b_val: f64 = b.parse().unwrap_or(f64::NAN);
                let ord = a_val.partial_cmp(&b_val).unwrap_or(std::cmp::Ordering::Equal);
                if ascending { ord } else { ord.reverse() }
            });
        } else if ascending {
            indexed_rows.sort_by(|(_, a), (_, b)| a.cmp(b));
        } else {
            indexed_rows.sort_by(|(_, a), (_, b)| b.cmp(a));
        }

        self.rows = indexed_rows.into_iter().map(|(i, _)| i).collect();
        self.status_message = format!(
            "Sorted by {} {}",
            field.name(),
            if ascending { "ascending" } else { "descending" }
        );
        self.update_table_data();
    }

    fn copy_cell(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let field = self.fields[self.curser_column];
        let record = &self.records[self.rows[self.offset_row + self.curser_row]];
        // The masking rule applies to copies as well
        let cell = render_cell(field, record, &self.selection);
        self.copy_to_clipboard(cell, "cell");
    }

    fn copy_row(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let record = &self.records[self.rows[self.offset_row + self.curser_row]];
        let content: Vec<String> = self
            .fields
            .iter()
            .map(|&f| Self::wrap_cell_content(&render_cell(f, record, &self.selection)))
            .collect();
        self.copy_to_clipboard(content.join(","), "row");
    }

    fn wrap_cell_content(c: &str) -> String {
        let needs_escaping = c.contains('"');
        let needs_wrapping = c.chars().any(|c| c == ' ' || c == '\t' || c == ',');
        let mut out = String::from(c);

        if needs_escaping {
            out = out.replace("\"", "\"\"");
        }
        if needs_wrapping {
            out = format!("\"{out}\"");
        }
        out
    }

    fn copy_to_clipboard(&mut self, content: String, what: &str) {
        match self.clipboard.as_mut().map(|c| c.set_text(content)) {
            Some(Ok(_)) => self.status_message = format!("Copied {} to clipboard", what),
            Some(Err(e)) => {
                trace!("Error copying to clipboard: {:?}", e);
                self.status_message = "Clipboard error".to_string();
            }
            None => self.status_message = "No clipboard available".to_string(),
        }
        self.update_table_data();
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
        self.update_table_data();
    }

    fn close_popup(&mut self) {
        self.modus = self.previous_modus;
        self.previous_modus = Modus::POPUP;
        self.update_table_data();
    }

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            self.uilayout.width, width, self.uilayout.height, height
        );
        self.uilayout = UiLayout::from_values(width, height);
        self.clamp_curser();
        self.update_table_data();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};

    fn record(id: i64, first: &str, ip: &str, balance: f64) -> Record {
        Record {
            id,
            first_name: first.to_string(),
            last_name: format!("{}son", first),
            ip_address: ip.to_string(),
            balance,
        }
    }

    fn model() -> Model {
        let records = vec![
            record(1, "Ann", "10.0.0.1", 1234.5),
            record(2, "Bob", "10.0.0.2", -5.0),
            record(3, "Anna", "10.0.0.3", 97.2),
        ];
        Model::new("test", records, &RvConfig::default(), None, 80, 24).unwrap()
    }

    fn key(model: &mut Model, code: KeyCode) {
        model
            .update(Some(Message::RawKey(KeyEvent::new(
                code,
                KeyModifiers::NONE,
            ))))
            .unwrap();
    }

    fn first_names(uidata: &UiData) -> Vec<String> {
        uidata.table[1].data.clone()
    }

    #[test]
    fn starts_unfiltered_with_id_as_filter_field() {
        let m = model();
        let ui = m.get_uidata();
        assert_eq!(ui.nrows, 3);
        assert_eq!(ui.filter_field, "id");
        assert!(ui.match_found);
        assert_eq!(ui.table.len(), 5);
    }

    #[test]
    fn live_search_filters_on_each_keystroke() {
        let mut m = model();
        m.update(Some(Message::NextField)).unwrap(); // filter on first_name
        m.update(Some(Message::Search)).unwrap();

        key(&mut m, KeyCode::Char('a'));
        assert_eq!(m.get_uidata().nrows, 2);
        key(&mut m, KeyCode::Char('n'));
        assert_eq!(first_names(m.get_uidata()), vec!["Ann", "Anna"]);
        assert!(m.get_uidata().match_found);

        key(&mut m, KeyCode::Enter);
        assert!(!m.raw_keyevents());
        assert_eq!(m.get_uidata().nrows, 2);
    }

    #[test]
    fn no_match_clears_the_match_flag() {
        let mut m = model();
        m.update(Some(Message::NextField)).unwrap();
        m.update(Some(Message::Search)).unwrap();
        for c in "zzz".chars() {
            key(&mut m, KeyCode::Char(c));
        }
        let ui = m.get_uidata();
        assert_eq!(ui.nrows, 0);
        assert!(!ui.match_found);
    }

    #[test]
    fn escape_cancels_and_restores_the_full_view() {
        let mut m = model();
        m.update(Some(Message::NextField)).unwrap();
        m.update(Some(Message::Search)).unwrap();
        key(&mut m, KeyCode::Char('z'));
        assert_eq!(m.get_uidata().nrows, 0);
        key(&mut m, KeyCode::Esc);
        assert_eq!(m.get_uidata().nrows, 3);
        assert!(!m.raw_keyevents());
    }

    #[test]
    fn ip_column_is_masked_until_clicked() {
        let mut m = model();
        let ip_col = 3;
        assert_eq!(m.get_uidata().table[ip_col].data, vec!["", "", ""]);

        // Move the curser onto the ip column and select the cell
        for _ in 0..ip_col {
            m.update(Some(Message::MoveRight)).unwrap();
        }
        m.update(Some(Message::SelectCell)).unwrap();
        assert_eq!(
            m.get_uidata().table[ip_col].data,
            vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]
        );

        // Changing the filter field afterwards does not re-mask
        m.update(Some(Message::NextField)).unwrap();
        assert_eq!(
            m.get_uidata().table[ip_col].data,
            vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]
        );

        // A click in another column does
        m.update(Some(Message::MoveLeft)).unwrap();
        m.update(Some(Message::SelectCell)).unwrap();
        assert_eq!(m.get_uidata().table[ip_col].data, vec!["", "", ""]);
    }

    #[test]
    fn filtering_on_ip_does_not_unmask_it() {
        let mut m = model();
        for _ in 0..3 {
            m.update(Some(Message::NextField)).unwrap();
        }
        let ui = m.get_uidata();
        assert_eq!(ui.filter_field, "ip_address");
        assert_eq!(ui.table[3].data, vec!["", "", ""]);
    }

    #[test]
    fn balance_column_renders_as_currency() {
        let m = model();
        assert_eq!(
            m.get_uidata().table[4].data,
            vec!["$1,234.50", "-$5.00", "$97.20"]
        );
    }

    #[test]
    fn picker_cycles_through_the_field_catalog() {
        let mut m = model();
        m.update(Some(Message::NextField)).unwrap();
        assert_eq!(m.get_uidata().filter_field, "first_name");
        assert_eq!(m.get_uidata().select_color, Color::Blue);
        m.update(Some(Message::PrevField)).unwrap();
        assert_eq!(m.get_uidata().filter_field, "id");
        m.update(Some(Message::PrevField)).unwrap();
        assert_eq!(m.get_uidata().filter_field, "balance");
        assert_eq!(m.get_uidata().select_color, Color::LightGreen);
    }

    #[test]
    fn sort_descending_by_balance() {
        let mut m = model();
        for _ in 0..4 {
            m.update(Some(Message::MoveRight)).unwrap();
        }
        m.update(Some(Message::SortDescending)).unwrap();
        assert_eq!(first_names(m.get_uidata()), vec!["Ann", "Anna", "Bob"]);
        m.update(Some(Message::SortAscending)).unwrap();
        assert_eq!(first_names(m.get_uidata()), vec!["Bob", "Anna", "Ann"]);
    }

    #[test]
    fn mouse_click_selects_the_cell_under_it() {
        let mut m = model();
        // Table data starts below controls and header. Column 0 ("id")
        // is 2 wide plus a spacer, so x=4 lands in first_name.
        let y = (CONTROLS_HEIGHT + TABLE_HEADER_HEIGHT + 1) as u16;
        m.update(Some(Message::Click(4, y))).unwrap();
        let ui = m.get_uidata();
        assert_eq!(ui.selected_column, 1);
        assert_eq!(ui.abs_selected_row, 1);
        assert_eq!(ui.filter_field, "id"); // clicks never touch the filter field
    }

    #[test]
    fn click_on_the_picker_cycles_the_field() {
        let mut m = model();
        m.update(Some(Message::Click(79, 1))).unwrap();
        assert_eq!(m.get_uidata().filter_field, "first_name");
    }

    #[test]
    fn click_on_the_search_box_enters_search_mode() {
        let mut m = model();
        m.update(Some(Message::Click(2, 1))).unwrap();
        assert!(m.raw_keyevents());
        assert!(m.get_uidata().searching);
    }

    #[test]
    fn help_popup_opens_and_closes() {
        let mut m = model();
        m.update(Some(Message::Help)).unwrap();
        assert!(m.get_uidata().show_popup);
        m.update(Some(Message::Exit)).unwrap();
        assert!(!m.get_uidata().show_popup);
    }

    #[test]
    fn motion_on_a_tiny_terminal_does_not_underflow() {
        // Height 5 leaves no room for table rows at all
        let records = vec![
            record(1, "Ann", "10.0.0.1", 1234.5),
            record(2, "Bob", "10.0.0.2", -5.0),
            record(3, "Anna", "10.0.0.3", 97.2),
        ];
        let mut m = Model::new("test", records, &RvConfig::default(), None, 80, 5).unwrap();
        assert_eq!(m.get_uidata().layout.table_height, 0);

        m.update(Some(Message::MoveDown)).unwrap();
        assert_eq!(m.get_uidata().abs_selected_row, 1);
        m.update(Some(Message::MoveEnd)).unwrap();
        assert_eq!(m.get_uidata().abs_selected_row, 2);
        m.update(Some(Message::MoveUp)).unwrap();
        m.update(Some(Message::MoveBeginning)).unwrap();
        assert_eq!(m.get_uidata().abs_selected_row, 0);
    }

    #[test]
    fn resize_clamps_the_curser_into_the_window() {
        let mut m = model();
        m.update(Some(Message::MoveEnd)).unwrap();
        assert_eq!(m.get_uidata().abs_selected_row, 2);

        // Shrink the window below the curser row
        m.update(Some(Message::Resize(80, 6))).unwrap();
        let ui = m.get_uidata();
        assert_eq!(ui.layout.table_height, 1);
        assert_eq!(ui.selected_row, 0);
        assert_eq!(ui.abs_selected_row, 2);

        // And all the way down to a height without any table rows
        m.update(Some(Message::Resize(80, 5))).unwrap();
        m.update(Some(Message::MoveDown)).unwrap();
        m.update(Some(Message::MoveEnd)).unwrap();
        assert_eq!(m.get_uidata().abs_selected_row, 2);
    }

    #[test]
    fn quit_sets_the_status() {
        let mut m = model();
        m.update(Some(Message::Quit)).unwrap();
        assert_eq!(m.status, Status::QUITTING);
    }

    #[test]
    fn initial_field_must_come_from_the_catalog() {
        let records = vec![record(1, "Ann", "10.0.0.1", 0.0)];
        let m = Model::new(
            "test",
            records,
            &RvConfig::default(),
            Some(Field::Balance),
            80,
            24,
        )
        .unwrap();
        assert_eq!(m.get_uidata().filter_field, "balance");
    }
}
