use std::io::Error;

use ratatui::crossterm::event::KeyEvent;

#[derive(Debug)]
pub enum RvError {
    IoError(Error),
    JsonError(serde_json::Error),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
    UnknownField(String),
}

impl From<Error> for RvError {
    fn from(err: Error) -> Self {
        RvError::IoError(err)
    }
}

impl From<serde_json::Error> for RvError {
    fn from(err: serde_json::Error) -> Self {
        RvError::JsonError(err)
    }
}

#[derive(Debug, Clone)]
pub struct RvConfig {
    pub event_poll_time: u64,
    pub max_column_width: usize,
}

impl Default for RvConfig {
    fn default() -> Self {
        RvConfig {
            event_poll_time: 100,
            max_column_width: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    MoveBeginning,
    MoveEnd,
    SelectCell,
    Click(u16, u16),
    NextField,
    PrevField,
    Search,
    SortAscending,
    SortDescending,
    CopyCell,
    CopyRow,
    Help,
    Exit,
    Resize(usize, usize),
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
 rv - account roster viewer

 /          edit the search term (live filter, Enter commits, Esc clears)
 Tab/S-Tab  cycle the filter column
 arrows     move the cell curser (hjkl also work)
 g / G      jump to the first / last row
 Enter      select the cell under the curser (unmasks the ip column)
 mouse      click a cell to select it, or click the search box / picker
 s / S      sort by the curser column, ascending / descending
 y / Y      copy the curser cell / row to the clipboard
 ?          this help
 Esc        close popup / clear the search
 q          quit
";
