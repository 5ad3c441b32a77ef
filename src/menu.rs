//! Pre-play setup menu.
//!
//! Terminal menu for choosing map parameters or loading a saved map. Load
//! failures surface as an inline message and keep the menu alive so the
//! user can retry or pick another file.

use std::error::Error;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::generator::MapConfig;
use crate::storage;
use crate::worldmap::WorldMap;

/// Result of running the menu
pub enum MenuResult {
    /// Generate a fresh map with these settings
    Generate(MapConfig),
    /// A saved map was loaded
    Load(WorldMap),
    /// User quit
    Quit,
}

/// Currently selected field
#[derive(Clone, Copy, PartialEq, Eq)]
enum MenuField {
    Width,
    Height,
    Seed,
    Generate,
    Load,
    Quit,
}

impl MenuField {
    fn next(&self) -> MenuField {
        match self {
            MenuField::Width => MenuField::Height,
            MenuField::Height => MenuField::Seed,
            MenuField::Seed => MenuField::Generate,
            MenuField::Generate => MenuField::Load,
            MenuField::Load => MenuField::Quit,
            MenuField::Quit => MenuField::Width,
        }
    }

    fn prev(&self) -> MenuField {
        match self {
            MenuField::Width => MenuField::Quit,
            MenuField::Height => MenuField::Width,
            MenuField::Seed => MenuField::Height,
            MenuField::Generate => MenuField::Seed,
            MenuField::Load => MenuField::Generate,
            MenuField::Quit => MenuField::Load,
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, MenuField::Width | MenuField::Height | MenuField::Seed)
    }
}

/// Setup screen state
struct Menu {
    config: MapConfig,
    selected: MenuField,
    editing: bool,
    input_buffer: String,
}

impl Menu {
    fn new(config: MapConfig) -> Self {
        Self {
            config,
            selected: MenuField::Width,
            editing: false,
            input_buffer: String::new(),
        }
    }

    fn start_editing(&mut self) {
        if self.selected.is_numeric() {
            self.editing = true;
            self.input_buffer = match self.selected {
                MenuField::Width => self.config.width.to_string(),
                MenuField::Height => self.config.height.to_string(),
                MenuField::Seed => self.config.seed.map(|s| s.to_string()).unwrap_or_default(),
                _ => String::new(),
            };
        }
    }

    fn confirm_edit(&mut self) {
        if !self.editing {
            return;
        }

        match self.selected {
            MenuField::Width => {
                if let Ok(val) = self.input_buffer.parse::<usize>() {
                    self.config.width = val.clamp(64, 8192);
                }
            }
            MenuField::Height => {
                if let Ok(val) = self.input_buffer.parse::<usize>() {
                    self.config.height = val.clamp(32, 4096);
                }
            }
            MenuField::Seed => {
                if self.input_buffer.is_empty() {
                    self.config.seed = None;
                } else if let Ok(val) = self.input_buffer.parse::<u64>() {
                    self.config.seed = Some(val);
                }
            }
            _ => {}
        }

        self.editing = false;
        self.input_buffer.clear();
    }

    fn cancel_edit(&mut self) {
        self.editing = false;
        self.input_buffer.clear();
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        frame.render_widget(
            Block::default().style(Style::default().bg(Color::Black)),
            area,
        );

        let box_width: u16 = 52;
        let box_height: u16 = 13;
        let box_x = (area.width.saturating_sub(box_width)) / 2;
        let box_y = (area.height.saturating_sub(box_height)) / 2;
        let box_area = Rect::new(box_x, box_y, box_width, box_height);

        let block = Block::default()
            .title(" Realm Viewer - Setup ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(box_area);
        frame.render_widget(block, box_area);

        let mut y = inner.y + 1;
        self.render_field(frame, inner.x + 3, y, "Width:", self.config.width.to_string(), MenuField::Width);
        y += 1;
        self.render_field(frame, inner.x + 3, y, "Height:", self.config.height.to_string(), MenuField::Height);
        y += 1;
        self.render_field(
            frame,
            inner.x + 3,
            y,
            "Seed:",
            self.config.seed.map(|s| s.to_string()).unwrap_or_else(|| "random".to_string()),
            MenuField::Seed,
        );
        y += 3;

        self.render_buttons(frame, inner.x, y, inner.width);

        let help_y = box_area.y + box_height;
        if help_y < area.height {
            let help = if self.editing {
                "Type value, Enter: Confirm, Esc: Cancel"
            } else {
                "↑↓/jk: Navigate  Enter: Select  q: Quit"
            };
            let help_text = Paragraph::new(help)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(help_text, Rect::new(box_x, help_y, box_width, 1));
        }
    }

    fn render_field(&self, frame: &mut Frame, x: u16, y: u16, label: &str, value: String, field: MenuField) {
        let is_selected = self.selected == field;
        let is_editing = self.editing && is_selected;

        let label_style = if is_selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        frame.render_widget(
            Paragraph::new(format!("{:<12}", label)).style(label_style),
            Rect::new(x, y, 12, 1),
        );

        let display_value = if is_editing {
            format!("{}_", self.input_buffer)
        } else {
            value
        };

        let value_style = if is_selected {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        };
        frame.render_widget(
            Paragraph::new(format!(" {:<16}", display_value)).style(value_style),
            Rect::new(x + 12, y, 18, 1),
        );
    }

    fn render_buttons(&self, frame: &mut Frame, x: u16, y: u16, width: u16) {
        let buttons = [
            ("[ Generate ]", MenuField::Generate, Color::Green),
            ("[ Load ]", MenuField::Load, Color::Cyan),
            ("[ Quit ]", MenuField::Quit, Color::Red),
        ];
        let total_width: usize = buttons.iter().map(|(t, _, _)| t.len() + 4).sum::<usize>() - 4;
        let mut bx = x + (width.saturating_sub(total_width as u16)) / 2;

        for (text, field, color) in buttons {
            let style = if self.selected == field {
                Style::default().fg(Color::Black).bg(color)
            } else {
                Style::default().fg(color)
            };
            frame.render_widget(
                Paragraph::new(text).style(style),
                Rect::new(bx, y, text.len() as u16, 1),
            );
            bx += text.len() as u16 + 4;
        }
    }
}

/// Saved-map list screen state
struct MapList {
    entries: Vec<PathBuf>,
    selected: usize,
    message: Option<String>,
}

impl MapList {
    fn new(maps_dir: &Path) -> Self {
        let entries = storage::list_saved(maps_dir);
        let message = if entries.is_empty() {
            Some(format!("No saved maps in {}", maps_dir.display()))
        } else {
            None
        };
        Self {
            entries,
            selected: 0,
            message,
        }
    }

    fn move_selection(&mut self, delta: i32) {
        if self.entries.is_empty() {
            return;
        }
        let len = self.entries.len() as i32;
        self.selected = (self.selected as i32 + delta).rem_euclid(len) as usize;
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        frame.render_widget(
            Block::default().style(Style::default().bg(Color::Black)),
            area,
        );

        let box_width: u16 = 56;
        let list_height = (self.entries.len() as u16).clamp(1, 16);
        let box_height = list_height + 5;
        let box_x = (area.width.saturating_sub(box_width)) / 2;
        let box_y = (area.height.saturating_sub(box_height)) / 2;
        let box_area = Rect::new(box_x, box_y, box_width, box_height);

        let block = Block::default()
            .title(" Saved Maps ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(box_area);
        frame.render_widget(block, box_area);

        let mut y = inner.y + 1;
        for (i, path) in self.entries.iter().take(16).enumerate() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let style = if i == self.selected {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            frame.render_widget(
                Paragraph::new(format!(" {:<50}", name)).style(style),
                Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1),
            );
            y += 1;
        }

        if let Some(ref message) = self.message {
            let msg = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center);
            frame.render_widget(msg, Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1));
        }

        let help_y = box_area.y + box_height;
        if help_y < area.height {
            let help_text = Paragraph::new("↑↓: Select  Enter: Load  Esc: Back  q: Quit")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(help_text, Rect::new(box_x, help_y, box_width, 1));
        }
    }
}

enum Screen {
    Setup,
    LoadList(MapList),
}

/// Run the setup menu until the user generates, loads, or quits.
pub fn run_menu(initial: MapConfig, maps_dir: &Path) -> Result<MenuResult, Box<dyn Error>> {
    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut menu = Menu::new(initial);
    let mut screen = Screen::Setup;
    let result;

    'outer: loop {
        match screen {
            Screen::Setup => terminal.draw(|f| menu.render(f))?,
            Screen::LoadList(ref list) => terminal.draw(|f| list.render(f))?,
        };

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        let mut next_screen: Option<Screen> = None;
        match &mut screen {
            Screen::Setup => {
                if menu.editing {
                    match key.code {
                        KeyCode::Enter => menu.confirm_edit(),
                        KeyCode::Esc => menu.cancel_edit(),
                        KeyCode::Backspace => {
                            menu.input_buffer.pop();
                        }
                        KeyCode::Char(c) if c.is_ascii_digit() => {
                            menu.input_buffer.push(c);
                        }
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => {
                            result = MenuResult::Quit;
                            break 'outer;
                        }
                        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                            menu.selected = menu.selected.prev();
                        }
                        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                            menu.selected = menu.selected.next();
                        }
                        KeyCode::Enter => match menu.selected {
                            MenuField::Generate => {
                                result = MenuResult::Generate(menu.config.clone());
                                break 'outer;
                            }
                            MenuField::Load => {
                                next_screen = Some(Screen::LoadList(MapList::new(maps_dir)));
                            }
                            MenuField::Quit => {
                                result = MenuResult::Quit;
                                break 'outer;
                            }
                            _ => menu.start_editing(),
                        },
                        _ => {}
                    }
                }
            }

            Screen::LoadList(list) => match key.code {
                KeyCode::Char('q') => {
                    result = MenuResult::Quit;
                    break 'outer;
                }
                KeyCode::Esc => {
                    next_screen = Some(Screen::Setup);
                }
                KeyCode::Up | KeyCode::Char('k') => list.move_selection(-1),
                KeyCode::Down | KeyCode::Char('j') => list.move_selection(1),
                KeyCode::Enter => {
                    if let Some(path) = list.entries.get(list.selected).cloned() {
                        match storage::load_map(&path) {
                            Ok(map) => {
                                result = MenuResult::Load(map);
                                break 'outer;
                            }
                            Err(e) => {
                                // Retry-eligible: stay on the list.
                                list.message = Some(format!(
                                    "Could not load {}: {}",
                                    path.file_name()
                                        .map(|n| n.to_string_lossy().into_owned())
                                        .unwrap_or_default(),
                                    e
                                ));
                            }
                        }
                    }
                }
                _ => {}
            },
        }

        if let Some(next) = next_screen {
            screen = next;
        }
    }

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(result)
}
