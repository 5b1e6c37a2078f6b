use fltk::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use editor_state::command::Command;

// ==========================================
// UTILS
// ==========================================
#[inline(always)]
fn as_i32(val: usize) -> i32 {
    i32::try_from(val).unwrap_or(i32::MAX)
}

/// FLTK key code for F3 (`FL_F + 3`).
const KEY_F3: i32 = 0xffc0;

const MENU_H: i32 = 25;
const TOOLBAR_H: i32 = 30;
const STATUS_H: i32 = 24;

// ==========================================
// 1. STATE
// ==========================================
struct Shell {
    doc: editor_state::document::Document,
    text_buf: fltk::text::TextBuffer,
    style_buf: fltk::text::TextBuffer,
    display: fltk::text::TextDisplay,
    status: fltk::frame::Frame,
    /// Bumped on every transient message so stale reset timers do nothing.
    status_generation: u64,
    status_reset_secs: f64,
}

impl Shell {
    fn execute(
        &mut self,
        command: Command,
    ) -> editor_state::errors::DocumentResult<Option<editor_state::command::Notice>> {
        let result = self.doc.execute(command);
        // Even a failed command may have changed the text (e.g. an open that
        // found an unreadable file), so always repaint.
        self.render();
        result
    }

    fn render(&mut self) {
        self.text_buf.set_text(self.doc.text());
        Painter::paint(self);
        self.set_status(None);
    }

    fn set_status(&mut self, message: Option<&str>) {
        let label = match self.doc.status_line(message) {
            Ok(status) => status.to_string(),
            Err(err) => {
                log::error!("status line unavailable: {err}");
                format!("File: {}", self.doc.path().display())
            }
        };

        // '@' introduces a symbol in FLTK labels.
        self.status.set_label(&label.replace('@', "@@"));
        self.status.redraw();
    }
}

// ==========================================
// 2. MAIN COMPONENT API
// ==========================================
pub struct MainWindow {
    pub window: fltk::window::Window,
    state: Rc<RefCell<Shell>>,
}

impl MainWindow {
    pub fn new(settings: &config::Settings, doc: editor_state::document::Document) -> Self {
        let (w, h) = settings.display.window_size();

        let mut window = fltk::window::Window::default()
            .with_size(w, h)
            .with_label("Linepad");
        window.set_xclass("linepad");

        let mut menu = fltk::menu::MenuBar::default().with_size(w, MENU_H);
        let buttons = Toolbar::build(0, MENU_H, w);

        let text_buf = fltk::text::TextBuffer::default();
        let style_buf = fltk::text::TextBuffer::default();
        let mut display = fltk::text::TextDisplay::default()
            .with_pos(0, MENU_H + TOOLBAR_H)
            .with_size(w, h - MENU_H - TOOLBAR_H - STATUS_H);

        display.set_buffer(text_buf.clone());
        display.set_text_font(fltk::enums::Font::Courier);
        display.set_text_size(settings.display.font_size);
        display.set_highlight_data(style_buf.clone(), Painter::style_table(settings));
        if settings.display.wrap_lines {
            display.wrap_mode(fltk::text::WrapMode::AtBounds, 0);
        }

        let mut status = fltk::frame::Frame::default()
            .with_pos(0, h - STATUS_H)
            .with_size(w, STATUS_H);
        status.set_align(fltk::enums::Align::Left | fltk::enums::Align::Inside);
        status.set_frame(fltk::enums::FrameType::FlatBox);

        window.resizable(&display);
        window.end();

        let state = Rc::new(RefCell::new(Shell {
            doc,
            text_buf,
            style_buf,
            display: display.clone(),
            status,
            status_generation: 0,
            status_reset_secs: settings.status.reset_after().as_secs_f64(),
        }));

        Controller::wire_menu(&mut menu, &state);
        Controller::wire_toolbar(buttons, &state);
        Controller::wire_display(&mut display, &state);

        state.borrow_mut().render();

        Self { window, state }
    }

    pub fn show(&mut self) {
        self.window.show();
        self.state.borrow_mut().render();
    }
}

// ==========================================
// 3. TOOLBAR LAYOUT
// ==========================================
struct Toolbar;

impl Toolbar {
    const BUTTON_W: i32 = 80;
    const GAP: i32 = 12;

    /// Lays out the toolbar buttons left to right, with a gap between groups.
    fn build(x: i32, y: i32, w: i32) -> Vec<(Action, fltk::button::Button)> {
        let groups: [&[Action]; 4] = [
            &[Action::Open],
            &[Action::Add, Action::Edit, Action::Delete],
            &[Action::Search, Action::Previous, Action::Next],
            &[Action::Refresh],
        ];

        let mut bar = fltk::frame::Frame::default().with_pos(x, y).with_size(w, TOOLBAR_H);
        bar.set_frame(fltk::enums::FrameType::FlatBox);

        let mut buttons = Vec::new();
        let mut cursor_x = x + 4;

        for group in groups {
            for &action in group {
                let button = fltk::button::Button::default()
                    .with_pos(cursor_x, y + 3)
                    .with_size(Self::BUTTON_W, TOOLBAR_H - 6)
                    .with_label(action.label());
                buttons.push((action, button));
                cursor_x += Self::BUTTON_W + 2;
            }
            cursor_x += Self::GAP;
        }

        buttons
    }
}

// ==========================================
// 4. PAINTER (match highlighting)
// ==========================================
struct Painter;

impl Painter {
    const PLAIN: u8 = b'A';
    const MATCH: u8 = b'B';
    const CURRENT: u8 = b'C';

    fn style_table(settings: &config::Settings) -> Vec<fltk::text::StyleTableEntry> {
        let size = settings.display.font_size;

        vec![
            fltk::text::StyleTableEntry {
                color: fltk::enums::Color::Foreground,
                font: fltk::enums::Font::Courier,
                size,
            },
            fltk::text::StyleTableEntry {
                color: fltk::enums::Color::from_rgb(200, 120, 0),
                font: fltk::enums::Font::CourierBold,
                size,
            },
            fltk::text::StyleTableEntry {
                color: fltk::enums::Color::from_rgb(200, 0, 0),
                font: fltk::enums::Font::CourierBold,
                size,
            },
        ]
    }

    /// Styles every match, selects the current one and scrolls it into view.
    fn paint(shell: &mut Shell) {
        let text = shell.doc.text();
        let session = shell.doc.search_session();
        let mut styles = vec![Self::PLAIN; text.len()];

        for range in editor_core::search::byte_ranges(text, session.matches()) {
            styles[range].fill(Self::MATCH);
        }

        match session.current_span().and_then(|span| span.byte_range(text)) {
            Some(range) => {
                styles[range.clone()].fill(Self::CURRENT);
                shell
                    .text_buf
                    .select(as_i32(range.start), as_i32(range.end));
                shell.display.set_insert_position(as_i32(range.end));
                shell.display.show_insert_position();
            }
            None => shell.text_buf.unselect(),
        }

        shell.style_buf.set_text(&String::from_utf8_lossy(&styles));
        shell.display.redraw();
    }
}

// ==========================================
// 5. CONTROLLER (actions & dialogs)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Open,
    Add,
    Edit,
    Delete,
    Search,
    Previous,
    Next,
    Refresh,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Open => "Open",
            Action::Add => "Add",
            Action::Edit => "Edit",
            Action::Delete => "Delete",
            Action::Search => "Search",
            Action::Previous => "Previous",
            Action::Next => "Next",
            Action::Refresh => "Refresh",
        }
    }
}

struct Controller;

impl Controller {
    fn wire_menu(menu: &mut fltk::menu::MenuBar, state: &Rc<RefCell<Shell>>) {
        use fltk::enums::{Key, Shortcut};

        let f3 = Key::from_i32(KEY_F3);
        let entries = [
            ("File/Open...", Shortcut::Ctrl | 'o', Action::Open),
            ("Edit/Add Line...", Shortcut::None, Action::Add),
            ("Edit/Edit Line...", Shortcut::None, Action::Edit),
            ("Edit/Delete Line...", Shortcut::None, Action::Delete),
            ("Search/Find...", Shortcut::Ctrl | 'f', Action::Search),
            ("Search/Next Match", Shortcut::None | f3, Action::Next),
            ("Search/Previous Match", Shortcut::Shift | f3, Action::Previous),
            ("View/Refresh", Shortcut::Ctrl | 'r', Action::Refresh),
        ];

        for (path, shortcut, action) in entries {
            let state = state.clone();
            menu.add(path, shortcut, fltk::menu::MenuFlag::Normal, move |_| {
                Self::dispatch(&state, action);
            });
        }
    }

    fn wire_toolbar(buttons: Vec<(Action, fltk::button::Button)>, state: &Rc<RefCell<Shell>>) {
        for (action, mut button) in buttons {
            let state = state.clone();
            button.set_callback(move |_| Self::dispatch(&state, action));
        }
    }

    /// Double-clicking a line opens the edit dialog for it.
    fn wire_display(display: &mut fltk::text::TextDisplay, state: &Rc<RefCell<Shell>>) {
        let state = state.clone();

        display.handle(move |d, ev| {
            if ev == fltk::enums::Event::Released && fltk::app::event_clicks() {
                let offset = usize::try_from(d.insert_position()).unwrap_or(0);
                let clicked = {
                    let shell = state.borrow();
                    shell.doc.line_number_at(offset).and_then(|line| {
                        shell
                            .doc
                            .display_line(line)
                            .map(|text| (line, text.to_owned()))
                    })
                };

                if let Some((line, current)) = clicked {
                    Self::prompt_edit(&state, line, &current);
                }
            }
            false
        });
    }

    fn dispatch(state: &Rc<RefCell<Shell>>, action: Action) {
        match action {
            Action::Open => {
                if let Some(path) =
                    fltk::dialog::file_chooser("Open text file", "*", ".", false)
                {
                    Self::run(state, Command::Open(path.into()));
                }
            }
            Action::Add => {
                if let Some(text) = fltk::dialog::input_default("Enter text to add:", "") {
                    Self::run(state, Command::Add(text));
                }
            }
            Action::Edit => {
                if let Some(input) = fltk::dialog::input_default("Enter line number to edit:", "")
                {
                    Self::edit_line(state, &input);
                }
            }
            Action::Delete => {
                if let Some(input) =
                    fltk::dialog::input_default("Enter line number to delete:", "")
                {
                    Self::delete_line(state, &input);
                }
            }
            Action::Search => {
                if let Some(keyword) = fltk::dialog::input_default("Enter text to search:", "") {
                    Self::run(state, Command::Search(keyword));
                }
            }
            Action::Previous => Self::run(state, Command::Previous),
            Action::Next => Self::run(state, Command::Next),
            Action::Refresh => Self::run(state, Command::Refresh),
        }
    }

    fn edit_line(state: &Rc<RefCell<Shell>>, input: &str) {
        // No borrow may be held while a dialog runs its nested event loop.
        let resolved = state.borrow().doc.resolve_line(input);

        match resolved {
            Ok((line, current)) => Self::prompt_edit(state, line, &current),
            Err(err) => Self::report(&err),
        }
    }

    fn prompt_edit(
        state: &Rc<RefCell<Shell>>,
        line: editor_state::command::LineNumber,
        current: &str,
    ) {
        if let Some(text) = fltk::dialog::input_default(&format!("Edit line {line}:"), current) {
            Self::run(state, Command::Edit { line, text });
        }
    }

    fn delete_line(state: &Rc<RefCell<Shell>>, input: &str) {
        let resolved = state.borrow().doc.resolve_line(input);

        match resolved {
            Ok((line, current)) => {
                let prompt = format!("Delete line {line}?\n{current}");
                if fltk::dialog::choice2_default(&prompt, "No", "Yes", "") == Some(1) {
                    Self::run(state, Command::Delete { line });
                }
            }
            Err(err) => Self::report(&err),
        }
    }

    fn run(state: &Rc<RefCell<Shell>>, command: Command) {
        let result = state.borrow_mut().execute(command);

        match result {
            Ok(Some(notice)) if notice.is_popup() => {
                fltk::dialog::message_default(&notice.to_string());
            }
            Ok(Some(notice)) => Self::flash_status(state, &notice.to_string()),
            Ok(None) => {}
            Err(err) => Self::report(&err),
        }
    }

    fn report(err: &editor_state::errors::DocumentError) {
        log::warn!("command failed: {err}");
        fltk::dialog::message_default(&err.user_message());
    }

    /// Shows `message` in the status bar until the reset delay elapses or a
    /// newer message replaces it.
    fn flash_status(state: &Rc<RefCell<Shell>>, message: &str) {
        let (generation, delay) = {
            let mut shell = state.borrow_mut();
            shell.status_generation += 1;
            shell.set_status(Some(message));
            (shell.status_generation, shell.status_reset_secs)
        };

        let state = state.clone();
        fltk::app::add_timeout3(delay, move |_| {
            // A dialog may hold the state when the timer fires; the next
            // message will reset the status anyway.
            if let Ok(mut shell) = state.try_borrow_mut() {
                if shell.status_generation == generation {
                    shell.set_status(None);
                }
            }
        });
    }
}
