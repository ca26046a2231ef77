//! Presenting frames in a terminal.
//!
//! Every terminal cell shows two vertically stacked pixels: the upper half block `▀` is printed
//! with the upper pixel as foreground and the lower pixel as background color. A display of
//! `w x h` pixels therefore covers `w` columns and `ceil(h / 2)` rows.
//!
//! [`HalfBlockPresenter`] remembers the cells it printed last and only rewrites cells that changed,
//! similar to a double buffered terminal renderer. [`TerminalHost`] ties a presenter to crossterm
//! input events.
//!
//! [`TerminalSession`] switches the terminal into the mode frames are presented in and restores it
//! afterwards, also when the program panics. [`FrameBuffered`] keeps a frame's escape sequences
//! together so the terminal never shows a half presented frame.

use crate::host::Host;
use crate::rendering::color::{Color, Rgb, Rgba};
use crate::rendering::drawable::Drawable;
use crate::rendering::image::RgbaBytes;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseEvent, MouseEventKind,
};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};
use std::io;
use std::io::{Stdout, Write};
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

const UPPER_HALF_BLOCK: char = '▀';

/// The colors of one terminal cell: (upper pixel, lower pixel).
type Cell = (Rgb, Rgb);

/// Writes frames to a terminal sink, two pixel rows per terminal row.
#[derive(Debug, Default)]
pub struct HalfBlockPresenter {
    columns: usize,
    rows: usize,
    /// The cells on screen, or empty if the screen content is unknown.
    prev_cells: Vec<Cell>,
}

impl HalfBlockPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets what is on screen, so the next frame is drawn in full.
    pub fn invalidate(&mut self) {
        self.prev_cells.clear();
    }

    /// Writes `frame` to `sink` and flushes it. Returns the number of cells written.
    ///
    /// Alpha is ignored. On odd heights, the lower half of the last row is black.
    pub fn present<W: Write, D: Drawable>(&mut self, sink: &mut W, frame: &D) -> io::Result<usize> {
        let columns = frame.width();
        let rows = frame.height().div_ceil(2);
        let full_redraw =
            (columns, rows) != (self.columns, self.rows) || self.prev_cells.len() != columns * rows;
        if full_redraw {
            queue!(sink, terminal::Clear(terminal::ClearType::All))?;
            self.columns = columns;
            self.rows = rows;
            self.prev_cells = vec![Cell::default(); columns * rows];
        }

        let black = Rgb::convert(Rgba::BLACK);
        let mut cursor_pos = None;
        let mut last_colors = None;
        let mut written = 0;
        for row in 0..rows {
            for column in 0..columns {
                let upper = Rgb::convert(frame.get(column, 2 * row));
                let lower = if 2 * row + 1 < frame.height() {
                    Rgb::convert(frame.get(column, 2 * row + 1))
                } else {
                    black
                };
                let cell = (upper, lower);
                let idx = row * columns + column;
                if !full_redraw && self.prev_cells[idx] == cell {
                    continue;
                }
                self.prev_cells[idx] = cell;

                if cursor_pos != Some((column, row)) {
                    queue!(sink, cursor::MoveTo(column as u16, row as u16))?;
                }
                if last_colors != Some(cell) {
                    queue!(
                        sink,
                        style::SetColors(style::Colors::new(upper.into(), lower.into()))
                    )?;
                    last_colors = Some(cell);
                }
                queue!(sink, style::Print(UPPER_HALF_BLOCK))?;
                cursor_pos = Some((column + 1, row));
                written += 1;
            }
        }

        sink.flush()?;
        Ok(written)
    }
}

/// Forwards crossterm events from a background thread. Stops the thread when dropped.
pub struct EventReader {
    receiver: Receiver<Event>,
    stop_signal: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl EventReader {
    pub fn spawn() -> Self {
        let (event_writer, receiver) = std::sync::mpsc::channel();
        let (stop_signal, stop_receiver) = std::sync::mpsc::channel::<()>();

        let handle = std::thread::spawn(move || {
            loop {
                match crossterm::event::poll(Duration::from_millis(10)) {
                    Ok(true) => match crossterm::event::read() {
                        Ok(event) => {
                            if event_writer.send(event).is_err() {
                                break;
                            }
                        }
                        Err(err) => log::warn!("failed to read terminal event: {err}"),
                    },
                    Ok(false) => {}
                    Err(err) => {
                        log::warn!("stopped polling terminal events: {err}");
                        break;
                    }
                }
                if stop_receiver.try_recv().is_ok() {
                    break;
                }
            }
        });

        Self {
            receiver,
            stop_signal,
            handle: Some(handle),
        }
    }

    /// The next pending event, if any.
    pub fn try_recv(&self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        // the thread may already have exited on its own
        let _ = self.stop_signal.send(());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("terminal event reader panicked");
            }
        }
    }
}

/// A [`Host`] that presents frames in the terminal and takes input from crossterm events.
///
/// The available display size is the terminal's column count by twice its row count. Pressing
/// `q`, `Esc` or `Ctrl-C` asks the frame loop to quit.
pub struct TerminalHost<W: Write> {
    sink: W,
    presenter: HalfBlockPresenter,
    columns: usize,
    rows: usize,
    mouse: (i64, i64),
    quit: bool,
    events: Option<EventReader>,
}

impl<W: Write> TerminalHost<W> {
    /// Creates a host for the current terminal, reading its events on a background thread.
    pub fn new(sink: W) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        let mut host = Self::headless(sink, columns as usize, rows as usize);
        host.events = Some(EventReader::spawn());
        Ok(host)
    }

    /// Creates a host without an event reader. Events can be fed with [`TerminalHost::handle_event`].
    pub fn headless(sink: W, columns: usize, rows: usize) -> Self {
        Self {
            sink,
            presenter: HalfBlockPresenter::new(),
            columns,
            rows,
            mouse: (0, 0),
            quit: false,
            events: None,
        }
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Applies a single terminal event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Resize(columns, rows) => {
                self.columns = columns as usize;
                self.rows = rows as usize;
            }
            Event::Mouse(MouseEvent {
                kind:
                    MouseEventKind::Moved
                    | MouseEventKind::Drag(_)
                    | MouseEventKind::Down(_)
                    | MouseEventKind::Up(_),
                column,
                row,
                ..
            }) => {
                self.mouse = (column as i64, row as i64 * 2);
            }
            Event::Key(KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                kind: KeyEventKind::Press,
                ..
            }) => self.quit = true,
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) if modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            _ => {}
        }
    }
}

impl<W: Write> Host for TerminalHost<W> {
    fn available_size(&mut self) -> (usize, usize) {
        (self.columns, self.rows * 2)
    }

    fn mouse_position(&mut self) -> (i64, i64) {
        self.mouse
    }

    fn set_display_size(&mut self, width: usize, height: usize) {
        log::debug!("presenting {width}x{height} pixels in the terminal");
        self.presenter.invalidate();
    }

    fn present(&mut self, width: usize, height: usize, rgba: &[u8]) -> io::Result<()> {
        let frame = RgbaBytes::new(width, height, rgba);
        self.presenter.present(&mut self.sink, &frame)?;
        Ok(())
    }

    fn poll_events(&mut self) {
        let Some(events) = &self.events else {
            return;
        };
        let pending: Vec<Event> = std::iter::from_fn(|| events.try_recv()).collect();
        for event in pending {
            self.handle_event(event);
        }
    }

    fn should_quit(&mut self) -> bool {
        self.quit
    }
}

/// Set while a [`TerminalSession`] owns the terminal.
static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);
static RESTORE_ON_PANIC: Once = Once::new();

/// The terminal mode frames are presented in: alternate screen, raw mode, mouse capture and a
/// hidden cursor.
///
/// At most one session is active at a time. The terminal is restored by [`TerminalSession::end`],
/// when the session is dropped, or before the panic message is printed if the program panics
/// while the session is active.
///
/// If you are ever stuck in a broken terminal anyway, running `reset` usually fixes it.
#[derive(Debug)]
pub struct TerminalSession {
    _active: (),
}

impl TerminalSession {
    /// Enters the presentation mode.
    ///
    /// Fails with [`io::ErrorKind::AlreadyExists`] if another session is active.
    pub fn start() -> io::Result<Self> {
        if SESSION_ACTIVE.swap(true, Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "a terminal session is already active",
            ));
        }
        RESTORE_ON_PANIC.call_once(restore_on_panic);

        let mut stdout = io::stdout();
        let entered = execute!(stdout, EnterAlternateScreen)
            .and_then(|()| terminal::enable_raw_mode())
            .and_then(|()| execute!(stdout, EnableMouseCapture, cursor::Hide));
        if let Err(err) = entered {
            if let Err(restore_err) = restore_terminal() {
                log::warn!("failed to restore the terminal: {restore_err}");
            }
            return Err(err);
        }
        log::debug!("terminal session started");
        Ok(Self { _active: () })
    }

    /// Restores the terminal, reporting any error.
    pub fn end(self) -> io::Result<()> {
        restore_terminal()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = restore_terminal() {
            log::warn!("failed to restore the terminal: {err}");
        }
    }
}

/// Undoes [`TerminalSession::start`]. Does nothing if no session is active.
fn restore_terminal() -> io::Result<()> {
    if !SESSION_ACTIVE.swap(false, Ordering::SeqCst) {
        return Ok(());
    }
    let mut stdout = io::stdout();
    execute!(
        stdout,
        DisableMouseCapture,
        cursor::Show,
        style::ResetColor,
        terminal::Clear(ClearType::All)
    )?;
    terminal::disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;
    log::debug!("terminal session ended");
    Ok(())
}

/// Chains a panic hook that restores the terminal, so the panic message lands on the normal screen.
fn restore_on_panic() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Err(err) = restore_terminal() {
            eprintln!("failed to restore the terminal: {err}");
        }
        previous(info);
    }));
}

/// A writer that holds everything written to it until it is flushed, then passes it on in one
/// piece.
///
/// [`HalfBlockPresenter::present`] flushes once per frame, so wrapping the terminal in this
/// writer hands each frame to the terminal as a single write.
#[derive(Debug)]
pub struct FrameBuffered<W: Write> {
    inner: W,
    pending: Vec<u8>,
}

impl FrameBuffered<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> FrameBuffered<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pending: Vec::new(),
        }
    }

    /// Bytes written since the last flush.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> Write for FrameBuffered<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.write_all(&self.pending)?;
        self.pending.clear();
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::image::Image;
    use crossterm::event::{KeyEventState, MouseButton};

    fn half_blocks(sink: &[u8]) -> usize {
        String::from_utf8_lossy(sink).matches(UPPER_HALF_BLOCK).count()
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn first_frame_is_drawn_in_full() {
        let mut sink = Vec::<u8>::new();
        let mut presenter = HalfBlockPresenter::new();
        let frame = Image::new(4, 6, Rgba::RED);
        assert_eq!(presenter.present(&mut sink, &frame).unwrap(), 12);
        assert_eq!(half_blocks(&sink), 12);
    }

    #[test]
    fn only_changed_cells_are_rewritten() {
        let mut sink = Vec::<u8>::new();
        let mut presenter = HalfBlockPresenter::new();
        let mut frame = Image::new(4, 4, Rgba::RED);
        presenter.present(&mut sink, &frame).unwrap();

        sink.clear();
        assert_eq!(presenter.present(&mut sink, &frame).unwrap(), 0);
        assert_eq!(half_blocks(&sink), 0);

        // both pixels of a cell change together
        frame.set(1, 2, Rgba::GREEN);
        frame.set(1, 3, Rgba::GREEN);
        frame.set(3, 0, Rgba::GREEN);
        assert_eq!(presenter.present(&mut sink, &frame).unwrap(), 2);
        assert_eq!(half_blocks(&sink), 2);
    }

    #[test]
    fn size_changes_and_invalidation_redraw_everything() {
        let mut sink = Vec::<u8>::new();
        let mut presenter = HalfBlockPresenter::new();
        presenter.present(&mut sink, &Image::new(4, 4, Rgba::RED)).unwrap();
        assert_eq!(presenter.present(&mut sink, &Image::new(2, 4, Rgba::RED)).unwrap(), 4);
        presenter.invalidate();
        assert_eq!(presenter.present(&mut sink, &Image::new(2, 4, Rgba::RED)).unwrap(), 4);
    }

    #[test]
    fn odd_heights_pad_with_black() {
        let mut sink = Vec::<u8>::new();
        let mut presenter = HalfBlockPresenter::new();
        let frame = Image::new(3, 3, Rgba::BLACK);
        assert_eq!(presenter.present(&mut sink, &frame).unwrap(), 6);
        // an all black frame with a black padding row has a single color pair
        let black = Rgb::new(0, 0, 0);
        assert!(presenter.prev_cells.iter().all(|&cell| cell == (black, black)));
    }

    #[test]
    fn alpha_is_ignored() {
        let mut sink = Vec::<u8>::new();
        let mut presenter = HalfBlockPresenter::new();
        presenter.present(&mut sink, &Image::new(2, 2, Rgba::rgb(9, 9, 9))).unwrap();
        let translucent = Image::new(2, 2, Rgba::new(9, 9, 9, 3));
        assert_eq!(presenter.present(&mut sink, &translucent).unwrap(), 0);
    }

    #[test]
    fn host_reports_pixels_not_cells() {
        let mut host = TerminalHost::headless(Vec::<u8>::new(), 80, 24);
        assert_eq!(host.available_size(), (80, 48));
        host.handle_event(Event::Resize(100, 30));
        assert_eq!(host.available_size(), (100, 60));
    }

    #[test]
    fn mouse_maps_to_the_upper_pixel_of_a_cell() {
        let mut host = TerminalHost::headless(Vec::<u8>::new(), 80, 24);
        host.handle_event(mouse(MouseEventKind::Moved, 10, 5));
        assert_eq!(host.mouse_position(), (10, 10));
        host.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 3, 0));
        assert_eq!(host.mouse_position(), (3, 0));
        host.handle_event(mouse(MouseEventKind::ScrollUp, 40, 20));
        assert_eq!(host.mouse_position(), (3, 0));
    }

    #[test]
    fn quit_keys() {
        for event in [
            key(KeyCode::Char('q'), KeyModifiers::NONE),
            key(KeyCode::Esc, KeyModifiers::NONE),
            key(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut host = TerminalHost::headless(Vec::<u8>::new(), 10, 10);
            assert!(!host.should_quit());
            host.handle_event(event);
            assert!(host.should_quit());
        }

        let mut host = TerminalHost::headless(Vec::<u8>::new(), 10, 10);
        host.handle_event(key(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!host.should_quit());
    }

    #[test]
    fn frames_are_passed_on_whole() {
        let mut host = TerminalHost::headless(FrameBuffered::new(Vec::<u8>::new()), 3, 2);
        let frame = Image::new(3, 4, Rgba::BLUE);
        host.present(3, 4, frame.as_bytes()).unwrap();
        assert!(host.sink().pending().is_empty());
        assert_eq!(half_blocks(host.sink().get_ref()), 6);
    }

    #[test]
    fn buffered_writes_wait_for_a_flush() {
        let mut sink = FrameBuffered::new(Vec::<u8>::new());
        write!(sink, "half").unwrap();
        sink.write_all(b" a frame").unwrap();
        assert!(sink.get_ref().is_empty());
        assert_eq!(sink.pending(), b"half a frame");
        sink.flush().unwrap();
        assert_eq!(sink.get_ref().as_slice(), b"half a frame");
        assert!(sink.pending().is_empty());
    }

    #[test]
    fn restoring_without_a_session_is_a_no_op() {
        assert!(!SESSION_ACTIVE.load(Ordering::SeqCst));
        restore_terminal().unwrap();
    }

    #[test]
    fn present_writes_to_the_sink() {
        let mut host = TerminalHost::headless(Vec::<u8>::new(), 2, 1);
        let frame = Image::new(2, 2, Rgba::WHITE);
        host.present(2, 2, frame.as_bytes()).unwrap();
        assert_eq!(half_blocks(host.sink()), 2);
    }
}
