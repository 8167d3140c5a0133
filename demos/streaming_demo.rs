//! Streaming Demo: A producer thread streams tokens into the engine.
//!
//! The first connection drops partway through to show the reconnect path.
//! Space/p pauses, s stops, c clears, r restarts, q quits.
//!
//! Set `RUST_LOG=flywheel_stream=debug` to write engine logs to
//! `streaming_demo.log`.

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use flywheel_stream::error::RenderError;
use flywheel_stream::feed::{self, FeedSender};
use flywheel_stream::{
    ChunkInput, KeyBindings, Rect, Renderer, StreamConfig, StreamEngine, StreamState,
    TerminalPainter,
};
use std::cell::RefCell;
use std::io::{self, Stdout};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Sample text to stream (simulating a model response).
const SAMPLE_TEXT: &str = "The engine keeps an ordered display log and a bounded window of \
recent chunks. Every chunk updates throughput counters, and progress moves \
either from explicit progress chunks or, once a total is known, one step per \
visible chunk.\n\nPausing does not drop anything: chunks keep arriving and are \
counted, but they are painted only when the stream resumes, all at once and \
in order.\n\nWhen the transport fails the stream enters the error state and, \
with auto reconnect enabled, schedules a restart after the configured delay. \
The host drives that deadline by calling tick() from its frame loop; the \
engine itself never sleeps.\n";

const TOKEN_INTERVAL: Duration = Duration::from_millis(15);
const FRAME: Duration = Duration::from_millis(16);

/// Painter handle shared between the engine and the resize handler.
#[derive(Clone)]
struct SharedPainter(Rc<RefCell<TerminalPainter<Stdout>>>);

impl Renderer for SharedPainter {
    fn paint(&mut self, content: &str, state_label: &str) -> Result<(), RenderError> {
        self.0.borrow_mut().paint(content, state_label)
    }
}

fn init_logging() -> io::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let file = std::fs::File::create("streaming_demo.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Stream `SAMPLE_TEXT` on a background thread.
///
/// Stops early if `generation` moves on (the host restarted or cleared).
fn spawn_producer(tx: FeedSender, generation: Arc<AtomicU64>, drop_midway: bool) {
    let mine = generation.load(Ordering::SeqCst);
    let current = move || generation.load(Ordering::SeqCst) == mine;

    thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        if !current() || tx.connected().is_err() {
            return;
        }

        let tokens: Vec<&str> = SAMPLE_TEXT.split_inclusive(' ').collect();
        let total = tokens.len();
        for (i, token) in tokens.into_iter().enumerate() {
            if !current() {
                return;
            }
            if drop_midway && i == total / 3 {
                let _ = tx.fail("simulated connection drop");
                return;
            }
            if tx.send_split(token, 8).is_err() {
                return;
            }
            if i % 10 == 0 {
                let _ = tx.chunk(ChunkInput::progress(format!("{}/{total}", i + 1)));
            }
            thread::sleep(TOKEN_INTERVAL);
        }
        let _ = tx.chunk(ChunkInput::progress(format!("{total}/{total}")));
        let _ = tx.finish();
    });
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let config = StreamConfig::default().with_retries(3, Duration::from_millis(750));
    let (width, height) = terminal::size()?;
    let painter = SharedPainter(Rc::new(RefCell::new(TerminalPainter::new(
        io::stdout(),
        Rect::from_size(width, height),
    ))));

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = run(config, painter);

    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(config: StreamConfig, painter: SharedPainter) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = StreamEngine::new(config, painter.clone())?;
    let bindings = KeyBindings::default();
    let (tx, mut rx) = feed::channel();
    let generation = Arc::new(AtomicU64::new(0));
    let mut first_attempt = true;
    let mut last_state = StreamState::Idle;

    engine.start();

    loop {
        // Every fresh attempt gets a new producer.
        if engine.state() == StreamState::Connecting && last_state != StreamState::Connecting {
            generation.fetch_add(1, Ordering::SeqCst);
            spawn_producer(tx.clone(), Arc::clone(&generation), first_attempt);
            first_attempt = false;
        }
        last_state = engine.state();

        if event::poll(FRAME)? {
            let event = event::read()?;
            match &event {
                Event::Key(key) if key.code == KeyCode::Char('q') => break,
                Event::Resize(w, h) => {
                    painter.0.borrow_mut().set_bounds(Rect::from_size(*w, *h));
                    engine.refresh();
                }
                _ => {}
            }
            if let Some(command) = bindings.command_for(&event) {
                engine.apply(command);
                if !engine.is_active() {
                    generation.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        rx.pump(&mut engine);
        engine.tick();
        if engine.state() == StreamState::Streaming {
            engine.refresh();
        }
    }

    Ok(())
}
