//! Test utilities.
//!
//! - Tracing-based logging initialization
//! - Phase/completion macros for readable test output
//! - A controllable [`MockProducer`]

use crate::producer::{Producer, StreamPriority, StreamProducer, DEFAULT_WEIGHT, ROOT_STREAM_ID};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use tracing_subscriber::fmt::format::FmtSpan;

static INIT_LOGGING: Once = Once::new();
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Initialize test logging with trace-level output.
///
/// Safe to call multiple times; only initializes once.
pub fn init_test_logging() {
    init_test_logging_with_level(tracing::Level::TRACE);
}

/// Initialize test logging with a custom level. The first call wins.
pub fn init_test_logging_with_level(level: tracing::Level) {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_test_writer()
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(false)
            .try_init();
    });
}

/// Acquire the global environment lock for tests that mutate env vars.
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Log a test phase transition with a visual separator.
#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        tracing::info!(phase = %$name, "========================================");
        tracing::info!(phase = %$name, "TEST PHASE: {}", $name);
        tracing::info!(phase = %$name, "========================================");
    };
}

/// Log test completion with summary.
#[macro_export]
macro_rules! test_complete {
    ($name:expr) => {
        tracing::info!(test = %$name, "test completed successfully: {}", $name);
    };
    ($name:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::info!(
            test = %$name,
            $($key = %$value,)*
            "test completed successfully: {}",
            $name
        );
    };
}

/// Log before assertions for context.
#[macro_export]
macro_rules! assert_with_log {
    ($cond:expr, $msg:expr, $expected:expr, $actual:expr) => {
        tracing::debug!(
            expected = ?$expected,
            actual = ?$actual,
            "Asserting: {}",
            $msg
        );
        assert!($cond, "{}: expected {:?}, got {:?}", $msg, $expected, $actual);
    };
}

/// Producer whose readiness is flipped by the test and whose polls are counted.
#[derive(Debug)]
pub struct MockProducer {
    id: u32,
    ready: AtomicBool,
    polls: AtomicUsize,
    stream: Option<StreamPriority>,
}

impl MockProducer {
    /// A producer that starts not ready.
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ready: AtomicBool::new(false),
            polls: AtomicUsize::new(0),
            stream: None,
        }
    }

    /// A producer that starts ready.
    #[must_use]
    pub fn new_ready(id: u32) -> Self {
        let producer = Self::new(id);
        producer.set_ready(true);
        producer
    }

    /// Attaches stream metadata.
    #[must_use]
    pub fn with_stream(mut self, stream_id: u32, weight: u16, depends_on: u32) -> Self {
        self.stream = Some(StreamPriority::new(stream_id, weight, depends_on));
        self
    }

    /// Test-assigned identifier.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Changes what `ready()` reports.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// How many times `ready()` was called.
    #[must_use]
    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

impl Producer for MockProducer {
    fn ready(&self) -> bool {
        self.polls.fetch_add(1, Ordering::SeqCst);
        self.ready.load(Ordering::SeqCst)
    }
}

impl StreamProducer for MockProducer {
    fn stream_id(&self) -> u32 {
        self.stream.map_or(self.id, |s| s.stream_id())
    }

    fn weight(&self) -> u16 {
        self.stream.map_or(DEFAULT_WEIGHT, |s| s.weight())
    }

    fn depends_on(&self) -> u32 {
        self.stream.map_or(ROOT_STREAM_ID, |s| s.depends_on())
    }
}
