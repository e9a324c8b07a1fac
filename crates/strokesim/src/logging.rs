use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file name inside the data directory
pub const LOG_FILE_NAME: &str = "strokesim.log";

/// Maximum log file size before rotation (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Size to keep after rotation (1 MB of most recent logs)
const KEEP_SIZE: u64 = 1024 * 1024;

/// Rotate the log file once it exceeds `max_size`, keeping roughly the last
/// `keep_size` bytes starting at a line boundary.
fn rotate_log_if_needed(log_path: &Path, max_size: u64, keep_size: u64) -> io::Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let file_size = fs::metadata(log_path)?.len();
    if file_size <= max_size {
        return Ok(());
    }

    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::Start(file_size.saturating_sub(keep_size)))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    drop(file);

    // Skip to the first newline to avoid partial lines
    let skip = buffer
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |i| i + 1);

    let mut file = File::create(log_path)?;
    file.write_all(b"--- Log rotated (older entries removed) ---\n")?;
    file.write_all(&buffer[skip..])?;
    Ok(())
}

/// Hands out writers to one shared log file
#[derive(Clone)]
struct LogWriterFactory {
    file: Arc<Mutex<File>>,
}

struct LogWriter {
    file: Arc<Mutex<File>>,
}

impl LogWriter {
    fn lock(&self) -> io::Result<MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.flush()
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            file: Arc::clone(&self.file),
        }
    }
}

/// Initialize logging to `{data_dir}/strokesim.log`.
///
/// When the log exceeds 5MB, older entries are removed keeping only the last
/// 1MB. `RUST_LOG` overrides the default filter built from `level`.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<()> {
    fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join(LOG_FILE_NAME);

    if let Err(e) = rotate_log_if_needed(&log_path, MAX_LOG_SIZE, KEEP_SIZE) {
        eprintln!("Warning: Failed to rotate log file: {e}");
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let default_filter = format!("strokesim={level},strokesim_core=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(LogWriterFactory {
                    file: Arc::new(Mutex::new(file)),
                })
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    tracing::info!(log_path = %log_path.display(), "strokesim logging initialized");
    Ok(())
}
