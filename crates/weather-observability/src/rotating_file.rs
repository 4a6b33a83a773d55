//! A byte-size rotating file writer, since `tracing-appender`'s built-in
//! rolling appender only rotates on a time boundary and the logging
//! façade this mirrors rotates on size (5 MiB × 5 generations).

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;

struct State {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    max_generations: usize,
}

/// Rotating file sink: writes to `path`, and once it exceeds `max_bytes`
/// shifts `path.1..path.{max_generations-1}` up by one generation and
/// starts a fresh `path`, dropping anything past `max_generations`.
pub struct SizeRotatingWriter {
    state: Mutex<State>,
}

impl SizeRotatingWriter {
    pub fn new(path: impl AsRef<Path>, max_bytes: u64, max_generations: usize) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self { state: Mutex::new(State { path, file, written, max_bytes, max_generations }) })
    }

    fn rotate(state: &mut State) -> io::Result<()> {
        for generation in (1..state.max_generations).rev() {
            let src = generation_path(&state.path, generation);
            let dst = generation_path(&state.path, generation + 1);
            if src.exists() {
                let _ = fs::rename(&src, &dst);
            }
        }
        if state.path.exists() {
            fs::rename(&state.path, generation_path(&state.path, 1))?;
        }
        state.file = OpenOptions::new().create(true).append(true).truncate(false).open(&state.path)?;
        state.written = 0;
        Ok(())
    }
}

fn generation_path(base: &Path, generation: usize) -> PathBuf {
    let mut os = base.as_os_str().to_owned();
    os.push(format!(".{generation}"));
    PathBuf::from(os)
}

pub struct SizeRotatingWriterHandle<'a>(&'a SizeRotatingWriter);

impl Write for SizeRotatingWriterHandle<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.0.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.written >= state.max_bytes {
            SizeRotatingWriter::rotate(&mut state)?;
        }
        let n = state.file.write(buf)?;
        state.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.state.lock().unwrap_or_else(|e| e.into_inner()).file.flush()
    }
}

impl<'a> MakeWriter<'a> for SizeRotatingWriter {
    type Writer = SizeRotatingWriterHandle<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SizeRotatingWriterHandle(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn rotates_once_the_size_bound_is_crossed() {
        let dir = std::env::temp_dir().join(format!("weather-collector-log-test-{}", std::process::id()));
        let path = dir.join("collector.log");
        let writer = SizeRotatingWriter::new(&path, 8, 3).unwrap();
        {
            let mut handle = writer.make_writer();
            handle.write_all(b"12345678").unwrap();
            handle.write_all(b"more-bytes-after-rotation").unwrap();
        }
        assert!(generation_path(&path, 1).exists());
        assert!(path.exists());
        let _ = fs::remove_dir_all(&dir);
    }
}
