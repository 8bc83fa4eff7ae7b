use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Stdout;
use std::io::Write;
use std::path::Path;

/// Where the rendered document goes.
pub enum OutputSink {
    File(BufWriter<File>),
    Stdout(BufWriter<Stdout>),
}

impl OutputSink {
    /// `None` and `-` both mean standard output.
    pub fn create(path: Option<&Path>) -> io::Result<Self> {
        match path {
            Some(path) if !is_stdout(path) => Ok(Self::File(BufWriter::new(File::create(path)?))),
            _ => Ok(Self::Stdout(BufWriter::new(io::stdout()))),
        }
    }

    pub fn is_stdout(&self) -> bool {
        matches!(self, Self::Stdout(_))
    }
}

pub fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::File(w) => w.write(buf),
            Self::Stdout(w) => w.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Self::File(w) => w.write_all(buf),
            Self::Stdout(w) => w.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::File(w) => w.flush(),
            Self::Stdout(w) => w.flush(),
        }
    }
}
