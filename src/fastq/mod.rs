use std::io::{self, Write, BufRead, BufReader};
use std::fs::File;
use flate2::write::GzEncoder;
use flate2::Compression;
use flate2::read::MultiGzDecoder;

use crate::error::ClipError;

/// A single read. `name` is stored without the leading `@`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub name: String,
    pub seq: String,
    pub qual: String,
}

impl FastqRecord {
    pub fn new(name: impl Into<String>, seq: impl Into<String>, qual: impl Into<String>) -> Self {
        Self { name: name.into(), seq: seq.into(), qual: qual.into() }
    }
}

pub struct Reader {
    reader: Box<dyn BufRead + Send>,
    line: u64,
}

impl Reader {
    /// Opens `path`, or stdin for `-`. Files ending in `.gz` are decompressed.
    pub fn new(path: &str) -> Result<Self, ClipError> {
        let reader: Box<dyn BufRead + Send> = if path == "-" || path == "/dev/stdin" {
            Box::new(BufReader::new(io::stdin()))
        } else {
            let f = File::open(path)?;
            if path.ends_with(".gz") {
                Box::new(BufReader::new(MultiGzDecoder::new(f)))
            } else {
                Box::new(BufReader::new(f))
            }
        };
        Ok(Self::from_reader(reader))
    }

    pub fn from_reader(reader: Box<dyn BufRead + Send>) -> Self {
        Self { reader, line: 0 }
    }

    fn read_line(&mut self, buf: &mut String) -> Result<usize, ClipError> {
        let n = match self.reader.read_line(buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(ClipError::Format {
                    line: self.line + 1,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        if n > 0 {
            self.line += 1;
        }
        if buf.ends_with('\n') { buf.pop(); }
        if buf.ends_with('\r') { buf.pop(); }
        Ok(n)
    }

    pub fn next_record(&mut self) -> Result<Option<FastqRecord>, ClipError> {
        let mut name = String::new();
        let mut seq = String::new();
        let mut plus = String::new();
        let mut qual = String::new();

        // skip blank lines between records
        loop {
            if self.read_line(&mut name)? == 0 { return Ok(None); }
            if !name.is_empty() { break; }
        }
        let header_line = self.line;
        let Some(stripped) = name.strip_prefix('@') else {
            return Err(ClipError::Format {
                line: header_line,
                reason: format!("expected header starting with '@', found {:?}", name),
            });
        };
        let name = stripped.to_string();

        if self.read_line(&mut seq)? == 0
            || self.read_line(&mut plus)? == 0
            || self.read_line(&mut qual)? == 0
        {
            return Err(ClipError::Format {
                line: header_line,
                reason: format!("truncated record {:?}", name),
            });
        }
        if !plus.starts_with('+') {
            return Err(ClipError::Format {
                line: self.line - 1,
                reason: format!("expected separator starting with '+', found {:?}", plus),
            });
        }

        Ok(Some(FastqRecord { name, seq, qual }))
    }
}

impl Iterator for Reader {
    type Item = Result<FastqRecord, ClipError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

enum Sink {
    Plain(io::BufWriter<File>),
    Gzip(io::BufWriter<GzEncoder<File>>),
    Stream(Box<dyn Write + Send>),
}

pub struct Writer {
    sink: Sink,
}

impl Writer {
    /// Creates `path`. Paths ending in `.gz` are gzip-compressed.
    pub fn new(path: &str, compression_level: u32) -> io::Result<Self> {
        let f = File::create(path)?;
        let sink = if path.ends_with(".gz") {
            Sink::Gzip(io::BufWriter::new(GzEncoder::new(f, Compression::new(compression_level))))
        } else {
            Sink::Plain(io::BufWriter::new(f))
        };
        Ok(Self { sink })
    }

    pub fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self { sink: Sink::Stream(writer) }
    }

    pub fn write_record(&mut self, rec: &FastqRecord) -> io::Result<()> {
        self.write_all(b"@")?;
        self.write_all(rec.name.as_bytes())?; self.write_all(b"\n")?;
        self.write_all(rec.seq.as_bytes())?;  self.write_all(b"\n")?;
        self.write_all(b"+\n")?;
        self.write_all(rec.qual.as_bytes())?; self.write_all(b"\n")?;
        Ok(())
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.write_all(line.as_bytes())?;
        self.write_all(b"\n")
    }

    /// Flushes everything and writes the gzip trailer. Dropping a writer without
    /// calling this loses any error raised while closing it.
    pub fn finish(self) -> io::Result<()> {
        match self.sink {
            Sink::Plain(w) => {
                let f = w.into_inner().map_err(|e| e.into_error())?;
                f.sync_data()
            }
            Sink::Gzip(w) => {
                let enc = w.into_inner().map_err(|e| e.into_error())?;
                let f = enc.finish()?;
                f.sync_data()
            }
            Sink::Stream(mut w) => w.flush(),
        }
    }
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::Plain(w) => w.write(buf),
            Sink::Gzip(w) => w.write(buf),
            Sink::Stream(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Plain(w) => w.flush(),
            Sink::Gzip(w) => w.flush(),
            Sink::Stream(w) => w.flush(),
        }
    }
}
