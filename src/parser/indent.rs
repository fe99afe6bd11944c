//! Indentation transcoder
//!
//! `.msg` sources delimit blocks by indentation. The grammar is context-free,
//! so before lexing every change of indentation depth is rewritten into an
//! explicit `<INDENT>` / `<DEDENT>` marker line:
//!
//! ```text
//! struct Point            struct Point
//!     float32 x     →     <INDENT>
//!     float32 y           float32 x
//!                         float32 y
//!                         <DEDENT>
//! ```
//!
//! Every output line remembers which source line produced it (see
//! [`SourceMap`]), so diagnostics on the transcoded text can be reported in
//! original coordinates.

use crate::base::constants::DEFAULT_TAB_SIZE;
use crate::base::{LineCol, Position};

/// Marker opening a deeper indentation level.
pub const INDENT_MARKER: &str = "<INDENT>";
/// Marker closing one indentation level.
pub const DEDENT_MARKER: &str = "<DEDENT>";

const TRIPLE_QUOTE: &str = "\"\"\"";

/// Dedent to a width that matches no open indentation level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Line {line}: Inconsistent indentation level {width}")]
pub struct IndentationError {
    /// 1-based source line.
    pub line: u32,
    /// Indentation width (tabs expanded) that matched nothing on the stack.
    pub width: usize,
}

/// Where an output line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOrigin {
    /// 1-based source line.
    pub line: u32,
    /// Bytes of leading whitespace stripped from the source line.
    pub indent: u32,
}

/// Output line → source line mapping produced by the transcoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    origins: Vec<LineOrigin>,
}

impl SourceMap {
    fn push(&mut self, line: u32, indent: u32) {
        self.origins.push(LineOrigin { line, indent });
    }

    /// Origin of a 0-based output line.
    pub fn origin(&self, output_line: u32) -> Option<LineOrigin> {
        self.origins.get(output_line as usize).copied()
    }

    /// Map a 0-based position in the transcoded text to a 1-based source position.
    pub fn position(&self, at: LineCol) -> Position {
        match self.origin(at.line) {
            Some(origin) => Position::new(origin.line, origin.indent + at.col + 1),
            // Past the last line: the end of input.
            None => Position::line_only(self.origins.last().map_or(1, |o| o.line)),
        }
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

/// Transcoded text plus its source map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcoded {
    pub text: String,
    pub source_map: SourceMap,
}

impl Transcoded {
    /// Number of `<INDENT>` marker lines.
    pub fn indent_count(&self) -> usize {
        self.text.lines().filter(|l| *l == INDENT_MARKER).count()
    }

    /// Number of `<DEDENT>` marker lines.
    pub fn dedent_count(&self) -> usize {
        self.text.lines().filter(|l| *l == DEDENT_MARKER).count()
    }
}

/// Rewrites indentation-structured text into marker-delimited blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transcoder {
    tab_size: usize,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self {
            tab_size: DEFAULT_TAB_SIZE,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Verbatim {
    None,
    TripleQuoted,
    BlockComment,
}

impl Transcoder {
    pub fn new(tab_size: usize) -> Self {
        Self { tab_size }
    }

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    /// Width of the leading whitespace of `line`, tabs expanded.
    fn indent_width(&self, leading: &str) -> usize {
        leading
            .chars()
            .map(|c| if c == '\t' { self.tab_size } else { 1 })
            .sum()
    }

    /// Transcode `source`. Fails on the first dedent that matches no open level.
    pub fn transcode(&self, source: &str) -> Result<Transcoded, IndentationError> {
        let mut out = Output::default();
        let mut stack: Vec<usize> = vec![0];
        let mut verbatim = Verbatim::None;

        for (idx, raw) in source.split('\n').enumerate() {
            let line_no = idx as u32 + 1;

            match verbatim {
                Verbatim::TripleQuoted => {
                    out.emit(raw, line_no, 0);
                    if raw.matches(TRIPLE_QUOTE).count() % 2 == 1 {
                        verbatim = Verbatim::None;
                    }
                    continue;
                }
                Verbatim::BlockComment => {
                    out.emit(raw, line_no, 0);
                    if raw.contains("*/") {
                        verbatim = Verbatim::None;
                    }
                    continue;
                }
                Verbatim::None => {}
            }

            let stripped = raw.trim_start();
            if stripped.is_empty() {
                out.emit("", line_no, 0);
                continue;
            }

            if stripped.starts_with("//") {
                out.emit(raw, line_no, 0);
                continue;
            }
            if let Some(rest) = stripped.strip_prefix("/*") {
                out.emit(raw, line_no, 0);
                if !rest.contains("*/") {
                    verbatim = Verbatim::BlockComment;
                }
                continue;
            }

            if stripped.matches(TRIPLE_QUOTE).count() % 2 == 1 {
                verbatim = Verbatim::TripleQuoted;
            }

            let leading = &raw[..raw.len() - raw.trim_start().len()];
            let width = self.indent_width(leading);
            let current = stack.last().copied().unwrap_or(0);

            if width > current {
                stack.push(width);
                out.emit(INDENT_MARKER, line_no, 0);
            } else if width < current {
                while stack.last().is_some_and(|&top| top > width) {
                    stack.pop();
                    out.emit(DEDENT_MARKER, line_no, 0);
                }
                if stack.last() != Some(&width) {
                    return Err(IndentationError {
                        line: line_no,
                        width,
                    });
                }
            }
            out.emit(stripped, line_no, leading.len() as u32);
        }

        let last_line = out.map.origins.last().map_or(1, |o| o.line);
        while stack.len() > 1 {
            stack.pop();
            out.emit(DEDENT_MARKER, last_line, 0);
        }

        Ok(Transcoded {
            text: out.lines.join("\n"),
            source_map: out.map,
        })
    }
}

#[derive(Default)]
struct Output<'a> {
    lines: Vec<&'a str>,
    map: SourceMap,
}

impl<'a> Output<'a> {
    fn emit(&mut self, text: &'a str, line: u32, indent: u32) {
        self.lines.push(text);
        self.map.push(line, indent);
    }
}
