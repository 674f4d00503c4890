use crate::error::SyntaxError;
use crate::interpreter::RuntimeError;
use std::fmt;

/// A source span representing a range of bytes in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Byte offsets of every line start, for offset to line/column lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|(_, ch)| *ch == '\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// 1-based line containing `offset`.
    pub fn line(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line.checked_sub(1)?).copied()
    }
}

/// Computes 1-based line and column from a byte offset
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let index = LineIndex::new(source);
    line_col_with(&index, source, offset)
}

fn line_col_with(index: &LineIndex, source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let line = index.line(offset);
    let start = index.line_start(line).unwrap_or(0);
    let col = source
        .get(start..offset)
        .map(|prefix| prefix.chars().count())
        .unwrap_or(0)
        + 1;
    (line, col)
}

/// A label pointing to a specific span in the source
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// A complete diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: Option<String>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "error[{}]: {}", code, self.message),
            None => write!(f, "error: {}", self.message),
        }
    }
}

/// Diagnostic renderer for Rust-like error output
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
    lines: LineIndex,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
            lines: LineIndex::new(source),
        }
    }

    fn position(&self, offset: usize) -> (usize, usize) {
        line_col_with(&self.lines, self.source, offset)
    }

    fn line_content(&self, line: usize) -> Option<&'a str> {
        let start = self.lines.line_start(line)?;
        let rest = self.source.get(start..)?;
        Some(rest.split('\n').next().unwrap_or("").trim_end_matches('\r'))
    }

    /// Render a diagnostic to a string
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        // Header line: error[E0001]: message
        let header = match &diagnostic.code {
            Some(code) => format!("{}[{}]", self.style_red_bold("error"), code),
            None => self.style_red_bold("error"),
        };
        output.push_str(&format!("{}: {}\n", header, self.style_bold(&diagnostic.message)));

        let mut lines_to_show: Vec<usize> = Vec::new();
        for label in &diagnostic.labels {
            let (start_line, _) = self.position(label.span.start);
            let (end_line, _) = self.position(label.span.end.saturating_sub(1).max(label.span.start));
            for line in start_line..=end_line {
                if !lines_to_show.contains(&line) {
                    lines_to_show.push(line);
                }
            }
        }
        lines_to_show.sort_unstable();

        if let Some(label) = diagnostic.labels.first() {
            let (line, col) = self.position(label.span.start);
            output.push_str(&format!(
                "  {} {}:{}:{}\n",
                self.style_blue("-->"),
                self.file_name,
                line,
                col
            ));

            let max_line = lines_to_show.last().copied().unwrap_or(1);
            let width = max_line.to_string().len();
            let gutter = format!("{} {}\n", " ".repeat(width + 1), self.style_blue("|"));

            output.push_str(&gutter);
            for &line_num in &lines_to_show {
                self.render_line(&mut output, diagnostic, line_num, width);
            }
            output.push_str(&gutter);
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  {} {}\n", self.style_blue("="), note));
        }

        output
    }

    fn render_line(&self, output: &mut String, diagnostic: &Diagnostic, line_num: usize, width: usize) {
        let Some(content) = self.line_content(line_num) else {
            return;
        };

        output.push_str(&format!(
            "{:>width$} {} {}\n",
            self.style_blue(&line_num.to_string()),
            self.style_blue("|"),
            content,
            width = width + 1
        ));

        let line_len = content.chars().count();
        let mut underlines: Vec<(usize, usize, &str)> = Vec::new();
        for label in &diagnostic.labels {
            let (start_line, start_col) = self.position(label.span.start);
            let last = label.span.end.saturating_sub(1).max(label.span.start);
            let (end_line, end_col) = self.position(last);

            if start_line <= line_num && end_line >= line_num {
                let col_start = if start_line == line_num { start_col } else { 1 };
                let col_end = if end_line == line_num {
                    if label.span.is_empty() { start_col + 1 } else { end_col + 1 }
                } else {
                    line_len + 1
                };
                underlines.push((col_start, col_end.max(col_start + 1), &label.message));
            }
        }

        if underlines.is_empty() {
            return;
        }
        underlines.sort_by_key(|(start, _, _)| *start);

        let mut underline = String::new();
        let mut pos = 1;
        for (col_start, col_end, _) in &underlines {
            while pos < *col_start {
                underline.push(' ');
                pos += 1;
            }
            while pos < *col_end {
                underline.push('^');
                pos += 1;
            }
        }

        let pad = " ".repeat(width + 1);
        output.push_str(&format!(
            "{} {} {}\n",
            pad,
            self.style_blue("|"),
            self.style_red(&underline)
        ));

        for (col_start, _, message) in &underlines {
            if !message.is_empty() {
                output.push_str(&format!(
                    "{} {} {}{}\n",
                    pad,
                    self.style_blue("|"),
                    " ".repeat(col_start.saturating_sub(1)),
                    self.style_red(message)
                ));
            }
        }
    }

    // Color helpers
    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("\x1b[{}m{}\x1b[0m", code, s)
        } else {
            s.to_string()
        }
    }

    fn style_red(&self, s: &str) -> String {
        self.paint("31", s)
    }

    fn style_red_bold(&self, s: &str) -> String {
        self.paint("1;31", s)
    }

    fn style_blue(&self, s: &str) -> String {
        self.paint("34", s)
    }

    fn style_bold(&self, s: &str) -> String {
        self.paint("1", s)
    }
}

/// Render multiple diagnostics followed by an abort summary
pub fn render_diagnostics(source: &str, file_name: &str, diagnostics: &[Diagnostic], use_color: bool) -> String {
    let renderer = DiagnosticRenderer::new(source, file_name, use_color);
    let mut output = String::new();

    for diagnostic in diagnostics {
        output.push_str(&renderer.render(diagnostic));
        output.push('\n');
    }

    let count = diagnostics.len();
    if count > 0 {
        output.push_str(&format!(
            "{}: aborting due to {} error{}\n",
            renderer.style_red_bold("error"),
            count,
            if count == 1 { "" } else { "s" }
        ));
    }

    output
}

/// Sink for every error the pipeline produces.
///
/// Scan and parse errors arrive through `syntax_error`, evaluation failures
/// through `runtime_error`. The sink decides how errors are shown and what
/// exit status they map to.
pub trait Reporter {
    fn syntax_error(&mut self, error: &SyntaxError);

    fn runtime_error(&mut self, error: &RuntimeError);

    /// Progress messages for verbose runs.
    fn trace(&mut self, _message: &str) {}
}

/// Reporter that keeps errors in memory.
#[derive(Debug, Default)]
pub struct ErrorLog {
    pub syntax_errors: Vec<SyntaxError>,
    pub runtime_errors: Vec<RuntimeError>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.syntax_errors.is_empty() && self.runtime_errors.is_empty()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.syntax_errors
            .iter()
            .map(SyntaxError::to_diagnostic)
            .chain(self.runtime_errors.iter().map(RuntimeError::to_diagnostic))
            .collect()
    }
}

impl Reporter for ErrorLog {
    fn syntax_error(&mut self, error: &SyntaxError) {
        self.syntax_errors.push(error.clone());
    }

    fn runtime_error(&mut self, error: &RuntimeError) {
        self.runtime_errors.push(error.clone());
    }
}

/// Reporter that renders each error as a rich diagnostic for one source text.
pub struct DiagnosticReporter<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
    verbose: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> DiagnosticReporter<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
            verbose: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Renders everything collected so far.
    pub fn finish(&self) -> String {
        render_diagnostics(self.source, self.file_name, &self.diagnostics, self.use_color)
    }
}

impl Reporter for DiagnosticReporter<'_> {
    fn syntax_error(&mut self, error: &SyntaxError) {
        self.diagnostics.push(error.to_diagnostic());
    }

    fn runtime_error(&mut self, error: &RuntimeError) {
        self.diagnostics.push(error.to_diagnostic());
    }

    fn trace(&mut self, message: &str) {
        if self.verbose {
            eprintln!("[aroi:debug] {}", message);
        }
    }
}
