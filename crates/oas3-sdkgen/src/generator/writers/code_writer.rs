/// Line oriented text buffer that tracks the current indentation level.
#[derive(Debug, Clone)]
pub(crate) struct CodeWriter {
  buffer: String,
  level: usize,
  indent: &'static str,
}

impl CodeWriter {
  pub(crate) fn new(indent: &'static str) -> Self {
    Self {
      buffer: String::with_capacity(4096),
      level: 0,
      indent,
    }
  }

  /// Writes `text` on its own line at the current level. Empty text writes a bare newline.
  pub(crate) fn line(&mut self, text: impl AsRef<str>) {
    let text = text.as_ref();
    if !text.is_empty() {
      for _ in 0..self.level {
        self.buffer.push_str(self.indent);
      }
      self.buffer.push_str(text);
    }
    self.buffer.push('\n');
  }

  /// Writes every line of `text` at the current level.
  pub(crate) fn lines(&mut self, text: &str) {
    for line in text.lines() {
      self.line(line);
    }
  }

  pub(crate) fn blank(&mut self) {
    if !self.buffer.is_empty() && !self.buffer.ends_with("\n\n") && !self.ends_with_opener() {
      self.buffer.push('\n');
    }
  }

  /// Writes `opener` and indents the lines that follow.
  pub(crate) fn open(&mut self, opener: impl AsRef<str>) {
    self.line(opener);
    self.indent();
  }

  /// Dedents and writes `closer`.
  pub(crate) fn close(&mut self, closer: impl AsRef<str>) {
    self.dedent();
    self.trim_trailing_blank();
    self.line(closer);
  }

  pub(crate) fn indent(&mut self) {
    self.level += 1;
  }

  pub(crate) fn dedent(&mut self) {
    self.level = self.level.saturating_sub(1);
  }

  pub(crate) fn level(&self) -> usize {
    self.level
  }

  pub(crate) fn finish(mut self) -> String {
    self.trim_trailing_blank();
    self.buffer
  }

  fn ends_with_opener(&self) -> bool {
    let trimmed = self.buffer.trim_end_matches('\n');
    trimmed.ends_with('{') || trimmed.ends_with(':') || trimmed.ends_with('(')
  }

  fn trim_trailing_blank(&mut self) {
    while self.buffer.ends_with("\n\n") {
      self.buffer.pop();
    }
  }
}
