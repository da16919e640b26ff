/// Append-only sink for the generated rules file.
///
/// There is no way to inspect or rewrite what was already pushed; hooks and
/// core blocks can only add to the end.
#[derive(Debug, Default)]
pub struct RulesWriter {
  buf: String,
}

impl RulesWriter {
  pub fn new() -> Self {
    Self { buf: String::new() }
  }

  pub fn push_line(&mut self, line: &str) {
    self.buf.push_str(line);
    self.buf.push('\n');
  }

  pub fn push_str(&mut self, s: &str) {
    self.buf.push_str(s);
  }

  /// Recipe line: tab-prefixed.
  pub fn rule_line(&mut self, line: &str) {
    self.buf.push('\t');
    self.push_line(line);
  }

  pub fn blank(&mut self) {
    self.buf.push('\n');
  }

  pub fn is_empty(&self) -> bool {
    self.buf.is_empty()
  }

  pub fn finish(self) -> String {
    self.buf
  }
}
