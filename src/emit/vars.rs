use serde::{Deserialize, Serialize};

use super::builder::RulesWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
  /// `NAME = \` followed by one continuation line per item.
  #[default]
  Plain,
  /// One `ifneq ($(wildcard item),)` guarded append per item.
  Conditional,
}

/// `name = value`, written verbatim. The value must not contain a newline.
pub fn write_scalar(out: &mut RulesWriter, name: &str, value: &str) {
  out.push_line(&format!("{name} = {value}"));
}

/// Space-joined value list on a single line.
pub fn write_value_list<S: AsRef<str>>(out: &mut RulesWriter, name: &str, items: &[S]) {
  let joined = items.iter().map(|s| s.as_ref()).collect::<Vec<&str>>().join(" ");
  write_scalar(out, name, &joined);
}

pub fn write_list<S: AsRef<str>>(out: &mut RulesWriter, name: &str, items: &[S], mode: ListMode) {
  if items.is_empty() {
    return;
  }

  if mode == ListMode::Plain {
    out.push_str(&format!("{name} ="));
  }

  for raw in items {
    let item: &str = raw.as_ref();
    let item = item.trim();
    if item.is_empty() {
      continue;
    }

    match mode {
      ListMode::Conditional => {
        out.push_line(&format!("ifneq ($(wildcard {item}),)"));
        out.push_line(&format!("{name} += {item}"));
        out.push_line("endif");
      }
      ListMode::Plain => {
        out.push_line(" \\");
        out.push_str(&format!("\t{item}"));
      }
    }
  }

  if mode == ListMode::Plain {
    out.blank();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn render(f: impl FnOnce(&mut RulesWriter)) -> String {
    let mut out = RulesWriter::new();
    f(&mut out);
    out.finish()
  }

  #[test]
  fn plain_list_drops_blank_items() {
    let text = render(|out| write_list(out, "FILES", &["a", "", "  b  "], ListMode::Plain));
    assert_eq!(text, "FILES = \\\n\ta \\\n\tb\n");
  }

  #[test]
  fn conditional_list_guards_each_item() {
    let text = render(|out| write_list(out, "FILES", &["x", " "], ListMode::Conditional));
    assert_eq!(text, "ifneq ($(wildcard x),)\nFILES += x\nendif\n");
    assert!(!text.contains("FILES ="));
  }

  #[test]
  fn empty_list_emits_nothing() {
    let empty: [&str; 0] = [];
    assert_eq!(render(|out| write_list(out, "FILES", &empty, ListMode::Plain)), "");
    assert_eq!(render(|out| write_list(out, "FILES", &empty, ListMode::Conditional)), "");
  }

  #[test]
  fn value_list_is_space_joined() {
    let text = render(|out| write_value_list(out, "API_LEVELS", &["21", "22"]));
    assert_eq!(text, "API_LEVELS = 21 22\n");
  }
}
