use super::builder::RulesWriter;

pub fn emit_prelude(out: &mut RulesWriter) {
  out.push_line("#");
  out.push_line(&format!("# Generated by {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")));
  out.push_line("#");
  out.push_line("");
}
