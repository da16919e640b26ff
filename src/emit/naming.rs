use std::fmt;

use crate::context::BuildContext;

/// Make variables that stay unresolved in the generated file.
pub const COMMIT_COUNT_VAR: &str = "-num-commits-since-version-change";
pub const GIT_BRANCH_VAR: &str = "GIT_BRANCH";
pub const GIT_COMMIT_VAR: &str = "GIT_COMMIT";
pub const CONFIGURATION_VAR: &str = "CONFIGURATION";

/// A piece of generated text: either known now, or left for make to expand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
  Literal(String),
  Deferred(&'static str),
}

impl Token {
  pub fn lit(s: impl Into<String>) -> Self {
    Token::Literal(s.into())
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Token::Literal(s) => f.write_str(s),
      Token::Deferred(var) => write!(f, "$({var})"),
    }
  }
}

pub fn render(tokens: &[Token]) -> String {
  tokens.iter().map(Token::to_string).collect()
}

/// `{prefix}-v{version}.{commits}_{os}-{arch}_{branch}_{commit}-{configuration}`
///
/// Branch, commit, commit count and configuration are deferred so a branch
/// switch does not require regenerating the rules file.
pub fn artifact_name_tokens(ctx: &BuildContext, prefix: &str) -> Vec<Token> {
  vec![
    Token::lit(format!("{prefix}-v{}.", ctx.product_version)),
    Token::Deferred(COMMIT_COUNT_VAR),
    Token::lit(format!("_{}-{}_", ctx.os.os_type, ctx.os.architecture)),
    Token::Deferred(GIT_BRANCH_VAR),
    Token::lit("_"),
    Token::Deferred(GIT_COMMIT_VAR),
    Token::lit("-"),
    Token::Deferred(CONFIGURATION_VAR),
  ]
}

pub fn artifact_basename(ctx: &BuildContext, prefix: &str) -> String {
  render(&artifact_name_tokens(ctx, prefix))
}
