use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::config::ParserConfig;
use crate::utils::{CinerateResult, Error};

use super::types::ParsedName;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn compile(expression: &str, groups: usize) -> CinerateResult<Regex> {
    let re = Regex::new(expression).map_err(|source| Error::InvalidExpression {
        expression: expression.to_string(),
        source,
    })?;
    // captures_len() counts the implicit whole-match group
    if re.captures_len() <= groups {
        return Err(Error::MissingCaptureGroup {
            expression: expression.to_string(),
            expected: groups,
        });
    }
    Ok(re)
}

/// Compiled form of [`ParserConfig`].
#[derive(Debug, Clone)]
pub struct NameParser {
    name_expressions: Vec<Regex>,
    title_fallback: Regex,
    title_cleanup: Regex,
    extension: Regex,
}

impl NameParser {
    pub fn new(cfg: &ParserConfig) -> CinerateResult<Self> {
        let name_expressions = cfg
            .name_expressions
            .iter()
            .map(|e| compile(e, 2))
            .collect::<CinerateResult<Vec<_>>>()?;

        Ok(Self {
            name_expressions,
            title_fallback: compile(&cfg.title_fallback_expression, 1)?,
            title_cleanup: compile(&cfg.title_cleanup_expression, 0)?,
            extension: compile(&cfg.extension_expression, 0)?,
        })
    }

    /// True when the path's extension (with its leading dot) is a video one.
    pub fn is_video(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extension.is_match(&format!(".{ext}"))
    }

    /// Infer title and year from a file stem.
    pub fn extract(&self, name: &str) -> CinerateResult<ParsedName> {
        for re in &self.name_expressions {
            let Some(caps) = re.captures(name) else {
                tracing::trace!(target: "cinerate::naming", name, regex = %re, "No match");
                continue;
            };
            let Some(raw_title) = caps.get(1) else { continue };

            let title = self.clean_title(raw_title.as_str());
            if title.is_empty() {
                continue;
            }

            let year = caps.get(2).and_then(|m| m.as_str().trim().parse::<u16>().ok());
            if year.is_none() {
                tracing::debug!(target: "cinerate::naming", name, "Could not retrieve the year");
            }
            return Ok(ParsedName { title, year });
        }

        // Title only, no year
        if let Some(m) = self.title_fallback.captures(name).and_then(|c| c.get(1)) {
            let title = self.clean_title(m.as_str());
            if !title.is_empty() {
                return Ok(ParsedName { title, year: None });
            }
        }

        Err(Error::Unparsable(name.to_string()))
    }

    pub fn clean_title(&self, raw: &str) -> String {
        let replaced = self.title_cleanup.replace_all(raw, " ");
        let collapsed = WHITESPACE_RE.replace_all(&replaced, " ");
        collapsed.trim().nfc().collect()
    }
}
