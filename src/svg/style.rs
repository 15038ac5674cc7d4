//! Inline `style` attributes and `<style>` class rules.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use lightningcss::printer::PrinterOptions;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::traits::ToCss;
use parking_lot::Mutex;
use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

use super::tree::Document;
use crate::debug;

// ============================================================================
// Inline style
// ============================================================================

/// Declarations of an inline `style` attribute, in source order.
///
/// Property names are lowercased; values are trimmed.
pub fn inline_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

/// Value of `name` in an inline style. The last declaration wins.
pub fn inline_property(style: &str, name: &str) -> Option<String> {
    inline_declarations(style)
        .into_iter()
        .rev()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

/// Rewrite `name` in place (first occurrence, later duplicates dropped), or
/// append it when the style does not declare it.
pub fn set_inline_property(style: &str, name: &str, value: &str) -> String {
    let Some(pattern) = property_pattern(name) else {
        return style.to_string();
    };

    if !pattern.is_match(style) {
        let base = style.trim().trim_end_matches(';').trim_end();
        return if base.is_empty() {
            format!("{name}: {value}")
        } else {
            format!("{base}; {name}: {value}")
        };
    }

    let mut written = false;
    pattern
        .replace_all(style, |caps: &Captures<'_>| {
            if written {
                String::new()
            } else {
                written = true;
                format!("{}{}{name}: {value}", &caps[1], &caps[2])
            }
        })
        .into_owned()
}

/// Remove every declaration of `name`.
pub fn remove_inline_property(style: &str, name: &str) -> String {
    let Some(pattern) = property_pattern(name) else {
        return style.to_string();
    };
    let stripped = pattern.replace_all(style, "");
    stripped.trim().trim_start_matches(';').trim().to_string()
}

static PATTERNS: LazyLock<Mutex<FxHashMap<String, Regex>>> =
    LazyLock::new(|| Mutex::new(FxHashMap::default()));

/// `(^|;)(ws*)name ws*:value` with the property name matched literally, so
/// `stroke` never matches `stroke-width`.
fn property_pattern(name: &str) -> Option<Regex> {
    let key = name.to_ascii_lowercase();
    let mut patterns = PATTERNS.lock();
    if let Some(pattern) = patterns.get(&key) {
        return Some(pattern.clone());
    }
    let pattern = Regex::new(&format!(
        r"(^|;)([ \t\r\n]*){}[ \t\r\n]*:[^;]*",
        ascii_caseless(&key)
    ))
    .ok()?;
    patterns.insert(key, pattern.clone());
    Some(pattern)
}

/// ASCII case-insensitive literal (`fill` -> `[fF][iI][lL][lL]`).
fn ascii_caseless(literal: &str) -> String {
    literal
        .chars()
        .map(|c| {
            if c.is_ascii_alphabetic() {
                format!("[{}{}]", c.to_ascii_lowercase(), c.to_ascii_uppercase())
            } else {
                regex::escape(c.encode_utf8(&mut [0; 4]))
            }
        })
        .collect()
}

// ============================================================================
// Class rules
// ============================================================================

/// Declarations attached to a single `.class` selector.
#[derive(Debug, Clone)]
struct ClassRule {
    class: String,
    declarations: Vec<(String, String)>,
}

/// Class selectors gathered from every `<style>` block of a document,
/// in stylesheet order.
#[derive(Debug, Clone, Default)]
pub struct ClassRules {
    rules: Vec<ClassRule>,
}

impl ClassRules {
    pub fn from_document(doc: &Document) -> Self {
        let mut rules = Self::default();
        for node in doc.descendants() {
            if doc.element(node).is_some_and(|e| e.is("style")) {
                rules.extend_from_css(&doc.text_content(node));
            }
        }
        rules
    }

    pub fn from_css(css: &str) -> Self {
        let mut rules = Self::default();
        rules.extend_from_css(css);
        rules
    }

    fn extend_from_css(&mut self, css: &str) {
        let sheet = match StyleSheet::parse(css, ParserOptions::default()) {
            Ok(sheet) => sheet,
            Err(err) => {
                debug!("builder"; "ignoring unparseable <style> block: {}", err);
                return;
            }
        };

        for rule in &sheet.rules.0 {
            let CssRule::Style(style) = rule else {
                continue;
            };
            let selectors = style
                .selectors
                .to_css_string(PrinterOptions::default())
                .unwrap_or_default();
            let declarations: Vec<(String, String)> = style
                .declarations
                .declarations
                .iter()
                .chain(style.declarations.important_declarations.iter())
                .filter_map(|property| {
                    let value = property
                        .value_to_css_string(PrinterOptions::default())
                        .ok()?;
                    Some((property.property_id().name().to_ascii_lowercase(), value))
                })
                .collect();

            for selector in selectors.split(',') {
                if let Some(class) = simple_class(selector.trim()) {
                    self.rules.push(ClassRule {
                        class: class.to_string(),
                        declarations: declarations.clone(),
                    });
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Declarations that apply to an element with the given `class`
    /// attribute. Later rules override earlier ones.
    pub fn declarations_for(&self, class_attr: &str) -> BTreeMap<String, String> {
        let classes: Vec<&str> = class_attr.split_whitespace().collect();
        let mut out = BTreeMap::new();
        for rule in &self.rules {
            if classes.contains(&rule.class.as_str()) {
                for (name, value) in &rule.declarations {
                    out.insert(name.clone(), value.clone());
                }
            }
        }
        out
    }
}

/// `.name` selectors only; compound and descendant selectors are ignored.
fn simple_class(selector: &str) -> Option<&str> {
    let class = selector.strip_prefix('.')?;
    let valid = !class.is_empty()
        && class
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(class)
}
