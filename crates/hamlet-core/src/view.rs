//! The view layer: embedded HTML shells compiled once at boot.
//!
//! Every registered view is the site layout with the view body spliced
//! into the layout's `{{content}}` slot. Rendering is a single pass over
//! the compiled shell: `{{t:key}}` tokens look up the text catalog for the
//! request language, every other `{{name}}` token takes a built-in value
//! or the view's slot value, and unknown names render empty. Substituted
//! values are never rescanned, so a value cannot smuggle tokens in.

use std::collections::BTreeMap;

use include_dir::Dir;

use crate::config::SiteConfig;
use crate::identity::Lang;

/// Subdirectory of an embedded asset tree holding view shells.
pub const VIEWS_DIR: &str = "views";
/// Subdirectory of an embedded asset tree holding static files.
pub const STATIC_DIR: &str = "static";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("layout has no {{{{content}}}} slot")]
    NoContentSlot,
    #[error("view {0:?} registered more than once")]
    DuplicateView(String),
    #[error("view {0:?} is not registered")]
    MissingView(String),
    #[error("view {0:?} has an unterminated slot")]
    UnterminatedSlot(String),
    #[error("view file {0:?} is not valid UTF-8")]
    NotUtf8(String),
}

/// Data for one render: the view name, the page title, and the values
/// substituted into the shell's slots.
#[derive(Debug, Clone)]
pub struct View {
    pub name: String,
    pub title: String,
    slots: Vec<(String, String)>,
}

impl View {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            slots: Vec::new(),
        }
    }

    /// Adds a slot value, HTML-escaped.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.slots.push((key.to_string(), escape(value)));
        self
    }

    /// Adds a slot value verbatim. The caller vouches for the markup and
    /// must pass untrusted text through [`escape`] while building it.
    pub fn with_html(mut self, key: &str, html: impl Into<String>) -> Self {
        self.slots.push((key.to_string(), html.into()));
        self
    }

    fn slot(&self, key: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Escapes text for embedding in HTML element or attribute context.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Pulls `(view key, shell source)` pairs out of an embedded asset tree,
/// keying each `views/{stem}.html` as `{namespace}-{stem}`.
pub fn collect_views(
    namespace: &str,
    assets: &Dir<'_>,
) -> Result<Vec<(String, String)>, TemplateError> {
    let mut views = Vec::new();
    let Some(dir) = assets.get_dir(VIEWS_DIR) else {
        return Ok(views);
    };
    for file in dir.files() {
        let path = file.path();
        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let source = file
            .contents_utf8()
            .ok_or_else(|| TemplateError::NotUtf8(format!("{namespace}-{stem}")))?;
        views.push((format!("{namespace}-{stem}"), source.to_string()));
    }
    // include_dir preserves filesystem order; key order is the contract.
    views.sort();
    Ok(views)
}

/// Every page shell in the system, compiled once at boot.
#[derive(Debug, Default)]
pub struct Templates {
    shells: BTreeMap<String, String>,
}

impl Templates {
    /// Splices each view body into the layout and validates the result.
    pub fn build<I>(layout: &str, views: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        if !layout.contains("{{content}}") {
            return Err(TemplateError::NoContentSlot);
        }
        let mut shells = BTreeMap::new();
        for (name, body) in views {
            let shell = layout.replacen("{{content}}", &body, 1);
            check_terminated(&name, &shell)?;
            if shells.insert(name.clone(), shell).is_some() {
                return Err(TemplateError::DuplicateView(name));
            }
        }
        Ok(Self { shells })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shells.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shells.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.shells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }

    /// Renders a view for the given language.
    pub fn render(
        &self,
        site: &SiteConfig,
        lang: &Lang,
        view: &View,
    ) -> Result<String, TemplateError> {
        let shell = self
            .shells
            .get(&view.name)
            .ok_or_else(|| TemplateError::MissingView(view.name.clone()))?;
        let lang_links = lang_links_html(site);

        let mut out = String::with_capacity(shell.len() + 256);
        let mut rest = shell.as_str();
        loop {
            let Some(start) = rest.find("{{") else {
                out.push_str(rest);
                break;
            };
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                // Ruled out by build-time validation.
                out.push_str(&rest[start..]);
                break;
            };
            substitute(after[..end].trim(), site, lang, view, &lang_links, &mut out);
            rest = &after[end + 2..];
        }
        Ok(out)
    }
}

fn substitute(
    token: &str,
    site: &SiteConfig,
    lang: &Lang,
    view: &View,
    lang_links: &str,
    out: &mut String,
) {
    if let Some(key) = token.strip_prefix("t:") {
        out.push_str(&escape(site.text(lang.as_str(), key)));
        return;
    }
    match token {
        "title" => out.push_str(&escape(&view.title)),
        "site_title" => out.push_str(&escape(&site.title)),
        "site_description" => out.push_str(&escape(&site.description)),
        "lang" => out.push_str(&escape(lang.as_str())),
        "lang_links" => out.push_str(lang_links),
        _ => {
            if let Some(value) = view.slot(token) {
                out.push_str(value);
            }
        }
    }
}

fn lang_links_html(site: &SiteConfig) -> String {
    let mut html = String::new();
    for language in &site.languages {
        if !html.is_empty() {
            html.push_str(" | ");
        }
        html.push_str("<a href=\"/lang/");
        html.push_str(&escape(&language.id));
        html.push_str("\">");
        html.push_str(&escape(&language.name));
        html.push_str("</a>");
    }
    html
}

fn check_terminated(name: &str, shell: &str) -> Result<(), TemplateError> {
    let mut rest = shell;
    while let Some(start) = rest.find("{{") {
        let Some(end) = rest[start + 2..].find("}}") else {
            return Err(TemplateError::UnterminatedSlot(name.to_string()));
        };
        rest = &rest[start + 2 + end + 2..];
    }
    Ok(())
}
