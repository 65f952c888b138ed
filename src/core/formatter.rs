use lazy_static::lazy_static;
use regex::Captures;
use regex::Regex;
use tracing::warn;

use crate::delivery::xhtml_im_envelope;
use crate::delivery::OutboundMessage;
use crate::metrics::RENDER_FALLBACK_TOTAL;
use crate::model::SearchResult;
use crate::RenderConfig;
use crate::RenderError;

lazy_static! {
    /// `@handle` mention plus the non-word run in front of it.
    static ref MENTION: Regex = Regex::new(r"(\W*)(@\w+)").expect("mention pattern is valid");
}

/// Outcome of rendering one result.
#[derive(Debug)]
pub enum RenderedBody {
    /// Rich fragment validated, full XHTML-IM envelope attached.
    Rich { plain: String, rich: String },
    /// Rich rendering failed validation; deliver plain text only.
    PlainOnly { plain: String, reason: RenderError },
}

impl RenderedBody {
    pub fn plain(&self) -> &str {
        match self {
            RenderedBody::Rich { plain, .. } | RenderedBody::PlainOnly { plain, .. } => plain,
        }
    }

    pub fn rich(&self) -> Option<&str> {
        match self {
            RenderedBody::Rich { rich, .. } => Some(rich),
            RenderedBody::PlainOnly { .. } => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RenderedBody::PlainOnly { .. })
    }

    pub fn into_message(
        self,
        to: impl Into<String>,
        subject: impl Into<String>,
    ) -> OutboundMessage {
        let (plain_body, rich_body) = match self {
            RenderedBody::Rich { plain, rich } => (plain, Some(rich)),
            RenderedBody::PlainOnly { plain, .. } => (plain, None),
        };
        OutboundMessage {
            to: to.into(),
            subject: subject.into(),
            plain_body,
            rich_body,
        }
    }
}

/// Renders results into plain and rich notification bodies.
#[derive(Debug, Clone)]
pub struct BodyFormatter {
    profile_base_url: String,
}

impl BodyFormatter {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            profile_base_url: config.profile_base_url.clone(),
        }
    }

    /// `"<author>: <text>"`, text untouched.
    pub fn plain_body(
        &self,
        result: &SearchResult,
    ) -> String {
        format!("{}: {}", result.author, result.text)
    }

    /// Author and every `@mention` become profile links, `&` is escaped.
    ///
    /// The returned fragment is not validated.
    pub fn rich_body(
        &self,
        result: &SearchResult,
    ) -> String {
        let text = escape_amp(&result.text);
        let linked = MENTION.replace_all(&text, |caps: &Captures| {
            format!("{}{}", &caps[1], self.user_link(&caps[2]))
        });

        format!("{}: {}", self.user_link(&result.author), linked)
    }

    /// Link text keeps a leading `@`, the profile path drops it.
    pub fn user_link(
        &self,
        handle: &str,
    ) -> String {
        let user = handle.strip_prefix('@').unwrap_or(handle);
        format!(
            "<a href=\"{}{}\">{}</a>",
            escape_amp(&self.profile_base_url),
            escape_amp(user),
            escape_amp(handle)
        )
    }

    /// Renders both bodies, validating the rich one as well-formed markup.
    ///
    /// Never fails: invalid markup is logged and degrades to plain text.
    pub fn render(
        &self,
        result: &SearchResult,
    ) -> RenderedBody {
        let plain = self.plain_body(result);
        let fragment = self.rich_body(result);

        match validate_markup(&fragment) {
            Ok(()) => RenderedBody::Rich {
                plain,
                rich: xhtml_im_envelope(&fragment),
            },
            Err(reason) => {
                warn!(
                    result_id = %result.id,
                    text = %result.text,
                    error = %reason,
                    "Nearly made bad html, falling back to plain body"
                );
                RENDER_FALLBACK_TOTAL.inc();
                RenderedBody::PlainOnly { plain, reason }
            }
        }
    }
}

fn escape_amp(s: &str) -> String {
    s.replace('&', "&amp;")
}

/// Parses `<html>{fragment}</html>` with a strict XML parser.
pub fn validate_markup(fragment: &str) -> std::result::Result<(), RenderError> {
    let doc = format!("<html>{fragment}</html>");
    roxmltree::Document::parse(&doc)
        .map(|_| ())
        .map_err(|e| RenderError::InvalidMarkup(e.to_string()))
}
