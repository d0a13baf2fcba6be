//! Development renderer: everything comes fresh from the source tree on
//! every request, and templates get a development client injected.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::SiteConfig;
use crate::error::{Result, SsrError};
use crate::render::module::HtmlModule;
use crate::render::template::read_template;
use crate::render::{RenderModule, RendererProvider};

/// URL path the transformed template loads the development client from.
/// Served from memory, never from the site tree.
pub const DEV_CLIENT_PATH: &str = "/@dev/client.js";

/// Development client script. Polls the current page and reloads when the
/// served markup changes, so source edits show up without a manual refresh.
pub const DEV_CLIENT_JS: &str = r"const poll = async () => {
  try {
    const res = await fetch(window.location.href, { cache: 'no-store' });
    const text = await res.text();
    if (poll.last !== undefined && poll.last !== text) {
      window.location.reload();
      return;
    }
    poll.last = text;
  } catch {
    // server restarting, retry on the next tick
  }
  setTimeout(poll, 1000);
};
setTimeout(poll, 1000);
";

/// Renderer provider for development mode. Holds no cached state; the
/// source tree is the single source of truth.
pub struct LiveRenderer {
    site: SiteConfig,
}

impl LiveRenderer {
    pub const fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    /// Inject the development client script before `</head>`, or append it
    /// when the template has no head element.
    fn transform_index_html(template: &str) -> String {
        let tag = format!("<script type=\"module\" src=\"{DEV_CLIENT_PATH}\"></script>");
        match template.find("</head>") {
            Some(pos) => {
                let mut out = String::with_capacity(template.len() + tag.len() + 1);
                out.push_str(&template[..pos]);
                out.push_str(&tag);
                out.push('\n');
                out.push_str(&template[pos..]);
                out
            }
            None => format!("{template}\n{tag}"),
        }
    }
}

#[async_trait]
impl RendererProvider for LiveRenderer {
    async fn index_html(&self, _url: &str) -> Result<String> {
        let raw = read_template(&self.site.source_template()).await?;
        Ok(Self::transform_index_html(&raw))
    }

    async fn load_renderer(&self, _url: &str) -> Result<Arc<dyn RenderModule>> {
        let module = HtmlModule::load(&self.site.source_entry()).await?;
        Ok(Arc::new(module))
    }

    fn annotate_error(&self, err: SsrError) -> SsrError {
        let entry = self.site.source_entry();
        let mut trace = format!(
            "while serving from {}\n  template: {}\n  entry: {}",
            self.site.root_dir().display(),
            self.site.source_template().display(),
            entry.display(),
        );
        if let Some(snippet) = source_snippet(&entry) {
            trace.push_str("\n  entry source:\n");
            trace.push_str(&snippet);
        }
        err.annotated(trace)
    }
}

/// Lines of entry source included in a development diagnostic.
const SNIPPET_LINES: usize = 4;

/// First lines of a source file, indented for the diagnostic trace.
/// Unreadable or empty files yield nothing.
fn source_snippet(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let lines: Vec<String> = content
        .lines()
        .take(SNIPPET_LINES)
        .map(|line| format!("    {line}"))
        .collect();
    if lines.is_empty() {
        return None;
    }
    Some(lines.join("\n"))
}
