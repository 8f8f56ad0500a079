use apidoc_core::http::header::CONTENT_TYPE;
use apidoc_core::http::{get, Html, IntoResponse, Router};
use serde_json::Value;

use crate::config::RedocConfig;
use crate::handle::DocsHandle;

/// Build a `Router` serving the document as JSON on `config.json_path` and
/// the ReDoc page on `config.docs_path`.
///
/// Both answer 200 with whatever the document holds at request time.
pub fn docs_routes<T: Clone + Send + Sync + 'static>(
    handle: DocsHandle,
    config: &RedocConfig,
) -> Router<T> {
    let json_handle = handle.clone();
    let page_handle = handle;
    let title = config.title.clone();
    let redoc_js_url = config.redoc_js_url.clone();

    Router::<T>::new()
        .route(
            &config.json_path,
            get(move || {
                let handle = json_handle.clone();
                async move {
                    if !handle.is_built() {
                        tracing::debug!("serving OpenAPI document before it was built");
                    }
                    let body = serde_json::to_string(&handle.document_value())
                        .unwrap_or_else(|_| "{}".to_string());
                    ([(CONTENT_TYPE, "application/json")], body).into_response()
                }
            }),
        )
        .route(
            &config.docs_path,
            get(move || {
                let handle = page_handle.clone();
                let title = title.clone();
                let redoc_js_url = redoc_js_url.clone();
                async move {
                    Html(render_page(&title, &redoc_js_url, &handle.document_value())).into_response()
                }
            }),
        )
}

/// Render the ReDoc page with `spec` embedded inline.
pub fn render_page(title: &str, redoc_js_url: &str, spec: &Value) -> String {
    let spec_json = serde_json::to_string(spec)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <title>{title}</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
      body {{ margin: 0; padding: 0; }}
    </style>
  </head>
  <body>
    <div id="redoc-container"></div>
    <script src="{src}"></script>
    <script>
      Redoc.init({spec_json}, {{}}, document.getElementById("redoc-container"));
    </script>
  </body>
</html>"#,
        title = escape_html(title),
        src = escape_html(redoc_js_url),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
