//! HTML views.
//!
//! Every page shares one layout: a header with the sign-in or sign-out
//! control, the pending flash message, and the page body. Anything that
//! came from a visitor or from disk is escaped before it lands in markup;
//! rendered markdown is the one fragment inserted as-is.

use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

/// Content type for every HTML page.
pub const HTML_CONTENT_TYPE: &str = "text/html;charset=utf-8";
/// Content type for `.txt` documents.
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

const STYLE: &str = "body{font-family:-apple-system,Helvetica,Arial,sans-serif;max-width:860px;margin:0 auto;padding:16px;color:#222;line-height:1.5}\
header{display:flex;justify-content:space-between;align-items:center;border-bottom:1px solid #ddd;margin-bottom:16px}\
header form{display:inline}\
.flash{background:#fff6d5;border:1px solid #e8d27a;padding:8px 12px;border-radius:4px}\
ul.documents li{margin:4px 0}\
ul.documents form{display:inline}\
textarea{font-family:monospace}";

/// Per-request layout inputs taken from the session.
#[derive(Debug, Default)]
pub struct Chrome {
    /// Flash message to show once.
    pub flash: Option<String>,
    /// Signed-in identity, if any.
    pub identity: Option<String>,
}

/// Escape text for inclusion in HTML element content or quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a document name for use as a path segment.
fn href(name: &str) -> String {
    format!("/{}", urlencoding::encode(name))
}

fn layout(title: &str, chrome: &Chrome, body: &str) -> String {
    let title = escape(title);
    let style = STYLE;

    let auth = match chrome.identity.as_deref() {
        Some(identity) => format!(
            r#"<form method="post" action="/sign_out"><span>Signed in as {}.</span> <button type="submit">Sign Out</button></form>"#,
            escape(identity)
        ),
        None => r#"<a href="/sign_in">Sign In</a>"#.to_owned(),
    };

    let flash = chrome
        .flash
        .as_deref()
        .map(|message| format!(r#"<div class="flash"><p>{}</p></div>"#, escape(message)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<header><h2><a href="/">Folio</a></h2><div class="auth">{auth}</div></header>
{flash}
<main>
{body}
</main>
</body>
</html>
"#
    )
}

/// Wrap a full HTML page in a response with the given status.
pub fn html_response(status: StatusCode, page: String) -> Response {
    (status, [(CONTENT_TYPE, HTML_CONTENT_TYPE)], page).into_response()
}

/// Serve raw bytes as plain text.
pub fn text_response(content: Vec<u8>) -> Response {
    (StatusCode::OK, [(CONTENT_TYPE, TEXT_CONTENT_TYPE)], content).into_response()
}

/// The home page: every document with view, edit and delete controls.
pub fn index(chrome: &Chrome, names: &[String]) -> String {
    let mut items = String::new();
    for name in names {
        let link = href(name);
        let label = escape(name);
        items.push_str(&format!(
            r#"<li><a href="{link}">{label}</a> <a href="{link}/edit">Edit</a> <form method="post" action="{link}/delete"><button type="submit">Delete</button></form></li>
"#
        ));
    }

    let list = if names.is_empty() {
        "<p>No documents yet.</p>".to_owned()
    } else {
        format!("<ul class=\"documents\">\n{items}</ul>")
    };

    let body = format!("{list}\n<p><a href=\"/new_doc\">New Document</a></p>");
    layout("Folio", chrome, &body)
}

/// A markdown document rendered to HTML inside the layout.
pub fn document(chrome: &Chrome, name: &str, rendered_html: &str) -> String {
    layout(name, chrome, &format!("<article>\n{rendered_html}</article>"))
}

/// The edit form for one document.
pub fn edit(chrome: &Chrome, name: &str, content: &str) -> String {
    let body = format!(
        r#"<p>Edit content of {label}:</p>
<form method="post" action="{action}">
<textarea name="content" rows="20" cols="100">{content}</textarea>
<p><button type="submit">Save Changes</button></p>
</form>"#,
        label = escape(name),
        action = href(name),
        content = escape(content),
    );
    layout(&format!("Edit {name}"), chrome, &body)
}

/// The form to name a new document. `value` refills the field after a
/// rejected submission.
pub fn new_doc(chrome: &Chrome, value: &str) -> String {
    let body = format!(
        r#"<form method="post" action="/create_doc">
<label for="new_doc_name">Add a new document:</label>
<input type="text" id="new_doc_name" name="new_doc_name" value="{value}"/>
<button type="submit">Create</button>
</form>"#,
        value = escape(value),
    );
    layout("New Document", chrome, &body)
}

/// The sign-in form. `username` refills the field after a failed attempt.
pub fn sign_in(chrome: &Chrome, username: &str) -> String {
    let body = format!(
        r#"<form method="post" action="/sign_in">
<p><label for="username">Username:</label> <input type="text" id="username" name="username" value="{username}"/></p>
<p><label for="password">Password:</label> <input type="password" id="password" name="password"/></p>
<button type="submit">Sign In</button>
</form>"#,
        username = escape(username),
    );
    layout("Sign In", chrome, &body)
}

/// Generic failure page; details stay in the log.
pub fn error_page(message: &str) -> String {
    layout(
        "Error",
        &Chrome::default(),
        &format!("<p>{}</p>", escape(message)),
    )
}
