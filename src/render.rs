//! HTML rendering for dashboard views.
//!
//! Every piece of text that reaches the page goes through [`html_escape`].

use crate::dashboard::{Component, Notice, NoticeKind, View};
use crate::table::Table;

/// Renders a full HTML page around `view`.
pub fn render_page(title: &str, view: &View) -> String {
    let body = match view {
        View::Error { message } => format!("<h2>{}</h2>", html_escape(message)),
        View::Dashboard { components } => components.iter().map(render_component).collect(),
    };
    layout(title, &body)
}

/// The login prompt shown when no user is configured or logged in.
pub fn render_login(title: &str) -> String {
    layout(
        title,
        r#"<h2>Please Log In</h2>
<form class="login" method="post" action="/login">
    <label>Username <input type="text" name="username" placeholder="Enter your username"></label>
    <label>Password <input type="password" name="password" placeholder="Enter your password"></label>
    <button type="submit" class="primary">Login</button>
</form>"#,
    )
}

fn layout(title: &str, content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: sans-serif; margin: 0; }}
        header {{ background: #0072b5; color: #fff; padding: 0.75rem 1.5rem; }}
        main {{ padding: 1.5rem; }}
        .alert {{ border-radius: 4px; margin: 0.5rem 0; padding: 0.75rem 1rem; }}
        .alert-success {{ background: #d1e7dd; color: #0f5132; }}
        .alert-warning {{ background: #fff3cd; color: #664d03; }}
        .alert-danger {{ background: #f8d7da; color: #842029; }}
        table {{ border-collapse: collapse; width: 100%; max-width: 800px; }}
        th, td {{ border-bottom: 1px solid #ddd; padding: 0.4rem 0.6rem; text-align: left; }}
    </style>
</head>
<body>
    <header><h1>{title}</h1></header>
    <main>
{content}
    </main>
</body>
</html>"##,
        title = html_escape(title),
        content = content,
    )
}

fn render_component(component: &Component) -> String {
    match component {
        Component::Heading { text } => format!("<h1>{}</h1>\n", html_escape(text)),
        Component::Notice(notice) => render_notice(notice),
        Component::Table { name, table } => render_table(name, table),
    }
}

fn render_notice(notice: &Notice) -> String {
    let class = match notice.kind {
        NoticeKind::Success => "alert-success",
        NoticeKind::Warning => "alert-warning",
        NoticeKind::Danger => "alert-danger",
    };
    format!(
        "<div class=\"alert {class}\" role=\"alert\">{}</div>\n",
        html_escape(&notice.message)
    )
}

fn render_table(name: &str, table: &Table) -> String {
    let mut html = format!(
        "<table aria-label=\"{}\">\n<thead><tr>",
        html_escape(name)
    );
    for column in table.columns() {
        html.push_str(&format!("<th>{}</th>", html_escape(column)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in table.rows() {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", html_escape(&cell.to_string())));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

/// Simple HTML escape function
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
