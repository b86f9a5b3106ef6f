//! HTML rendering of the authenticated file listing
//!
//! One page: a search form and the file list. Provider-supplied strings are
//! escaped for the position they land in (text vs. attribute).

use axum::response::Html;
use google_auth::FileList;
use html_escape::{encode_double_quoted_attribute, encode_text};

pub fn files_page(files: &FileList) -> Html<String> {
    let mut items = String::new();
    for file in &files.items {
        let owners = file
            .owners
            .iter()
            .map(|owner| encode_text(&owner.display_name).into_owned())
            .collect::<Vec<_>>()
            .join(" ");
        items.push_str(&format!(
            r#"<li>
              <a href="{href}">
                <img src="{icon}" /> <strong>{title}</strong>
                <small>{owners}</small>
              </a>
              </li>"#,
            href = encode_double_quoted_attribute(&file.alternate_link),
            icon = encode_double_quoted_attribute(&file.icon_link),
            title = encode_text(&file.title),
        ));
    }

    Html(format!(
        r#"<!DOCTYPE html>
          <head>
            <link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%221.2em%22 font-size=%2270%22>🔎</text></svg>">
            <title>Drive viewer 3000</title>
            <style>
              body {{
                margin: 40px auto;
                max-width: 650px;
                line-height: 1.6;
                font-size: 18px;
                color: #444;
                padding: 0 10px
              }}
            </style>
          </head>
          <body>
            <h1>Files</h1>
            <form>
              <input name="q" placeholder="Search" />
              <input type="submit" value="🔎" />
            </form>
            <ul>
            {items}
            </ul>
            <a href="/logout">Logout</a>
          </body>"#
    ))
}
