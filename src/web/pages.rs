//! HTML page rendering
//!
//! Every dynamic string goes through [`escape`] before it reaches markup.

use axum::response::Html;

use crate::models::TableView;

/// One input of a form
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Checkbox,
}

impl FieldKind {
    fn input_type(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Checkbox => "checkbox",
        }
    }
}

pub struct FormSpec {
    pub title: &'static str,
    pub action: &'static str,
    pub fields: &'static [Field],
}

const NAV: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/books/add", "Add Book"),
    ("/books/update", "Update Book"),
    ("/books/delete", "Delete Book"),
    ("/books/search", "Search Book"),
    ("/users/register", "Register User"),
    ("/users/update", "Update User"),
    ("/users/delete", "Delete User"),
    ("/users/search", "Search User"),
    ("/loans/borrow", "Borrow Book"),
    ("/loans/return", "Return Book"),
    ("/loans/delete", "Delete Loan"),
    ("/loans/search", "Search Loan"),
    ("/loans/overdue", "Overdue Loans"),
    ("/tables", "View Table"),
];

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
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

pub fn layout(title: &str, body: &str) -> Html<String> {
    let nav: String = NAV
        .iter()
        .map(|(href, label)| format!("<a href=\"{}\">{}</a>", href, label))
        .collect::<Vec<_>>()
        .join(" | ");

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title} - Library</title></head>\n\
         <body>\n<nav>{nav}</nav>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape(title),
        nav = nav,
        body = body
    ))
}

pub fn form(spec: &FormSpec) -> Html<String> {
    let mut body = format!("<form method=\"post\" action=\"{}\">\n", spec.action);
    for field in spec.fields {
        body.push_str(&format!(
            "<p><label for=\"{name}\">{label}</label> <input type=\"{kind}\" id=\"{name}\" name=\"{name}\"{value}></p>\n",
            name = field.name,
            label = field.label,
            kind = field.kind.input_type(),
            value = if field.kind == FieldKind::Checkbox { " value=\"on\"" } else { "" },
        ));
    }
    body.push_str("<p><button type=\"submit\">Submit</button></p>\n</form>");
    layout(spec.title, &body)
}

/// Outcome of a submitted form
pub fn message(title: &str, text: &str) -> Html<String> {
    layout(title, &format!("<p class=\"message\">{}</p>", escape(text)))
}

pub fn table(view: &TableView) -> String {
    let mut html = format!("<h2>{}</h2>\n<table border=\"1\">\n<tr>", escape(&view.title));
    for header in &view.headers {
        html.push_str(&format!("<th>{}</th>", escape(header)));
    }
    html.push_str("</tr>\n");
    for row in &view.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>");
    html
}

pub fn tables(title: &str, shown: Result<Vec<TableView>, String>) -> Html<String> {
    match shown {
        Ok(views) => {
            let body: Vec<String> = views.iter().map(table).collect();
            layout(title, &body.join("\n"))
        }
        Err(text) => message(title, &text),
    }
}
