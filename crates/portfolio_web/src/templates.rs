//! HTML pages for both web apps. Every interpolated value goes through
//! [`escape_html`].

use crate::directory::UserEmail;

pub const USER_NOT_FOUND: &str = "User not found";

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n{body}</body>\n</html>\n",
        title = escape_html(title),
    )
}

pub fn roman_form(error: Option<&str>) -> String {
    let mut body = String::from(
        "<h1>Roman Numerals Converter</h1>\n\
         <form method=\"post\" action=\"/\">\n\
         <label for=\"number\">Enter a number between 1 and 3999</label>\n\
         <input type=\"text\" id=\"number\" name=\"number\">\n\
         <button type=\"submit\">Convert</button>\n\
         </form>\n",
    );
    if let Some(message) = error {
        body.push_str(&format!(
            "<p class=\"not_valid\">{}</p>\n",
            escape_html(message)
        ));
    }
    page("Roman Numerals Converter", &body)
}

pub fn roman_result(number: u32, numeral: &str) -> String {
    let body = format!(
        "<h1>Roman Numerals Converter</h1>\n\
         <p class=\"result\">Roman numeral of <span class=\"number\">{number}</span> \
         is <span class=\"numeral\">{numeral}</span></p>\n\
         <a href=\"/\">Convert another number</a>\n",
        numeral = escape_html(numeral),
    );
    page("Roman Numerals Converter", &body)
}

/// What the email page shows below its two forms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EmailView {
    #[default]
    Empty,
    Matches(Vec<UserEmail>),
    Feedback(String),
}

pub fn email_page(view: &EmailView) -> String {
    let mut body = String::from(
        "<h1>Email Database</h1>\n\
         <form method=\"post\" action=\"/\">\n\
         <label for=\"user_keyword\">Find emails by username</label>\n\
         <input type=\"text\" id=\"user_keyword\" name=\"user_keyword\">\n\
         <button type=\"submit\">Search</button>\n\
         </form>\n\
         <form method=\"post\" action=\"/\">\n\
         <label for=\"username\">Username</label>\n\
         <input type=\"text\" id=\"username\" name=\"username\">\n\
         <label for=\"useremail\">Email</label>\n\
         <input type=\"text\" id=\"useremail\" name=\"useremail\">\n\
         <button type=\"submit\">Add</button>\n\
         </form>\n",
    );

    match view {
        EmailView::Empty => {}
        EmailView::Matches(users) if users.is_empty() => {
            body.push_str(&format!("<p class=\"not_found\">{USER_NOT_FOUND}</p>\n"));
        }
        EmailView::Matches(users) => {
            body.push_str("<table class=\"results\">\n<tr><th>Name</th><th>Email</th></tr>\n");
            for user in users {
                body.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td></tr>\n",
                    escape_html(&user.username),
                    escape_html(&user.email)
                ));
            }
            body.push_str("</table>\n");
        }
        EmailView::Feedback(message) => {
            body.push_str(&format!(
                "<p class=\"feedback\">{}</p>\n",
                escape_html(message)
            ));
        }
    }

    page("Email Database", &body)
}
