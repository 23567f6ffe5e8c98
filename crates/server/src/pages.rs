// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Visitor-facing HTML pages for visits that are not redirected.

use axum::response::Html;
use paygate_api::ClosedNotice;

/// Shown on the closed page when today has no announced hours.
const HOURS_TBA: &str = "to be announced";

const STYLE: &str = "\
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;\
background:#f4f5fb;min-height:100vh;margin:0;display:flex;align-items:center;\
justify-content:center;padding:20px;box-sizing:border-box}\
.card{background:#fff;border-radius:16px;padding:48px 40px;max-width:500px;\
text-align:center;box-shadow:0 20px 60px rgba(0,0,0,.15)}\
h1{font-size:26px;color:#333;margin:0 0 16px}\
p{color:#666;font-size:16px;line-height:1.6}\
.info{background:#f0f7ff;border-left:4px solid #667eea;padding:16px 20px;\
text-align:left;border-radius:8px;margin-top:24px}";

fn escape_html(raw: &str) -> String {
    let mut escaped: String = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n\
         <body>\n<div class=\"card\">\n{body}\n</div>\n</body>\n</html>\n",
        title = escape_html(title),
    ))
}

/// Page for visits outside working hours.
#[must_use]
pub fn render_closed(notice: &ClosedNotice) -> Html<String> {
    let hours: &str = notice.hours.as_deref().unwrap_or(HOURS_TBA);
    let body: String = format!(
        "<h1>Payments are closed</h1>\n<p>{reason}</p>\n\
         <div class=\"info\">\n<p><strong>{day}:</strong> {hours}</p>\n\
         <p>Time zone: {timezone}</p>\n<p>Current time: {local_time}</p>\n</div>",
        reason = escape_html(&notice.reason),
        day = escape_html(&notice.day_name),
        hours = escape_html(hours),
        timezone = escape_html(&notice.timezone),
        local_time = escape_html(&notice.local_time),
    );
    page("Payments are closed", &body)
}

/// Page for visits with no servable redirect.
#[must_use]
pub fn render_maintenance(message: &str) -> Html<String> {
    let body: String = format!(
        "<h1>Temporarily unavailable</h1>\n<p>{}</p>\n<p>Please try again later.</p>",
        escape_html(message)
    );
    page("Temporarily unavailable", &body)
}

/// Page for visits whose resolution failed. Never shows internal detail.
#[must_use]
pub fn render_error(message: &str) -> Html<String> {
    let body: String = format!(
        "<h1>Something went wrong</h1>\n<p>{}</p>\n<p>Please try again in a few minutes.</p>",
        escape_html(message)
    );
    page("Something went wrong", &body)
}
