/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

//! Server-side rendering of the coordinate form.
//!
//! Every action on the page is a plain HTML form POST, so the page works
//! without any client scripting. While a submission is in flight the page
//! refreshes itself until the outcome is stored.

use crate::common::types::{FormState, Point};
use std::fmt::Write;

const REFRESH_WHILE_LOADING_SECONDS: u32 = 1;

const STYLE: &str = r#"
  body { font-family: system-ui, sans-serif; background: #eef2ff; margin: 0; padding: 2rem; }
  .card { max-width: 56rem; margin: 0 auto; background: #fff; border-radius: 0.75rem; padding: 2rem; box-shadow: 0 10px 25px rgba(0,0,0,0.08); }
  h1 { color: #1f2937; }
  .row { display: flex; gap: 1rem; flex-wrap: wrap; align-items: flex-end; }
  .field { flex: 1; min-width: 200px; }
  .field label { display: block; font-size: 0.875rem; color: #4b5563; margin-bottom: 0.25rem; }
  .field input { width: 100%; padding: 0.5rem 1rem; border: 1px solid #d1d5db; border-radius: 0.5rem; box-sizing: border-box; }
  .point { display: flex; justify-content: space-between; background: #f9fafb; padding: 1rem; border-radius: 0.5rem; margin-bottom: 0.5rem; }
  .point span { margin-right: 1.5rem; color: #4b5563; }
  .empty { color: #6b7280; font-style: italic; }
  button { padding: 0.5rem 1.5rem; border: none; border-radius: 0.5rem; background: #2563eb; color: #fff; cursor: pointer; }
  button.remove { background: none; color: #dc2626; }
  button.send { width: 100%; padding: 0.75rem; }
  button:disabled { background: #9ca3af; cursor: not-allowed; }
  .error { margin-top: 1rem; padding: 1rem; background: #fef2f2; border: 1px solid #fecaca; border-radius: 0.5rem; color: #b91c1c; }
  .response { margin-top: 1rem; padding: 1rem; background: #fefce8; border: 1px solid #fef08a; border-radius: 0.5rem; }
  .response pre { color: #15803d; overflow-x: auto; }
  .sent-at { color: #6b7280; font-size: 0.875rem; margin-top: 0.5rem; }
"#;

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
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

fn render_point(html: &mut String, index: usize, point: &Point) {
    let _ = write!(
        html,
        r#"<div class="point"><div><span><strong>Lat:</strong> {lat}</span><span><strong>Lng:</strong> {lng}</span></div><form method="post" action="/points/{index}/remove"><button type="submit" class="remove">Remove</button></form></div>"#,
        lat = point.lat,
        lng = point.lng,
    );
}

pub fn render_form_page(form: &FormState) -> String {
    let mut html = String::new();

    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\" />\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n",
    );
    if form.loading {
        let _ = writeln!(
            html,
            "<meta http-equiv=\"refresh\" content=\"{REFRESH_WHILE_LOADING_SECONDS}\" />"
        );
    }
    let _ = write!(
        html,
        "<title>Geo Form</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<div class=\"card\">\n"
    );
    html.push_str("<h1>Create a request to the Geo microservice</h1>\n");

    html.push_str("<h2>Add Coordinate Point</h2>\n");
    let _ = write!(
        html,
        r#"<form method="post" action="/points" class="row">
<div class="field"><label for="lat">Latitude</label><input id="lat" name="lat" type="number" step="any" placeholder="-90 to 90" value="{lat}" /></div>
<div class="field"><label for="lng">Longitude</label><input id="lng" name="lng" type="number" step="any" placeholder="-180 to 180" value="{lng}" /></div>
<div><button type="submit">Add</button></div>
</form>
"#,
        lat = escape_html(&form.lat_input),
        lng = escape_html(&form.lng_input),
    );

    let _ = writeln!(html, "<h2>Coordinates List ({})</h2>", form.points.len());
    if form.points.is_empty() {
        html.push_str("<p class=\"empty\">No coordinates added yet</p>\n");
    } else {
        html.push_str("<div class=\"points\">");
        for (index, point) in form.points.iter().enumerate() {
            render_point(&mut html, index, point);
        }
        html.push_str("</div>\n");
    }

    let disabled = if form.loading || form.points.is_empty() {
        " disabled"
    } else {
        ""
    };
    let label = if form.loading {
        "Sending..."
    } else {
        "Send to API"
    };
    let _ = writeln!(
        html,
        r#"<form method="post" action="/submit"><button type="submit" class="send"{disabled}>{label}</button></form>"#
    );

    if let Some(sent_at) = form.last_sent_at {
        let _ = writeln!(
            html,
            "<p class=\"sent-at\">Last sent at {}</p>",
            sent_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    if let Some(error) = form.error.as_deref().filter(|error| !error.is_empty()) {
        let _ = writeln!(html, "<div class=\"error\">{}</div>", escape_html(error));
    }

    // A JSON `null` reply counts as no response.
    if let Some(response) = form.response.as_ref().filter(|response| !response.is_null()) {
        let pretty = serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string());
        let _ = writeln!(
            html,
            "<div class=\"response\"><h3>Response:</h3><pre>{}</pre></div>",
            escape_html(&pretty)
        );
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}
