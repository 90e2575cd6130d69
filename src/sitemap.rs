//! Builds a sitemaps.org 0.9 `urlset` document for the generated site: one
//! entry for the site root followed by one entry per post, in CSV order.
//! The sitemap is rewritten unconditionally on every run; it never goes
//! through change detection.

use crate::row::Row;
use std::fmt::Write;
use url::Url;

const CHANGEFREQ: &str = "daily";
const ROOT_PRIORITY: &str = "1.0";
const POST_PRIORITY: &str = "0.9";

/// Renders the sitemap XML for the given rows.
///
/// The root entry's `lastmod` is the *last* row's date in sequence order.
/// Since rows are never sorted, this is the positional last record, not
/// necessarily the maximum date.
pub fn sitemap_xml(rows: &[Row], origin: &Url) -> String {
    let origin = origin.as_str().trim_end_matches('/');
    let last_date = rows
        .last()
        .and_then(Row::date)
        .unwrap_or_default();

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    push_entry(&mut xml, &format!("{}/", origin), last_date, ROOT_PRIORITY);
    for row in rows {
        let date = row.date().unwrap_or_default();
        push_entry(
            &mut xml,
            &format!("{}/posts/{}.html", origin, date),
            date,
            POST_PRIORITY,
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

fn push_entry(xml: &mut String, loc: &str, lastmod: &str, priority: &str) {
    // Infallible: writing into a String cannot fail.
    let _ = write!(
        xml,
        "   <url>\n      <loc>{}</loc>\n      <lastmod>{}</lastmod>\n      <changefreq>{}</changefreq>\n      <priority>{}</priority>\n   </url>\n",
        loc, lastmod, CHANGEFREQ, priority,
    );
}
