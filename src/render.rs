//! Renders a single [`Row`] into a complete HTML document. Rendering is a
//! pure function of the row, its neighbors, and the site configuration; all
//! file I/O lives in [`crate::build`].
//!
//! Field values are interpolated raw, with no HTML escaping. The CSV is
//! treated as pre-sanitized trusted input; escaping here would corrupt
//! markup that authors put into captions deliberately.

use crate::config::Config;
use crate::row::Row;

/// Relative path from a post page to the figure images.
const FIGURES_PREFIX: &str = "../Figures/";

/// Renders one post page.
///
/// `prev` and `next` are positional neighbors in CSV order: `prev` is the
/// row at the next index (the previous day's entry in a newest-first CSV)
/// and `next` is the row at the prior index. Either link is suppressed
/// entirely when the neighbor does not exist, so the first row has no
/// "next" link and the last row has no "previous" link.
pub fn post_page(row: &Row, prev: Option<&Row>, next: Option<&Row>, config: &Config) -> String {
    let date = row.date().unwrap_or_default();
    let title = row.get("title").unwrap_or(config.site_title.as_str());
    let caption = row.get("caption").unwrap_or_default();
    let description = row.get("description").unwrap_or_default();

    // The label is suppressed along with the value: a row without a data
    // source renders no "Data source:" text at all.
    let datasource = match row.get("datasource") {
        Some(datasource) => format!("Data source: {}", datasource),
        None => String::new(),
    };

    let prev_link = match prev.and_then(Row::date) {
        Some(prev_date) => neighbor_link("prev", "Previous Day's", "Previous", prev_date),
        None => String::new(),
    };
    let next_link = match next.and_then(Row::date) {
        Some(next_date) => neighbor_link("next", "Next Day's", "Next", next_date),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <title>{title} - {date}</title>
    <link rel="icon" href="../LOGO.png" type="image/png" />
    <link rel="stylesheet" href="../styles.css" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="description" content="{description}" />
</head>
<body>
    <header class="header">
        <div class="logo-container">
            <img src="../LOGO.png" alt="Logo" class="logo" />
            <h1 class="site-title"><a href="../index.html">{site_title}</a></h1>
        </div>
        <nav class="navbar">
            <ul>
                <li><a href="../about.html">About</a></li>
                <li><a href="../contact.html">Contact</a></li>
                <li><a href="../people.html">People</a></li>
                <li><a href="../terms-of-use.html">Terms of Use</a></li>
            </ul>
        </nav>
    </header>

    <div class="container">
        <div class="main-content">
            <h2 class="main-title">{main_title}</h2>
            <div class="date">{date}</div>
            <img src="{figures}{date}.png" alt="Figure for {date}" class="main-figure" />
            <div class="text">
                <p class="caption">{caption}</p>
                <br />
                <hr />
                <br />
                <p class="description">{description}</p>
                <br />
                <p class="datasource">{datasource}</p>
                <br />
                <p class="disclaimer"><strong>*These figures have not yet been formally peer reviewed and are intended as exploratory</strong></p>
            </div>
        </div>

        <aside class="sidebar">
            {prev_link}
            {next_link}
        </aside>
    </div>

    <footer class="footer">
        <img src="../LOGO.png" alt="Logo Small" class="footer-logo" />
        <p>&copy; 2025 {site_title}. All rights reserved.</p>
    </footer>
</body>
</html>"#,
        title = title,
        date = date,
        description = description,
        site_title = config.site_title,
        main_title = row.get("title").unwrap_or_default(),
        figures = FIGURES_PREFIX,
        caption = caption,
        datasource = datasource,
        prev_link = prev_link,
        next_link = next_link,
    )
}

// One sidebar figure link. `kind` is either "prev" or "next" and doubles as
// the CSS class prefix.
fn neighbor_link(kind: &str, label: &str, alt_stem: &str, date: &str) -> String {
    format!(
        r#"<div class="{kind}-figure-container">
                <h3 class="{kind}-label">{label}</h3>
                <a href="{date}.html">
                    <img src="{figures}{date}.png" alt="{alt_stem} figure for {date}" class="{kind}-figure" />
                </a>
            </div>"#,
        kind = kind,
        label = label,
        date = date,
        figures = FIGURES_PREFIX,
        alt_stem = alt_stem,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::row::parse_rows;

    fn fixture_rows() -> Vec<Row> {
        parse_rows(
            "date,title,caption,description,datasource\n\
             2025-01-01,First,cap one,desc one,Source One\n\
             2025-01-02,Second,cap two,desc two,Source Two\n\
             2025-01-03,Third,cap three,desc three,\n",
        )
        .unwrap()
    }

    #[test]
    fn test_middle_row_links_to_both_neighbors() {
        let rows = fixture_rows();
        let config = Config::default();
        let html = post_page(&rows[1], Some(&rows[2]), Some(&rows[0]), &config);
        assert!(html.contains(r#"<a href="2025-01-03.html">"#));
        assert!(html.contains(r#"<a href="2025-01-01.html">"#));
        assert!(html.contains("Previous Day's"));
        assert!(html.contains("Next Day's"));
    }

    #[test]
    fn test_first_row_has_no_next_link() {
        let rows = fixture_rows();
        let config = Config::default();
        let html = post_page(&rows[0], Some(&rows[1]), None, &config);
        assert!(html.contains("Previous Day's"));
        assert!(!html.contains("Next Day's"));
    }

    #[test]
    fn test_last_row_has_no_prev_link() {
        let rows = fixture_rows();
        let config = Config::default();
        let html = post_page(&rows[2], None, Some(&rows[1]), &config);
        assert!(!html.contains("Previous Day's"));
        assert!(html.contains("Next Day's"));
    }

    #[test]
    fn test_missing_datasource_suppresses_label() {
        let rows = fixture_rows();
        let config = Config::default();
        let html = post_page(&rows[2], None, Some(&rows[1]), &config);
        assert!(!html.contains("Data source:"));
    }

    #[test]
    fn test_present_datasource_renders_labeled() {
        let rows = fixture_rows();
        let config = Config::default();
        let html = post_page(&rows[0], Some(&rows[1]), None, &config);
        assert!(html.contains("Data source: Source One"));
    }

    #[test]
    fn test_missing_title_falls_back_to_site_title() {
        let rows = parse_rows("date,title\n2025-01-01,\n").unwrap();
        let config = Config::default();
        let html = post_page(&rows[0], None, None, &config);
        assert!(html.contains("<title>The DailyDATA - 2025-01-01</title>"));
    }

    #[test]
    fn test_no_escaping_applied() {
        let rows = parse_rows("date,caption\n2025-01-01,<em>raw</em>\n").unwrap();
        let config = Config::default();
        let html = post_page(&rows[0], None, None, &config);
        assert!(html.contains(r#"<p class="caption"><em>raw</em></p>"#));
    }

    #[test]
    fn test_render_is_deterministic() {
        let rows = fixture_rows();
        let config = Config::default();
        let a = post_page(&rows[1], Some(&rows[2]), Some(&rows[0]), &config);
        let b = post_page(&rows[1], Some(&rows[2]), Some(&rows[0]), &config);
        assert_eq!(a, b);
    }
}
