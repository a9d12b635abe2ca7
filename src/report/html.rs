use chrono::{DateTime, Utc};

use super::ReportStyle;
use super::metrics::RepoMetrics;

/// Everything besides the metrics that ends up in the document.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub repo_name: String,
    pub repo_url: Option<String>,
    pub style: ReportStyle,
    pub generated_at: Option<DateTime<Utc>>,
}

/// Render a complete HTML document. Same inputs, same bytes.
pub fn render(metrics: &RepoMetrics, ctx: &ReportContext) -> String {
    let head_style = match ctx.style {
        ReportStyle::Plain => String::new(),
        ReportStyle::Styled => format!("\n    <style>{}</style>", STYLED_CSS),
    };
    let table_open = match ctx.style {
        ReportStyle::Plain => r#"<table border="1">"#,
        ReportStyle::Styled => "<table>",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Repository Data Report</title>{head_style}
</head>
<body>
    <h1>Repository Data Report for {repo}</h1>
{link}    {table_open}
      <tr>
        <th>Metric</th>
        <th>Count</th>
      </tr>
{rows}    </table>
{footer}</body>
</html>
"#,
        repo = html_escape(&ctx.repo_name),
        link = render_link(ctx.repo_url.as_deref()),
        rows = render_rows(metrics),
        footer = render_footer(ctx.generated_at.as_ref()),
    )
}

fn render_link(url: Option<&str>) -> String {
    match url {
        Some(url) => format!(
            "    <a href=\"{}\">Link to Repository</a>\n",
            html_escape(url)
        ),
        None => String::new(),
    }
}

fn render_rows(metrics: &RepoMetrics) -> String {
    let rows = [
        ("Open Pull Requests", metrics.open_prs),
        ("Closed Pull Requests", metrics.closed_prs),
        ("Total Users", metrics.total_users),
        ("Admin Users", metrics.admin_users),
    ];

    rows.iter()
        .map(|(label, count)| {
            format!("      <tr>\n        <td>{label}</td>\n        <td>{count}</td>\n      </tr>\n")
        })
        .collect()
}

fn render_footer(generated_at: Option<&DateTime<Utc>>) -> String {
    match generated_at {
        Some(ts) => format!(
            "    <p class=\"generated\">Generated {}</p>\n",
            ts.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => String::new(),
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLED_CSS: &str = r#"
      body {
        font-family: Arial, sans-serif;
        margin: 0;
        padding: 20px;
        background-color: #f4f4f4;
      }
      h1 {
        color: #333;
      }
      table {
        width: 100%;
        border-collapse: collapse;
        margin: 20px 0;
        background-color: #fff;
      }
      th, td {
        padding: 12px;
        border: 1px solid #ddd;
        text-align: left;
      }
      th {
        background-color: #f2f2f2;
      }
      tr:nth-child(even) {
        background-color: #f9f9f9;
      }
      .generated {
        color: #777;
        font-size: 0.9em;
      }
    "#;
