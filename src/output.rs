//! Built-in output writers.
//!
//! The core pipeline only ever sees a rendering function; [`OutputWriter`]
//! is resolved to one before the pipeline runs. The two named writers
//! mirror the generated-notice formats most hosts expect: a plain-text
//! notice and a minimal HTML page.

use std::fmt;

use crate::report::RenderContext;

const SEPARATOR_WIDTH: usize = 80;

/// Rendering callback resolved from an [`OutputWriter`].
pub type RenderFn = Box<dyn Fn(&RenderContext) -> String + Send + Sync>;

/// Named built-in template or a caller-supplied rendering function.
pub enum OutputWriter {
    Default,
    Html,
    Custom(RenderFn),
}

impl OutputWriter {
    /// Resolve a configured writer name. Unknown names are a configuration
    /// error handled by the caller.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "default" => Some(OutputWriter::Default),
            "html" => Some(OutputWriter::Html),
            _ => None,
        }
    }

    pub fn render(&self, context: &RenderContext) -> String {
        match self {
            OutputWriter::Default => render_text_notice(context),
            OutputWriter::Html => render_html_notice(context),
            OutputWriter::Custom(render) => render(context),
        }
    }
}

impl fmt::Debug for OutputWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputWriter::Default => f.write_str("OutputWriter::Default"),
            OutputWriter::Html => f.write_str("OutputWriter::Html"),
            OutputWriter::Custom(_) => f.write_str("OutputWriter::Custom(..)"),
        }
    }
}

/// The `default` writer: one plain-text block per dependency.
pub fn render_text_notice(context: &RenderContext) -> String {
    let mut output = String::from("THIRD-PARTY SOFTWARE NOTICES AND INFORMATION\n");
    let separator = "-".repeat(SEPARATOR_WIDTH);

    for dependency in &context.dependencies {
        output.push('\n');
        output.push_str(&separator);
        output.push('\n');

        output.push_str(&dependency.name);
        if let Some(version) = &dependency.version {
            output.push_str(&format!(" {}", version));
        }
        output.push('\n');

        if let Some(author) = &dependency.author {
            output.push_str(&format!("Author: {}\n", author));
        }
        if let Some(repository) = &dependency.repository {
            output.push_str(&format!("Repository: {}\n", repository));
        }
        if let Some(homepage) = &dependency.homepage {
            output.push_str(&format!("Homepage: {}\n", homepage));
        }
        if let Some(license_name) = &dependency.license_name {
            output.push_str(&format!("License: {}\n", license_name));
        }
        if let Some(license_text) = &dependency.license_text {
            output.push('\n');
            output.push_str(license_text);
            output.push('\n');
        }
    }

    output
}

/// The `html` writer: a minimal standalone page, one section per dependency.
pub fn render_html_notice(context: &RenderContext) -> String {
    let mut output = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Third-party notices</title>\n</head>\n<body>\n\
         <h1>Third-party notices</h1>\n",
    );

    for dependency in &context.dependencies {
        output.push_str("<section>\n");
        output.push_str(&format!("<h2>{}", escape_html(&dependency.name)));
        if let Some(version) = &dependency.version {
            output.push_str(&format!(" {}", escape_html(version)));
        }
        output.push_str("</h2>\n");

        if let Some(author) = &dependency.author {
            output.push_str(&format!("<p>Author: {}</p>\n", escape_html(author)));
        }
        if let Some(repository) = &dependency.repository {
            output.push_str(&format!(
                "<p>Repository: {}</p>\n",
                escape_html(repository)
            ));
        }
        if let Some(homepage) = &dependency.homepage {
            output.push_str(&format!("<p>Homepage: {}</p>\n", escape_html(homepage)));
        }
        if let Some(license_name) = &dependency.license_name {
            output.push_str(&format!("<p>License: {}</p>\n", escape_html(license_name)));
        }
        if let Some(license_text) = &dependency.license_text {
            output.push_str(&format!("<pre>{}</pre>\n", escape_html(license_text)));
        }
        output.push_str("</section>\n");
    }

    output.push_str("</body>\n</html>\n");
    output
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
