//! Plain-text and HTML renderings of a submitted form.

use super::forms::SubmissionForm;
use crate::mail::EmailMessage;

/// Render a form. Values appear verbatim in the text body and escaped in
/// the HTML body.
pub fn compose<F: SubmissionForm>(form: &F) -> EmailMessage {
    let fields = form.fields();
    let heading = F::KIND.label();

    let mut text = format!("{}\n\n", heading);
    for (label, value) in &fields {
        text.push_str(&format!("{}: {}\n", label, value));
    }

    let mut html = format!("<h2>{}</h2>\n<table>\n", escape_html(heading));
    for (label, value) in &fields {
        html.push_str(&format!(
            "<tr><th align=\"left\">{}</th><td>{}</td></tr>\n",
            escape_html(label),
            escape_html(value).replace('\n', "<br>")
        ));
    }
    html.push_str("</table>\n");

    EmailMessage {
        subject: form.subject(),
        text,
        html,
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submissions::forms::ContactEnquiry;

    #[test]
    fn test_text_is_verbatim_and_html_escaped() {
        let enquiry = ContactEnquiry {
            name: "Tom & Jerry <Cargo>".to_string(),
            email: "tj@example.com".to_string(),
            message: "Line one\nLine two".to_string(),
            ..Default::default()
        };

        let message = compose(&enquiry);
        assert!(message.text.starts_with("Contact enquiry\n\n"));
        assert!(message.text.contains("Name: Tom & Jerry <Cargo>\n"));
        assert!(message.text.contains("Message: Line one\nLine two\n"));
        assert!(message.html.contains("Tom &amp; Jerry &lt;Cargo&gt;"));
        assert!(message.html.contains("Line one<br>Line two"));
        assert!(!message.html.contains("<Cargo>"));
    }
}
