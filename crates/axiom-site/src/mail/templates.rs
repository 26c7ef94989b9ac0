//! HTML bodies for the notification emails.
//!
//! Every submitted value is escaped before it is placed in markup.

use axiom_common::{ContactSubmission, EmailMessage, PilotApplication};

const WRAPPER_STYLE: &str = "font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;";
const HEADING_STYLE: &str = "color: #0A192F; border-bottom: 3px solid #64FFDA; padding-bottom: 10px;";
const SECTION_STYLE: &str = "background-color: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0;";
const SECTION_HEADING_STYLE: &str = "color: #0A192F; margin-top: 0;";
const BODY_TEXT_STYLE: &str = "white-space: pre-wrap; line-height: 1.6;";
const CALLOUT_STYLE: &str = "margin-top: 30px; padding: 15px; background-color: rgba(100, 255, 218, 0.1); border-left: 4px solid #64FFDA; border-radius: 4px;";

/// Escape text for an HTML text node or attribute value
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

/// Subject lines are plain text but must stay on one line
fn subject_line(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn field(label: &str, value: &str) -> String {
    format!("<p><strong>{}:</strong> {}</p>", label, escape_html(value.trim()))
}

fn render(
    title: &str,
    info_heading: &str,
    info: &[String],
    body_heading: &str,
    body: &str,
    callout: &str,
) -> String {
    let mut html = format!(r#"<div style="{WRAPPER_STYLE}">"#);
    html.push_str(&format!(r#"<h2 style="{HEADING_STYLE}">{title}</h2>"#));

    html.push_str(&format!(r#"<div style="{SECTION_STYLE}">"#));
    html.push_str(&format!(r#"<h3 style="{SECTION_HEADING_STYLE}">{info_heading}</h3>"#));
    for line in info {
        html.push_str(line);
    }
    html.push_str("</div>");

    html.push_str(&format!(r#"<div style="{SECTION_STYLE}">"#));
    html.push_str(&format!(r#"<h3 style="{SECTION_HEADING_STYLE}">{body_heading}</h3>"#));
    html.push_str(&format!(r#"<p style="{BODY_TEXT_STYLE}">{}</p>"#, escape_html(body)));
    html.push_str("</div>");

    html.push_str(&format!(
        r#"<div style="{CALLOUT_STYLE}"><p style="margin: 0; color: #0A192F;">{callout}</p></div>"#
    ));
    html.push_str("</div>");
    html
}

/// Notification for a contact form submission; replies go to the submitter.
pub fn contact_email(from: &str, to: &str, submission: &ContactSubmission) -> EmailMessage {
    let name = format!(
        "{} {}",
        submission.first_name.trim(),
        submission.last_name.trim()
    );
    let email = submission.email.trim();

    let mut info = vec![field("Name", &name), field("Email", email)];
    if let Some(company) = submission.company() {
        info.push(field("Company", company));
    }
    info.push(field("Subject", &submission.subject));

    let callout = format!(
        "<strong>Response Required:</strong> Please respond to {} within 24 hours.",
        escape_html(email)
    );

    EmailMessage {
        from: from.to_string(),
        to: vec![to.to_string()],
        subject: format!("Contact Form: {}", subject_line(&submission.subject)),
        html: render(
            "New Contact Form Submission",
            "Contact Information",
            &info,
            "Message",
            &submission.message,
            &callout,
        ),
        reply_to: Some(email.to_string()),
    }
}

/// Notification for a pilot program application. No reply-to is set.
pub fn pilot_email(from: &str, to: &str, application: &PilotApplication) -> EmailMessage {
    let info = vec![
        field("Full Name", &application.full_name),
        field("Email", &application.work_email),
        field("Company", &application.company_name),
        field("Role", &application.role),
    ];

    EmailMessage {
        from: from.to_string(),
        to: vec![to.to_string()],
        subject: format!(
            "New Pilot Program Application - {}",
            subject_line(&application.company_name)
        ),
        html: render(
            "New Pilot Program Application",
            "Applicant Information",
            &info,
            "Data Requirements",
            &application.data_needs,
            "<strong>Next Steps:</strong> Review the application and respond within 24 hours to maintain our professional standard.",
        ),
        reply_to: None,
    }
}
