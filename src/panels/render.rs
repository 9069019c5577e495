//! Markup for each panel. Every function here is pure; empty payloads render a short
//! "no data" paragraph instead of an empty container.

use std::fmt::Write as _;

use chrono::DateTime;

use crate::panels::error::{PanelError, PanelResult};
use crate::panels::model::{
    ChatHistoryResponse, ClientsResponse, ConversationMessage, FaqsResponse, MonthlyReport,
};
use crate::panels::region::BarChart;
use crate::util::escape_html;

pub const LOADING_MARKUP: &str = r#"<div class="loading-spinner">Loading...</div>"#;
pub const FAILURE_MARKUP: &str = r#"<p class="error-message">Failed to load data.</p>"#;

pub const NO_CLIENTS_MESSAGE: &str = "No clients available.";
pub const NO_FAQS_MESSAGE: &str = "No FAQs found.";
pub const NO_CONVERSATIONS_MESSAGE: &str = "No conversation history available.";
pub const NO_REPORT_MESSAGE: &str = "No report data available.";

pub const REPORT_DATASET_LABEL: &str = "Conversations per Month";
pub const REPORT_BAR_COLOR: &str = "#007bff";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn empty_message(text: &str) -> String {
    format!("<p>{}</p>", escape_html(text))
}

pub fn render_clients(data: &ClientsResponse) -> String {
    if data.tenants.is_empty() {
        return empty_message(NO_CLIENTS_MESSAGE);
    }
    let mut html = String::from("<ul>");
    for tenant in &data.tenants {
        let _ = write!(
            html,
            "<li><strong>{}</strong> (ID: {})</li>",
            escape_html(&tenant.tenant_name),
            escape_html(&tenant.tenant_id)
        );
    }
    html.push_str("</ul>");
    html
}

pub fn render_faqs(data: &FaqsResponse) -> String {
    if data.faqs.is_empty() {
        return empty_message(NO_FAQS_MESSAGE);
    }
    let mut html = String::from("<table><tr><th>ID</th><th>Question</th><th>Answer</th></tr>");
    for faq in &data.faqs {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&faq.id),
            escape_html(&faq.question),
            escape_html(&faq.answer)
        );
    }
    html.push_str("</table>");
    html
}

pub fn render_conversations(data: &ChatHistoryResponse) -> String {
    if data.conversations.is_empty() {
        return empty_message(NO_CONVERSATIONS_MESSAGE);
    }
    data.conversations.iter().map(render_message).collect()
}

fn render_message(message: &ConversationMessage) -> String {
    let (who, class) = if message.is_from_user() {
        ("You", "user-message")
    } else {
        ("Bot", "bot-message")
    };
    format!(
        "<div class=\"message-item {class}\"><div class=\"message-header\"><span>{who}</span><span>{}</span></div><div>{}</div></div>",
        format_timestamp(message.timestamp),
        escape_html(&message.message_text)
    )
}

/// Unix seconds as `YYYY-MM-DD HH:MM:SS` in UTC. Out-of-range values render as the raw
/// number.
pub fn format_timestamp(seconds: f64) -> String {
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9) as u32;
    if !whole.is_finite() || whole.abs() > i64::MAX as f64 {
        return seconds.to_string();
    }
    match DateTime::from_timestamp(whole as i64, nanos) {
        Some(at) => at.format(TIMESTAMP_FORMAT).to_string(),
        None => seconds.to_string(),
    }
}

/// Chart for the monthly report; `None` when there is nothing to plot.
pub fn report_chart(report: &MonthlyReport) -> PanelResult<Option<BarChart>> {
    if report.labels.len() != report.values.len() {
        return Err(PanelError::Decode(format!(
            "report has {} labels but {} values",
            report.labels.len(),
            report.values.len()
        )));
    }
    if report.is_empty() {
        return Ok(None);
    }
    Ok(Some(BarChart {
        dataset_label: REPORT_DATASET_LABEL.to_string(),
        labels: report.labels.clone(),
        values: report.values.clone(),
        color: REPORT_BAR_COLOR.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::model::{Faq, Tenant};

    #[test]
    fn empty_payloads_render_no_data_messages() {
        assert_eq!(
            render_clients(&ClientsResponse::default()),
            "<p>No clients available.</p>"
        );
        assert_eq!(render_faqs(&FaqsResponse::default()), "<p>No FAQs found.</p>");
        assert_eq!(
            render_conversations(&ChatHistoryResponse::default()),
            "<p>No conversation history available.</p>"
        );
    }

    #[test]
    fn clients_render_as_list() {
        let data = ClientsResponse {
            tenants: vec![Tenant {
                tenant_id: "1".into(),
                tenant_name: "Acme".into(),
            }],
        };
        assert_eq!(
            render_clients(&data),
            "<ul><li><strong>Acme</strong> (ID: 1)</li></ul>"
        );
    }

    #[test]
    fn faq_text_is_escaped() {
        let data = FaqsResponse {
            faqs: vec![Faq {
                id: "3".into(),
                question: "<script>alert(1)</script>".into(),
                answer: "Tom & Jerry".into(),
            }],
        };
        let html = render_faqs(&data);
        assert!(html.starts_with("<table><tr><th>ID</th><th>Question</th><th>Answer</th></tr>"));
        assert!(html.contains("<td>&lt;script&gt;alert(1)&lt;/script&gt;</td>"));
        assert!(html.contains("<td>Tom &amp; Jerry</td>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn conversation_senders_are_labelled() {
        let data = ChatHistoryResponse {
            wa_id: None,
            conversations: vec![
                ConversationMessage {
                    sender: "user".into(),
                    message_text: "Hi".into(),
                    timestamp: 1_700_000_000.0,
                },
                ConversationMessage {
                    sender: "assistant".into(),
                    message_text: "Hello!".into(),
                    timestamp: 1_700_000_060.0,
                },
            ],
        };
        let html = render_conversations(&data);
        assert!(html.contains(
            r#"<div class="message-item user-message"><div class="message-header"><span>You</span><span>2023-11-14 22:13:20</span></div><div>Hi</div></div>"#
        ));
        assert!(html.contains(r#"<div class="message-item bot-message">"#));
        assert!(html.contains("<span>Bot</span><span>2023-11-14 22:14:20</span>"));
    }

    #[test]
    fn timestamps_tolerate_garbage() {
        assert_eq!(format_timestamp(0.0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(f64::NAN), "NaN");
    }

    #[test]
    fn report_series_must_line_up() {
        let report = MonthlyReport {
            labels: vec!["2024-01".into(), "2024-02".into()],
            values: vec![3.0],
        };
        assert!(matches!(report_chart(&report), Err(PanelError::Decode(_))));

        assert_eq!(report_chart(&MonthlyReport::default()), Ok(None));

        let chart = report_chart(&MonthlyReport {
            labels: vec!["2024-01".into()],
            values: vec![12.0],
        })
        .unwrap()
        .unwrap();
        assert_eq!(chart.dataset_label, "Conversations per Month");
        assert_eq!(chart.values, vec![12.0]);
    }
}
