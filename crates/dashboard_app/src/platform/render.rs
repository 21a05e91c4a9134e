use std::io::{self, Write};
use std::sync::Mutex;

use dashboard_core::{DashboardView, SearchPhase};
use dashboard_engine::StateObserver;

/// Prints the dashboard to a writer every time the store changes.
pub struct TerminalRenderer<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> StateObserver for TerminalRenderer<W> {
    fn state_changed(&self, view: &DashboardView) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        // Ignore write errors (stdout may be closed).
        for line in render(view) {
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();
    }
}

pub fn render(view: &DashboardView) -> Vec<String> {
    let mut lines = vec!["----".to_string()];

    if let Some(error) = &view.error {
        lines.push(format!("Error! {error}"));
    }
    if let Some(message) = view.search_message.as_deref().filter(|m| !m.is_empty()) {
        lines.push("Search Result:".to_string());
        lines.push(format!("  {message}"));
    }

    lines.push("Raw JSON Content (results.json):".to_string());
    lines.extend(indent(&view.raw_json));

    if let Some(payload) = &view.payload {
        lines.push("Processed Data:".to_string());
        let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
        lines.extend(indent(&pretty));
    }

    let status = match view.phase {
        SearchPhase::Idle => "idle",
        SearchPhase::Searching => "searching...",
        SearchPhase::Processing => "processing...",
    };
    lines.push(format!(
        "[query: {:?} | location: {:?} | {status}]",
        view.query, view.location
    ));
    lines
}

fn indent(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines().map(|line| format!("  {line}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_error_result_and_panels_in_order() {
        let view = DashboardView {
            query: "cafes".into(),
            location: "Seattle".into(),
            phase: SearchPhase::Idle,
            search_message: Some("3 results found".into()),
            payload: Some(json!({"count": 3})),
            raw_json: "{\n  \"count\": 3\n}".into(),
            error: Some("Error: boom".into()),
            ..DashboardView::default()
        };

        let lines = render(&view);
        let position = |needle: &str| lines.iter().position(|l| l.contains(needle)).unwrap();

        assert!(position("Error! Error: boom") < position("Search Result:"));
        assert!(position("Search Result:") < position("Raw JSON Content"));
        assert!(position("Raw JSON Content") < position("Processed Data:"));
        assert_eq!(lines.last().unwrap(), "[query: \"cafes\" | location: \"Seattle\" | idle]");
    }

    #[test]
    fn failed_fetch_shows_sentinel_and_hides_processed_panel() {
        let view = DashboardView {
            raw_json: dashboard_core::FETCH_FAILED_SENTINEL.into(),
            phase: SearchPhase::Searching,
            ..DashboardView::default()
        };

        let lines = render(&view);
        assert!(lines.contains(&"  Failed to fetch results.json".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Processed Data")));
        assert!(lines.last().unwrap().ends_with("searching...]"));
    }

    #[test]
    fn observer_writes_to_its_sink() {
        let renderer = TerminalRenderer::new(Vec::new());
        renderer.state_changed(&DashboardView::default());
        let written = String::from_utf8(renderer.out.into_inner().unwrap()).unwrap();
        assert!(written.contains("Raw JSON Content"));
    }
}
