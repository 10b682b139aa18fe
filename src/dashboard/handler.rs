//! HTTP handlers for dashboard routes

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use rust_embed::RustEmbed;
use std::fmt::Write;
use std::sync::Arc;

use crate::api::AppState;
use crate::dataset::DatasetSnapshot;
use crate::telemetry::{EngineAnalytics, WindowStats};

const ENGINE_MARKER: &str = "<!-- engine-summary -->";
const DATASET_MARKER: &str = "<!-- dataset-summary -->";
const INITIAL_DATA_MARKER: &str = "/* initial-data */";

/// Embedded dashboard assets from dashboard/ directory
#[derive(RustEmbed)]
#[folder = "dashboard/"]
struct DashboardAssets;

/// Serves the dashboard page with engine and dataset sections filled in
pub async fn dashboard_handler(State(state): State<Arc<AppState>>) -> Response {
    let Some(content) = DashboardAssets::get("index.html") else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Dashboard HTML not found").into_response();
    };
    let Ok(template) = std::str::from_utf8(&content.data) else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid HTML encoding").into_response();
    };

    let snapshot = state.dataset_snapshot().await;
    let analytics = state.telemetry.analytics();
    let window = state.telemetry.window();

    Html(render_dashboard(template, &analytics, &window, &snapshot)).into_response()
}

/// Fill the template markers.
pub fn render_dashboard(
    template: &str,
    analytics: &EngineAnalytics,
    window: &WindowStats,
    snapshot: &DatasetSnapshot,
) -> String {
    let initial_data = serde_json::json!({
        "engine": analytics,
        "window": window,
        "dataset": snapshot.report(),
    });

    template
        .replace(ENGINE_MARKER, &engine_section(analytics, window))
        .replace(DATASET_MARKER, &dataset_section(snapshot))
        // keep "</script>" inside string values from closing the tag
        .replace(
            INITIAL_DATA_MARKER,
            &initial_data.to_string().replace('<', "\\u003c"),
        )
}

fn engine_section(analytics: &EngineAnalytics, window: &WindowStats) -> String {
    let mut html = String::new();
    let _ = writeln!(
        html,
        "<p>Current Temperature: <span id=\"temp\">{:.1}</span> °C</p>",
        analytics.temp
    );
    let _ = writeln!(
        html,
        "<p>Current Energy: <span id=\"energy\">{:.1}</span> kW</p>",
        analytics.energy
    );
    let _ = writeln!(
        html,
        "<p>Average Temperature (last {} readings): <span id=\"avg-temp\">{:.1}</span> °C</p>",
        window.samples, window.avg_temp
    );
    let _ = writeln!(
        html,
        "<p>Max Energy (last {} readings): <span id=\"max-energy\">{:.1}</span> kW</p>",
        window.samples, window.max_energy
    );
    let _ = writeln!(
        html,
        "<p>Predicted Overheat: <span id=\"alert\" class=\"{}\">{}</span></p>",
        if analytics.alert { "alert" } else { "ok" },
        if analytics.alert { "YES" } else { "NO" }
    );
    html
}

fn dataset_section(snapshot: &DatasetSnapshot) -> String {
    let Some(summary) = snapshot.summary() else {
        return format!(
            "<p class=\"unavailable\">Dataset unavailable: {}</p>\n",
            escape_html(snapshot.reason().unwrap_or_default())
        );
    };

    let rows = [
        ("Rows", summary.rows.to_string()),
        ("Units", summary.units.to_string()),
        ("Sensors", summary.num_sensors.to_string()),
        ("Mean RUL", format!("{:.2}", summary.mean_rul)),
        ("Max RUL", format!("{:.0}", summary.max_rul)),
        ("Min RUL", format!("{:.0}", summary.min_rul)),
        (
            "Mean sensor degradation slope",
            format!("{:.6}", summary.mean_sensor_degradation_slope),
        ),
    ];

    let mut html = String::from("<table class=\"summary\">\n");
    for (label, value) in rows {
        let _ = writeln!(html, "<tr><th>{}</th><td>{}</td></tr>", label, value);
    }
    html.push_str("</table>\n");
    if let Some(source) = &snapshot.source {
        let _ = writeln!(
            html,
            "<p class=\"source\">Source: {} (loaded {})</p>",
            escape_html(&source.display().to_string()),
            snapshot.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Serves static assets (CSS, JS)
pub async fn assets_handler(Path(path): Path<String>) -> Response {
    match DashboardAssets::get(&path) {
        Some(content) => {
            let mime_type = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime_type.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Asset not found").into_response(),
    }
}
