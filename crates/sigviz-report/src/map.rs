//! Interactive Leaflet maps of signal samples and coverage gaps.
//!
//! The generated page is self-contained apart from the Leaflet assets, which
//! load from a CDN. Marker data is embedded as JSON and drawn client-side on a
//! canvas renderer, so tens of thousands of markers stay responsive.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use sigviz_analysis::QualityTier;
use sigviz_core::{BandCatalog, BandId, LocationPoint, SignalSample};

use crate::error::RenderError;

const DOWNSAMPLE_SEED: u64 = 42;
const NO_SIGNAL_COLOR: &str = "black";
const SAMPLE_RADIUS: u8 = 5;
const NO_SIGNAL_RADIUS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMode {
    /// Samples colored by quality tier.
    Quality,
    /// Samples colored by band; unknown-band samples are left off.
    Bands,
}

impl MapMode {
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            MapMode::Quality => "network_quality_map.html",
            MapMode::Bands => "network_bands_map.html",
        }
    }

    fn title(self) -> &'static str {
        match self {
            MapMode::Quality => "Signal Quality",
            MapMode::Bands => "Frequency Bands",
        }
    }
}

/// Caps on how many markers one map may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapLimits {
    pub max_points: usize,
    pub max_gap_points: usize,
}

impl Default for MapLimits {
    fn default() -> Self {
        Self {
            max_points: 50_000,
            max_gap_points: 30_000,
        }
    }
}

#[derive(Debug, Serialize)]
struct Marker {
    lat: f64,
    lon: f64,
    color: String,
    radius: u8,
    opacity: f64,
    popup: String,
}

#[derive(Debug, Serialize)]
struct LegendEntry {
    color: String,
    label: String,
}

#[derive(Debug, Serialize)]
struct MapPayload {
    legend_title: &'static str,
    bounds: [[f64; 2]; 2],
    legend: Vec<LegendEntry>,
    markers: Vec<Marker>,
}

/// Escape text for inclusion in HTML element content or attributes.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Keep at most `limit` items, chosen by a random sample seeded with `seed`.
///
/// Survivors keep their original relative order. The same input, limit and
/// seed always select the same items.
#[must_use]
pub fn downsample<T>(items: Vec<T>, limit: usize, seed: u64) -> Vec<T> {
    if items.len() <= limit {
        return items;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut keep = rand::seq::index::sample(&mut rng, items.len(), limit).into_vec();
    keep.sort_unstable();

    let mut keep = keep.into_iter().peekable();
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            if keep.peek() == Some(&i) {
                keep.next();
                Some(item)
            } else {
                None
            }
        })
        .collect()
}

fn popup_row(out: &mut String, label: &str, value: &str) {
    out.push_str("<tr><td style=\"font-weight:bold;padding:2px;\">");
    out.push_str(label);
    out.push_str("</td><td style=\"padding:2px;\">");
    out.push_str(value);
    out.push_str("</td></tr>");
}

fn popup(rows: &[(&str, String)]) -> String {
    let mut out = String::from(
        "<div style=\"min-width:200px;font-family:sans-serif;font-size:12px;\">\
         <table style=\"width:100%;border-collapse:collapse;\">",
    );
    for (label, value) in rows {
        popup_row(&mut out, label, value);
    }
    out.push_str("</table></div>");
    out
}

fn sample_popup(sample: &SignalSample) -> String {
    popup(&[
        (
            "Time:",
            escape_html(&sample.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
        (
            "Type:",
            escape_html(sample.network_type.as_deref().unwrap_or("Unknown")),
        ),
        ("Band:", escape_html(&sample.band.to_string())),
        ("Signal:", format!("{} dBm", sample.signal_dbm)),
        ("Lat:", format!("{:.6}", sample.latitude)),
        ("Lon:", format!("{:.6}", sample.longitude)),
    ])
}

fn gap_popup(point: &LocationPoint) -> String {
    popup(&[
        (
            "Time:",
            escape_html(&point.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
        (
            "Status:",
            "<span style=\"color:red;\">No signal (dead zone)</span>".to_string(),
        ),
        ("Lat:", format!("{:.6}", point.latitude)),
        ("Lon:", format!("{:.6}", point.longitude)),
    ])
}

fn legend(mode: MapMode, samples: &[&SignalSample], catalog: &BandCatalog) -> Vec<LegendEntry> {
    let entry = |color: &str, label: String| LegendEntry {
        color: color.to_string(),
        label,
    };

    let mut entries: Vec<LegendEntry> = match mode {
        MapMode::Quality => [QualityTier::Good, QualityTier::Fair, QualityTier::Poor]
            .into_iter()
            .map(|tier| entry(tier.color(), tier.label().to_string()))
            .collect(),
        MapMode::Bands => {
            let present: BTreeSet<BandId> = samples.iter().map(|s| s.band).collect();
            let mut entries = Vec::new();
            let mut other_color = None;
            for band in present {
                match catalog.get(band) {
                    Some(known) => entries.push(entry(
                        &known.color,
                        format!("{band} ({})", known.frequency),
                    )),
                    None => other_color = Some(catalog.color(band)),
                }
            }
            if let Some(color) = other_color {
                entries.push(entry(color, "Other band".to_string()));
            }
            entries
        }
    };

    entries.push(entry(NO_SIGNAL_COLOR, "No signal".to_string()));
    entries
}

fn bounds(markers: &[Marker]) -> [[f64; 2]; 2] {
    let mut min = [f64::INFINITY, f64::INFINITY];
    let mut max = [f64::NEG_INFINITY, f64::NEG_INFINITY];
    for m in markers {
        min[0] = min[0].min(m.lat);
        min[1] = min[1].min(m.lon);
        max[0] = max[0].max(m.lat);
        max[1] = max[1].max(m.lon);
    }
    [min, max]
}

/// Render one map page.
///
/// `samples` are the valid samples; `gaps` are the location points classified
/// "confirmed no signal". Returns `Ok(None)` when there is nothing to plot.
///
/// # Errors
///
/// Returns [`RenderError::Serialize`] if the marker data cannot be encoded.
pub fn render_map(
    mode: MapMode,
    samples: &[&SignalSample],
    gaps: &[&LocationPoint],
    catalog: &BandCatalog,
    limits: MapLimits,
) -> Result<Option<String>, RenderError> {
    let plotted: Vec<&SignalSample> = match mode {
        MapMode::Quality => samples.to_vec(),
        MapMode::Bands => samples
            .iter()
            .copied()
            .filter(|s| s.band != BandId::Unknown)
            .collect(),
    };

    if plotted.is_empty() && gaps.is_empty() {
        tracing::warn!(map = mode.file_name(), "nothing to plot; map not generated");
        return Ok(None);
    }

    if plotted.len() > limits.max_points {
        tracing::info!(
            map = mode.file_name(),
            from = plotted.len(),
            to = limits.max_points,
            "downsampling signal markers"
        );
    }
    if gaps.len() > limits.max_gap_points {
        tracing::info!(
            map = mode.file_name(),
            from = gaps.len(),
            to = limits.max_gap_points,
            "downsampling no-signal markers"
        );
    }
    let plotted = downsample(plotted, limits.max_points, DOWNSAMPLE_SEED);
    let gaps = downsample(gaps.to_vec(), limits.max_gap_points, DOWNSAMPLE_SEED);

    let mut markers: Vec<Marker> = plotted
        .iter()
        .map(|s| Marker {
            lat: s.latitude,
            lon: s.longitude,
            color: match mode {
                MapMode::Quality => QualityTier::classify(s.signal_dbm).color().to_string(),
                MapMode::Bands => catalog.color(s.band).to_string(),
            },
            radius: SAMPLE_RADIUS,
            opacity: 0.7,
            popup: sample_popup(s),
        })
        .collect();
    markers.extend(gaps.iter().map(|p| Marker {
        lat: p.latitude,
        lon: p.longitude,
        color: NO_SIGNAL_COLOR.to_string(),
        radius: NO_SIGNAL_RADIUS,
        opacity: 0.5,
        popup: gap_popup(p),
    }));

    let payload = MapPayload {
        legend_title: mode.title(),
        bounds: bounds(&markers),
        legend: legend(mode, &plotted, catalog),
        markers,
    };

    // `</` inside a JSON string would otherwise close the script element.
    let json = serde_json::to_string(&payload)?.replace("</", "<\\/");

    let html = PAGE_TEMPLATE
        .replace("__TITLE__", &escape_html(mode.title()))
        .replace("__PAYLOAD__", &json);

    tracing::debug!(
        map = mode.file_name(),
        samples = plotted.len(),
        gaps = gaps.len(),
        "map rendered"
    );
    Ok(Some(html))
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>__TITLE__</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  html, body, #map { height: 100%; margin: 0; }
  .legend { background: white; opacity: 0.9; padding: 10px; border: 2px solid grey;
            font: 14px sans-serif; line-height: 20px; }
  .legend .dot { display: inline-block; width: 12px; height: 12px; border-radius: 50%;
                 margin-right: 6px; vertical-align: middle; }
</style>
</head>
<body>
<div id="map"></div>
<script>
const payload = __PAYLOAD__;

const map = L.map("map", { preferCanvas: true });
const road = L.tileLayer("https://mt1.google.com/vt/lyrs=m&x={x}&y={y}&z={z}", {
  attribution: "Google", maxZoom: 20
});
const satellite = L.tileLayer("https://mt1.google.com/vt/lyrs=s&x={x}&y={y}&z={z}", {
  attribution: "Google", maxZoom: 20
});
road.addTo(map);
L.control.layers({ "Google Maps": road, "Google Satellite": satellite }).addTo(map);

for (const m of payload.markers) {
  L.circleMarker([m.lat, m.lon], {
    radius: m.radius, color: m.color, fillColor: m.color, fill: true, fillOpacity: m.opacity
  }).bindPopup(m.popup).addTo(map);
}

map.fitBounds(payload.bounds, { padding: [20, 20], maxZoom: 18 });

const legend = L.control({ position: "bottomleft" });
legend.onAdd = function () {
  const div = L.DomUtil.create("div", "legend");
  const title = document.createElement("b");
  title.textContent = payload.legend_title;
  div.appendChild(title);
  for (const entry of payload.legend) {
    const row = document.createElement("div");
    const dot = document.createElement("span");
    dot.className = "dot";
    dot.style.background = entry.color;
    row.appendChild(dot);
    row.appendChild(document.createTextNode(entry.label));
    div.appendChild(row);
  }
  return div;
};
legend.addTo(map);
</script>
</body>
</html>
"#;
