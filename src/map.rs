/// Leaflet map page for lightning strikes
///
/// The page draws the display bounds, a center marker and one marker per
/// strike. Strike data is embedded as JSON inside a `<script>` block.
use serde::Serialize;

use crate::bounds::GeoBounds;
use crate::normalize::StrikeRecord;

const GROUND_STRIKE_TYPE: &str = "G";

#[derive(Debug, Serialize)]
struct MapMarker<'a> {
    lat: f64,
    lng: f64,
    #[serde(rename = "type")]
    strike_type: &'a str,
    description: &'a str,
    datetime: Option<&'a str>,
    color: &'static str,
}

/// Red for cloud-to-ground strikes, orange for everything else
pub fn marker_color(strike_type: &str) -> &'static str {
    if strike_type == GROUND_STRIKE_TYPE {
        "red"
    } else {
        "orange"
    }
}

/// Serialize markers so the result can sit inside a `<script>` element.
fn markers_json(strikes: &[StrikeRecord]) -> String {
    let markers: Vec<MapMarker<'_>> = strikes
        .iter()
        .map(|s| MapMarker {
            lat: s.latitude,
            lng: s.longitude,
            strike_type: &s.strike_type,
            description: &s.description,
            datetime: s.datetime.as_deref(),
            color: marker_color(&s.strike_type),
        })
        .collect();

    // Serializing plain structs of strings and floats cannot fail
    let json = serde_json::to_string(&markers).unwrap_or_else(|_| "[]".to_string());
    escape_for_script(&json)
}

fn escape_for_script(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

pub fn render_map_page(strikes: &[StrikeRecord], bounds: &GeoBounds) -> String {
    let (center_lat, center_lon) = bounds.center();
    let markers = markers_json(strikes);
    let count = strikes.len();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Singapore Lightning Map</title>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <style>
        #map {{ height: 600px; width: 100%; }}
        .info {{ padding: 10px; background: white; margin-bottom: 10px; border-radius: 5px; }}
    </style>
</head>
<body>
    <div class="info">
        <h3>Singapore Lightning Detection Map</h3>
        <p>Showing {count} lightning strikes. Red markers = ground strikes, orange markers = cloud strikes.</p>
    </div>
    <div id="map"></div>
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script>
        var map = L.map('map').setView([{center_lat}, {center_lon}], 11);
        L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
            attribution: '&copy; OpenStreetMap contributors'
        }}).addTo(map);

        L.rectangle([[{lat_min}, {lon_min}], [{lat_max}, {lon_max}]], {{color: 'blue', weight: 2, fill: false}})
            .addTo(map)
            .bindPopup('Singapore Boundary');

        L.circleMarker([{center_lat}, {center_lon}], {{color: 'green', radius: 6}})
            .addTo(map)
            .bindPopup('Singapore Center');

        function escapeHtml(value) {{
            var div = document.createElement('div');
            div.textContent = value == null ? 'Unknown' : String(value);
            return div.innerHTML;
        }}

        var lightningMarkers = {markers};

        lightningMarkers.forEach(function(strike) {{
            L.circleMarker([strike.lat, strike.lng], {{color: strike.color, radius: 7, fillOpacity: 0.8}})
                .addTo(map)
                .bindPopup('<b>Lightning Strike</b><br>'
                    + 'Type: ' + escapeHtml(strike.type) + ' (' + escapeHtml(strike.description) + ')<br>'
                    + 'Time: ' + escapeHtml(strike.datetime) + '<br>'
                    + 'Coordinates: ' + strike.lat.toFixed(4) + ', ' + strike.lng.toFixed(4));
        }});

        if (lightningMarkers.length > 0) {{
            var group = L.featureGroup(lightningMarkers.map(function(strike) {{
                return L.marker([strike.lat, strike.lng]);
            }}));
            map.fitBounds(group.getBounds().pad(0.1));
        }}
    </script>
</body>
</html>
"#,
        lat_min = bounds.lat_min,
        lat_max = bounds.lat_max,
        lon_min = bounds.lon_min,
        lon_max = bounds.lon_max,
    )
}
