//! Test helpers for writing recorded replays and domain tables.

use camino::Utf8Path;
use serde_json::{Value, json};

/// Write `contents` to `path`, creating the file.
pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// A click on Joe's Pizza as the map would report it.
pub(super) fn pizza_click() -> Value {
    json!({
        "type": "click",
        "features": [{
            "geometry": {"type": "Point", "coordinates": [-74.006, 40.7128]},
            "properties": {
                "name": "Joe's Pizza",
                "critical_flag": "Not Critical",
                "score": "13",
                "cuisine": "Pizza",
                "inspection_date": "2023-02-16T00:00:00.000"
            }
        }],
        "point": {"x": 400.0, "y": 300.0},
        "lngLat": {"lng": -74.006, "lat": 40.7128}
    })
}

/// Hover in, click Joe's Pizza, hover out.
pub(super) fn pizza_replay() -> Value {
    json!([{"type": "mouseenter"}, pizza_click(), {"type": "mouseleave"}])
}

/// Select Joe's Pizza and then close its popup.
pub(super) fn dismissed_replay() -> Value {
    json!([pizza_click(), {"type": "dismiss"}])
}

/// The features expected for Joe's Pizza with the built-in domain table.
pub(super) fn pizza_features() -> Value {
    json!([-74.006, 40.7128, 13.0, 0, "Pizza", 0.0, 2023])
}
