use crate::layout::Layout;
use serde_json::{Value, json};

/// Serialize a `Layout` as a JSON object `{ pages, meta }` (array-of-pages style).
///
/// Keys are stringified with `ToString`, so any key type that displays can be exported.
pub fn to_json<K: ToString>(layout: &Layout<K>) -> Value {
    let pages_val = layout
        .pages
        .iter()
        .map(|p| {
            let placements: Vec<Value> = p
                .placements
                .iter()
                .map(|pl| {
                    json!({
                        "key": pl.key.to_string(),
                        "x": pl.rect.x,
                        "y": pl.rect.y,
                        "w": pl.rect.w,
                        "h": pl.rect.h,
                        "rotated": pl.rotated,
                    })
                })
                .collect();
            json!({
                "id": p.id,
                "width": p.width,
                "height": p.height,
                "placements": placements,
            })
        })
        .collect::<Vec<_>>();

    let (width, height) = layout
        .pages
        .first()
        .map(|p| (p.width, p.height))
        .unwrap_or((0, 0));
    json!({
        "pages": pages_val,
        "meta": {
            "app": "rectbin",
            "version": env!("CARGO_PKG_VERSION"),
            "algorithm": layout.algorithm.label(),
            "page_size": { "w": width, "h": height },
        },
    })
}

/// Like `to_json` but flattens placements into an object keyed by name.
/// Shape: `{ placements: { key: { page, x, y, w, h, rotated } }, meta }`.
/// Duplicate keys keep the last placement.
pub fn to_json_hash<K: ToString>(layout: &Layout<K>) -> Value {
    let mut placements = serde_json::Map::new();
    for page in &layout.pages {
        for pl in &page.placements {
            placements.insert(
                pl.key.to_string(),
                json!({
                    "page": page.id,
                    "x": pl.rect.x,
                    "y": pl.rect.y,
                    "w": pl.rect.w,
                    "h": pl.rect.h,
                    "rotated": pl.rotated,
                }),
            );
        }
    }
    let mut out = to_json(layout);
    if let Some(obj) = out.as_object_mut() {
        obj.remove("pages");
        obj.insert("placements".into(), Value::Object(placements));
    }
    out
}
