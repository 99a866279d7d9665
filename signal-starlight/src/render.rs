use signal_core::overlay::{LightOverlay, Overlay, SignalIndicator};

const INDICATOR_Y: u32 = 20;

/// Maps a light color label to an ffmpeg color name.
fn box_color(label: &str) -> &'static str {
    match label {
        "red" => "red",
        "yellow" => "yellow",
        "green" => "green",
        _ => "white",
    }
}

fn drawbox(light: &LightOverlay) -> String {
    format!(
        "drawbox=x={x}:y={y}:w={width}:h={height}:color={color}@1.0:t=2",
        x = light.x1,
        y = light.y1,
        width = light.x2 - light.x1,
        height = light.y2 - light.y1,
        color = box_color(&light.color),
    )
}

fn drawtext_label(light: &LightOverlay) -> String {
    let text = match &light.shape {
        Some(shape) => format!("{} {}", light.color, shape),
        None => light.color.clone(),
    };
    format!(
        "drawtext=text='{text}':x={x}:y={y}:fontcolor={color}",
        x = light.x1,
        y = light.y1.saturating_sub(12).max(0),
        color = box_color(&light.color),
    )
}

fn drawtext_indicator(indicator: &SignalIndicator) -> String {
    format!(
        "drawtext=text='{label}':x={x}:y={y}:fontcolor={color}",
        label = indicator.label,
        x = indicator.offset,
        y = INDICATOR_Y,
        color = if indicator.allowed { "green" } else { "red" },
    )
}

/// Renders an overlay as ffmpeg filter descriptions, one per drawn element.
pub fn overlay_filters(overlay: &Overlay) -> Vec<String> {
    let mut filters = Vec::with_capacity(overlay.lights.len() * 2 + overlay.indicators.len());
    for light in &overlay.lights {
        filters.push(drawbox(light));
        filters.push(drawtext_label(light));
    }
    filters.extend(overlay.indicators.iter().map(drawtext_indicator));
    filters
}
