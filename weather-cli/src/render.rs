//! Human-friendly text for each view state.

use cityweather_core::{Phase, ViewState, WeatherReport};

pub fn render(state: &ViewState) -> String {
    match &state.phase {
        Phase::Idle => "Enter a city name to see its current weather.".to_string(),
        Phase::Loading => "Loading...".to_string(),
        Phase::Error(err) => format!("Error: {err}"),
        Phase::Success(report) => render_report(report),
    }
}

fn render_report(report: &WeatherReport) -> String {
    let location = &report.location;
    let current = &report.current;

    let mut lines = vec![location.name.clone()];
    if location.region.is_empty() {
        lines.push(location.country.clone());
    } else {
        lines.push(format!("{}, {}", location.region, location.country));
    }
    lines.push(String::new());
    lines.push(format!(
        "{:.1}°C ({:.1}°F)  {}",
        current.temperature_c, current.temperature_f, current.condition.text
    ));
    lines.push(format!(
        "Feels like: {:.1}°C ({:.1}°F)",
        current.feels_like_c, current.feels_like_f
    ));
    lines.push(format!("Humidity:   {}%", current.humidity_pct));
    lines.push(format!("Wind:       {:.1} km/h", current.wind_kph));
    lines.push(format!("Local time: {}", location.localtime));

    lines.join("\n")
}
