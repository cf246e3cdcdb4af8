//! Server-side HTML pages
//!
//! Plain `format!` rendering; every user-provided string goes through
//! [`escape`] before it is written into markup.

use crate::chart::RouteChart;
use crate::models::{DayCount, Metric, RouteForecast};

const STYLE: &str = "body{padding:3em;font-family:sans-serif;max-width:60em}\
h1{color:#1f6fb2}table{border-collapse:collapse;margin-bottom:2em}\
td,th{border:1px solid #ccc;padding:.3em .8em}.error{color:#b00020}";

/// Escape text for use in HTML element content and attribute values
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

/// Home page with the route form
#[must_use]
pub fn home_page(default_days: DayCount, default_metric: Metric) -> String {
    let mut days = String::new();
    for count in [DayCount::One, DayCount::Three, DayCount::Five] {
        let selected = if count == default_days { " selected" } else { "" };
        days.push_str(&format!(r#"<option value="{count}"{selected}>{count}</option>"#));
    }

    let mut metrics = String::new();
    for metric in Metric::ALL {
        let selected = if metric == default_metric { " selected" } else { "" };
        metrics.push_str(&format!(
            r#"<option value="{}"{selected}>{}</option>"#,
            metric.as_str(),
            metric.title()
        ));
    }

    let body = format!(
        r#"<h1>Route Weather</h1>
<p>Weather forecasts for the start, stops and destination of your trip.</p>
<form method="post" action="/route-weather">
<p><label>Start <input name="start" required></label></p>
<p><label>Stops (comma separated) <input name="stops"></label></p>
<p><label>End <input name="end" required></label></p>
<p><label>Days <select name="days">{days}</select></label></p>
<p><label>Metric <select name="metric">{metrics}</select></label></p>
<p><button type="submit">Show weather</button></p>
</form>"#
    );
    page("Route Weather", &body)
}

/// Result page: one table per city plus the selected metric summary
#[must_use]
pub fn route_page(route: &RouteForecast, chart: &RouteChart) -> String {
    let mut body = String::new();
    let heading = match (route.start(), route.end()) {
        (Some(start), Some(end)) => format!("{} → {}", start.city.name, end.city.name),
        _ => "Route".to_string(),
    };
    body.push_str(&format!("<h1>{}</h1>", escape(&heading)));

    if !route.stops().is_empty() {
        let stops: Vec<String> = route.stops().iter().map(|s| escape(&s.city.name)).collect();
        body.push_str(&format!("<p>Stops: {}</p>", stops.join(", ")));
    }
    if let Some(total) = chart.total_distance_km() {
        body.push_str(&format!("<p>Distance: {total:.0} km</p>"));
    }

    for forecast in &route.cities {
        body.push_str(&format!(
            "<h2>{}</h2><table><tr><th>Date</th><th>Min</th><th>Max</th>\
             <th>Precipitation</th><th>Wind</th></tr>",
            escape(&forecast.city.label())
        ));
        for day in &forecast.days {
            let precipitation = if day.precipitation.expected { "yes" } else { "no" };
            body.push_str(&format!(
                "<tr><td>{}</td><td>{:.1}°C</td><td>{:.1}°C</td><td>{} ({}%)</td><td>{:.1} km/h</td></tr>",
                day.date.format("%a %d %b"),
                day.min_temp,
                day.max_temp,
                precipitation,
                day.precipitation.probability,
                day.wind_speed
            ));
        }
        body.push_str("</table>");
    }

    body.push_str(&format!("<h2>{}</h2><table><tr><th>City</th>", escape(&chart.title)));
    if let Some(first) = chart.series.first() {
        for point in &first.points {
            body.push_str(&format!("<th>{}</th>", point.x.format("%d %b")));
        }
    }
    body.push_str("</tr>");
    for series in &chart.series {
        body.push_str(&format!("<tr><td>{}</td>", escape(&series.label)));
        for point in &series.points {
            body.push_str(&format!("<td>{:.1}</td>", point.y));
        }
        body.push_str("</tr>");
    }
    body.push_str(r#"</table><p><a href="/">New route</a></p>"#);

    page(&heading, &body)
}

/// Error page carrying a human-readable message
#[must_use]
pub fn error_page(message: &str) -> String {
    let body = format!(
        r#"<h1>Route Weather</h1><p class="error">{}</p><p><a href="/">Back</a></p>"#,
        escape(message)
    );
    page("Route Weather: error", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{City, CityForecast, ForecastDay, Precipitation};
    use chrono::NaiveDate;

    fn sample_route() -> RouteForecast {
        let day = ForecastDay {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            min_temp: 7.0,
            max_temp: 18.25,
            precipitation: Precipitation {
                expected: true,
                probability: 40,
            },
            wind_speed: 9.0,
        };
        RouteForecast::new(
            DayCount::One,
            vec![
                CityForecast {
                    city: City::new("Paris", "623"),
                    days: vec![day.clone()],
                },
                CityForecast {
                    city: City::new("<Berlin>", "178087"),
                    days: vec![day],
                },
            ],
        )
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;y&#39;"
        );
    }

    #[test]
    fn test_home_page_selects_defaults() {
        let html = home_page(DayCount::Five, Metric::WindSpeed);
        assert!(html.contains(r#"<option value="5" selected>5</option>"#));
        assert!(html.contains(r#"<option value="wind_speed" selected>Wind speed</option>"#));
        assert!(html.contains(r#"action="/route-weather""#));
    }

    #[test]
    fn test_route_page_escapes_city_names() {
        let route = sample_route();
        let chart = RouteChart::build(&route, Metric::MaxTemp);
        let html = route_page(&route, &chart);

        assert!(html.contains("Paris → &lt;Berlin&gt;"));
        assert!(!html.contains("<Berlin>"));
        assert!(html.contains("<td>18.2</td>") || html.contains("<td>18.3</td>"));
        assert!(html.contains("yes (40%)"));
    }

    #[test]
    fn test_route_page_metric_table() {
        let route = sample_route();
        let chart = RouteChart::build(&route, Metric::Precipitation);
        let html = route_page(&route, &chart);

        assert!(html.contains("<h2>Precipitation probability (%)</h2><table><tr><th>City</th><th>01 May</th></tr>"));
        assert!(html.contains("<tr><td>Paris</td><td>40.0</td></tr>"));
        assert!(html.contains("<tr><td>&lt;Berlin&gt;</td><td>40.0</td></tr>"));
    }

    #[test]
    fn test_error_page() {
        let html = error_page("Nothing found for city 'Atlantis'.");
        assert!(html.contains("Nothing found for city &#39;Atlantis&#39;."));
    }
}
