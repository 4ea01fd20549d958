//! Dashboard pages and breadcrumb trail.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    #[default]
    Overview,
    Temperature,
    Wind,
    Humidity,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::Overview,
        Route::Temperature,
        Route::Wind,
        Route::Humidity,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Overview => "/",
            Self::Temperature => "/temperature",
            Self::Wind => "/wind",
            Self::Humidity => "/humidity",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Temperature => "Temperature",
            Self::Wind => "Wind",
            Self::Humidity => "Humidity",
        }
    }

    /// Exact path match, ignoring a trailing slash.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|r| r.path() == normalized)
    }

    /// Accepts a page name (`wind`) as well as a path (`/wind`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "overview" | "" => Some(Self::Overview),
            "temperature" | "temp" => Some(Self::Temperature),
            "wind" => Some(Self::Wind),
            "humidity" => Some(Self::Humidity),
            other => Self::from_path(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub name: String,
    pub path: String,
    pub is_last: bool,
}

/// `"/air-quality"` becomes `Overview > Air Quality`.
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut crumbs = vec![Breadcrumb {
        name: "Overview".to_string(),
        path: "/".to_string(),
        is_last: segments.is_empty(),
    }];

    for (index, segment) in segments.iter().enumerate() {
        crumbs.push(Breadcrumb {
            name: title_case(segment),
            path: format!("/{}", segments[..=index].join("/")),
            is_last: index == segments.len() - 1,
        });
    }

    crumbs
}

fn title_case(segment: &str) -> String {
    segment
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/wind/"), Some(Route::Wind));
        assert_eq!(Route::from_path("/radar"), None);
    }

    #[test]
    fn test_parse_accepts_names() {
        assert_eq!(Route::parse("Humidity"), Some(Route::Humidity));
        assert_eq!(Route::parse("/temperature"), Some(Route::Temperature));
        assert_eq!(Route::parse("radar"), None);
    }

    #[test]
    fn test_root_breadcrumbs() {
        let crumbs = breadcrumbs("/");
        assert_eq!(crumbs.len(), 1);
        assert_eq!(crumbs[0].name, "Overview");
        assert!(crumbs[0].is_last);
    }

    #[test]
    fn test_nested_breadcrumbs_are_title_cased() {
        let crumbs = breadcrumbs("/wind/gust-history");
        let names: Vec<&str> = crumbs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Overview", "Wind", "Gust History"]);
        assert_eq!(crumbs[2].path, "/wind/gust-history");
        assert!(!crumbs[1].is_last);
        assert!(crumbs[2].is_last);
    }
}
