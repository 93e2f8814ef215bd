//! Page chrome: navigation header and footer

use crate::{constants::BRAND_NAME, error::DashboardError};
use std::fmt;
use std::str::FromStr;

/// Top-level pages of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Cryptocurrencies,
    Market,
}

impl Route {
    /// All routes in navigation order
    pub fn all() -> &'static [Route] {
        &[Route::Dashboard, Route::Cryptocurrencies, Route::Market]
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Cryptocurrencies => "/cryptocurrencies",
            Route::Market => "/market",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Cryptocurrencies => "Cryptocurrencies",
            Route::Market => "Market",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = DashboardError;

    /// Accepts a path (`/market`) or a bare name (`market`), case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('/').to_lowercase();
        match name.as_str() {
            "" | "dashboard" => Ok(Route::Dashboard),
            "cryptocurrencies" | "crypto" => Ok(Route::Cryptocurrencies),
            "market" => Ok(Route::Market),
            _ => Err(DashboardError::invalid_config(format!("unknown route: {}", s))),
        }
    }
}

/// One navigation link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

pub fn nav_items(active: Route) -> Vec<NavItem> {
    Route::all()
        .iter()
        .map(|route| NavItem {
            label: route.label(),
            path: route.path(),
            active: *route == active,
        })
        .collect()
}

/// Brand, navigation with the active route bracketed, and the wallet button
pub fn render_header(active: Route) -> String {
    let nav = nav_items(active)
        .iter()
        .map(|item| {
            if item.active {
                format!("[{}]", item.label)
            } else {
                item.label.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ");

    let line = format!("{}  |  {}  |  [Connect Wallet]", BRAND_NAME, nav);
    let rule = "═".repeat(line.chars().count());
    format!("{}\n{}\n", line, rule)
}

pub fn render_footer(year: i32) -> String {
    let line = format!(
        "© {} {}. All rights reserved.  Terms (/terms)  Privacy (/privacy)",
        year, BRAND_NAME
    );
    format!("{}\n{}\n", "─".repeat(line.chars().count()), line)
}

/// Wraps a page body in the header and footer
pub fn wrap(active: Route, year: i32, body: &str) -> String {
    let mut out = render_header(active);
    out.push('\n');
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&render_footer(year));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_parsing() {
        assert_eq!("/".parse::<Route>().unwrap(), Route::Dashboard);
        assert_eq!("/cryptocurrencies".parse::<Route>().unwrap(), Route::Cryptocurrencies);
        assert_eq!("Market".parse::<Route>().unwrap(), Route::Market);
        assert!("/portfolio".parse::<Route>().is_err());
    }

    #[test]
    fn test_exactly_one_active_nav_item() {
        for route in Route::all() {
            let items = nav_items(*route);
            assert_eq!(items.len(), 3);
            assert_eq!(items.iter().filter(|i| i.active).count(), 1);
            assert!(items.iter().any(|i| i.active && i.path == route.path()));
        }
    }

    #[test]
    fn test_header_highlights_active() {
        let header = render_header(Route::Market);
        assert!(header.starts_with("CryptoTracker"));
        assert!(header.contains("Dashboard  Cryptocurrencies  [Market]"));
        assert!(header.contains("Connect Wallet"));
    }

    #[test]
    fn test_footer() {
        let footer = render_footer(2024);
        assert!(footer.contains("© 2024 CryptoTracker"));
        assert!(footer.contains("/terms"));
        assert!(footer.contains("/privacy"));
    }

    #[test]
    fn test_wrap_order() {
        let page = wrap(Route::Dashboard, 2024, "body");
        let header = page.find("[Dashboard]").unwrap();
        let body = page.find("body").unwrap();
        let footer = page.find("©").unwrap();
        assert!(header < body && body < footer);
    }
}
