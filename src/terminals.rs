//! Static terminal and route tables.
//!
//! The set of terminals is closed and the route adjacency is fixed and
//! directional: reachability is not symmetric, and co-located docks appear
//! under different names depending on direction (the Nanaimo departures are
//! labelled "nanaimo (duke pt)" / "nanaimo (dep. bay)" while the matching
//! destinations are "duke point" / "departure bay").

use std::fmt;

/// A named ferry dock, the unit of departure/destination addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Terminal {
    Tsawwassen,
    SwartzBay,
    SouthernGulfIslands,
    DukePoint,
    FulfordHarbour,
    NanaimoDukePt,
    NanaimoDepBay,
    HorseshoeBay,
    DepartureBay,
    Langdale,
    SnugCove,
}

impl Terminal {
    pub const ALL: [Terminal; 11] = [
        Terminal::Tsawwassen,
        Terminal::SwartzBay,
        Terminal::SouthernGulfIslands,
        Terminal::DukePoint,
        Terminal::FulfordHarbour,
        Terminal::NanaimoDukePt,
        Terminal::NanaimoDepBay,
        Terminal::HorseshoeBay,
        Terminal::DepartureBay,
        Terminal::Langdale,
        Terminal::SnugCove,
    ];

    /// Canonical lowercase name, used as the schedule map key.
    pub fn name(&self) -> &'static str {
        match self {
            Terminal::Tsawwassen => "tsawwassen",
            Terminal::SwartzBay => "swartz bay",
            Terminal::SouthernGulfIslands => "southern gulf islands",
            Terminal::DukePoint => "duke point",
            Terminal::FulfordHarbour => "fulford harbour (saltspring is.)",
            Terminal::NanaimoDukePt => "nanaimo (duke pt)",
            Terminal::NanaimoDepBay => "nanaimo (dep. bay)",
            Terminal::HorseshoeBay => "horseshoe bay",
            Terminal::DepartureBay => "departure bay",
            Terminal::Langdale => "langdale",
            Terminal::SnugCove => "snug cove (bowen is.)",
        }
    }

    /// Short code used in source page URLs.
    pub fn code(&self) -> &'static str {
        match self {
            Terminal::Tsawwassen => "TSA",
            Terminal::SwartzBay => "SWB",
            Terminal::SouthernGulfIslands => "SGI",
            Terminal::DukePoint | Terminal::NanaimoDukePt => "DUK",
            Terminal::FulfordHarbour => "FUL",
            Terminal::NanaimoDepBay | Terminal::DepartureBay => "NAN",
            Terminal::HorseshoeBay => "HSB",
            Terminal::Langdale => "LNG",
            Terminal::SnugCove => "BOW",
        }
    }

    /// Look up a terminal from page text or a URL path segment.
    ///
    /// Accepts the canonical name in any case, the hyphenated form used in
    /// API paths (`nanaimo-(duke-pt)`), and the page's own spacing and
    /// period variants (`Nanaimo (Dep.Bay)`). Comparison ignores periods,
    /// hyphens, and spaces entirely so all the spellings converge.
    pub fn parse(input: &str) -> Option<Terminal> {
        let wanted = normalize(input);
        Terminal::ALL
            .into_iter()
            .find(|t| normalize(t.name()) == wanted)
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// An ordered (origin, destination) terminal pair with scheduled crossings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route {
    pub origin: Terminal,
    pub destination: Terminal,
}

/// Every valid directed route. The adjacency is asymmetric; pairs not listed
/// here are invalid and never gain a slot in the schedule.
pub const ROUTES: [Route; 12] = [
    Route { origin: Terminal::Tsawwassen, destination: Terminal::SwartzBay },
    Route { origin: Terminal::Tsawwassen, destination: Terminal::SouthernGulfIslands },
    Route { origin: Terminal::Tsawwassen, destination: Terminal::DukePoint },
    Route { origin: Terminal::SwartzBay, destination: Terminal::Tsawwassen },
    Route { origin: Terminal::SwartzBay, destination: Terminal::FulfordHarbour },
    Route { origin: Terminal::SwartzBay, destination: Terminal::SouthernGulfIslands },
    Route { origin: Terminal::HorseshoeBay, destination: Terminal::DepartureBay },
    Route { origin: Terminal::HorseshoeBay, destination: Terminal::Langdale },
    Route { origin: Terminal::HorseshoeBay, destination: Terminal::SnugCove },
    Route { origin: Terminal::NanaimoDukePt, destination: Terminal::Tsawwassen },
    Route { origin: Terminal::NanaimoDepBay, destination: Terminal::HorseshoeBay },
    Route { origin: Terminal::Langdale, destination: Terminal::HorseshoeBay },
];

impl Route {
    /// Lookup a route by its endpoints; `None` for pairs outside the fixed
    /// adjacency.
    pub fn find(origin: Terminal, destination: Terminal) -> Option<Route> {
        ROUTES
            .into_iter()
            .find(|r| r.origin == origin && r.destination == destination)
    }

    /// Normalized route key, e.g. `"horseshoe bay to langdale"`.
    pub fn key(&self) -> String {
        format!("{} to {}", self.origin.name(), self.destination.name())
    }

    /// Source URL for this route's current-conditions page.
    pub fn url(&self, base: &str) -> String {
        format!(
            "{}/{}-{}",
            base.trim_end_matches('/'),
            self.origin.code(),
            self.destination.code()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_canonical_names() {
        assert_eq!(Terminal::parse("tsawwassen"), Some(Terminal::Tsawwassen));
        assert_eq!(Terminal::parse("Swartz Bay"), Some(Terminal::SwartzBay));
        assert_eq!(
            Terminal::parse("nanaimo (duke pt)"),
            Some(Terminal::NanaimoDukePt)
        );
    }

    #[test]
    fn parse_hyphenated_path_segments() {
        assert_eq!(Terminal::parse("Horseshoe-Bay"), Some(Terminal::HorseshoeBay));
        assert_eq!(
            Terminal::parse("nanaimo-(duke-pt)"),
            Some(Terminal::NanaimoDukePt)
        );
        // Slugged form drops the period in "dep. bay".
        assert_eq!(
            Terminal::parse("nanaimo-(dep-bay)"),
            Some(Terminal::NanaimoDepBay)
        );
        assert_eq!(
            Terminal::parse("fulford-harbour-(saltspring-is)"),
            Some(Terminal::FulfordHarbour)
        );
    }

    #[test]
    fn parse_page_spelling_variants() {
        // The at-a-glance page renders this dock without a space after the
        // period; the canonical name carries one.
        assert_eq!(
            Terminal::parse("Nanaimo (Dep.Bay)"),
            Some(Terminal::NanaimoDepBay)
        );
        assert_eq!(
            Terminal::parse("nanaimo (dep. bay)"),
            Some(Terminal::NanaimoDepBay)
        );
        assert_eq!(
            Terminal::parse("Snug Cove (Bowen Is.)"),
            Some(Terminal::SnugCove)
        );
    }

    #[test]
    fn parse_rejects_unknown_terminals() {
        assert_eq!(Terminal::parse("atlantis"), None);
        assert_eq!(Terminal::parse(""), None);
    }

    #[test]
    fn adjacency_is_directional() {
        assert!(Route::find(Terminal::Tsawwassen, Terminal::SwartzBay).is_some());
        // Duke Point is reachable from Tsawwassen, but the return crossing
        // departs under the Nanaimo name.
        assert!(Route::find(Terminal::DukePoint, Terminal::Tsawwassen).is_none());
        assert!(Route::find(Terminal::NanaimoDukePt, Terminal::Tsawwassen).is_some());
    }

    #[test]
    fn route_key_format() {
        let route = Route::find(Terminal::HorseshoeBay, Terminal::Langdale).unwrap();
        assert_eq!(route.key(), "horseshoe bay to langdale");
    }

    #[test]
    fn route_url_uses_terminal_codes() {
        let route = Route::find(Terminal::SwartzBay, Terminal::Tsawwassen).unwrap();
        assert_eq!(
            route.url("https://www.bcferries.com/current-conditions/"),
            "https://www.bcferries.com/current-conditions/SWB-TSA"
        );
    }
}
