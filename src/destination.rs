//! Known destinations and their spellings

/// A destination the planner recognises by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    /// Canonical name stored in the session state
    pub name: &'static str,
    /// Name used in replies
    pub korean: &'static str,
    /// Lowercase spellings matched against user text
    pub aliases: &'static [&'static str],
}

pub const DESTINATIONS: &[Destination] = &[
    Destination {
        name: "Osaka",
        korean: "오사카",
        aliases: &["오사카", "osaka"],
    },
    Destination {
        name: "Tokyo",
        korean: "도쿄",
        aliases: &["도쿄", "동경", "tokyo"],
    },
    Destination {
        name: "Kyoto",
        korean: "교토",
        aliases: &["교토", "kyoto"],
    },
    Destination {
        name: "Bangkok",
        korean: "방콕",
        aliases: &["방콕", "bangkok"],
    },
    Destination {
        name: "Paris",
        korean: "파리",
        aliases: &["파리", "paris"],
    },
    Destination {
        name: "London",
        korean: "런던",
        aliases: &["런던", "london"],
    },
    Destination {
        name: "New York",
        korean: "뉴욕",
        aliases: &["뉴욕", "new york", "newyork"],
    },
    Destination {
        name: "Hawaii",
        korean: "하와이",
        aliases: &["하와이", "hawaii"],
    },
    Destination {
        name: "Guam",
        korean: "괌",
        aliases: &["괌", "guam"],
    },
    Destination {
        name: "Singapore",
        korean: "싱가포르",
        aliases: &["싱가포르", "싱가폴", "singapore"],
    },
    Destination {
        name: "Hong Kong",
        korean: "홍콩",
        aliases: &["홍콩", "hong kong", "hongkong"],
    },
    Destination {
        name: "Jeju",
        korean: "제주",
        aliases: &["제주", "jeju"],
    },
    Destination {
        name: "Da Nang",
        korean: "다낭",
        aliases: &["다낭", "da nang", "danang"],
    },
    Destination {
        name: "Bali",
        korean: "발리",
        aliases: &["발리", "bali"],
    },
    Destination {
        name: "Cebu",
        korean: "세부",
        aliases: &["세부", "cebu"],
    },
];

/// Look up by canonical name or any alias, ignoring case
pub fn lookup(name: &str) -> Option<&'static Destination> {
    let needle = name.trim().to_lowercase();
    DESTINATIONS.iter().find(|d| {
        d.name.to_lowercase() == needle
            || d.korean == needle
            || d.aliases.contains(&needle.as_str())
    })
}

/// First destination mentioned anywhere in `text`, by position
pub fn find_in(text: &str) -> Option<&'static Destination> {
    let haystack = text.to_lowercase();
    DESTINATIONS
        .iter()
        .filter_map(|d| {
            d.aliases
                .iter()
                .filter_map(|alias| haystack.find(alias))
                .min()
                .map(|pos| (pos, d))
        })
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, d)| d)
}

/// Name to show travellers; unknown destinations pass through unchanged
pub fn display_name(name: &str) -> &str {
    lookup(name).map_or(name, |d| d.korean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_in_matches_korean_and_english() {
        assert_eq!(find_in("3박4일 도쿄 여행").map(|d| d.name), Some("Tokyo"));
        assert_eq!(find_in("Trip to New York please").map(|d| d.name), Some("New York"));
        assert_eq!(find_in("안녕하세요"), None);
    }

    #[test]
    fn test_find_in_prefers_earliest_mention() {
        assert_eq!(find_in("오사카 말고 교토").map(|d| d.name), Some("Osaka"));
        assert_eq!(find_in("kyoto or osaka").map(|d| d.name), Some("Kyoto"));
    }

    #[test]
    fn test_lookup_and_display_name() {
        assert_eq!(lookup("tokyo").map(|d| d.name), Some("Tokyo"));
        assert_eq!(lookup("홍콩").map(|d| d.name), Some("Hong Kong"));
        assert_eq!(display_name("Da Nang"), "다낭");
        assert_eq!(display_name("Lisbon"), "Lisbon");
    }
}
