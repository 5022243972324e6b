//! Builtin dictionary catalog.
//!
//! Every builtin is a pure function of `(count, seed)`. A seed of 0 keeps the
//! word lists in their natural order.

use crate::source::BuiltinGenerator;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Names of every builtin generator.
pub const BUILTIN_NAMES: &[&str] = &[
    "uuid_v4_lower",
    "uuid_v4_upper",
    "h3_level8",
    "h3_level10",
    "sequential_numbers",
    "sequential_padded",
    "english_nouns",
    "english_verbs",
    "english_adjectives",
    "city_names",
    "country_names",
    "email_domains",
];

/// Look up a builtin generator by catalog name.
pub fn lookup(name: &str) -> Option<BuiltinGenerator> {
    let generator: BuiltinGenerator = match name {
        "uuid_v4_lower" => Arc::new(|count, seed| uuid_v4(count, seed, false)),
        "uuid_v4_upper" => Arc::new(|count, seed| uuid_v4(count, seed, true)),
        "h3_level8" => Arc::new(h3_level8),
        "h3_level10" => Arc::new(h3_level10),
        "sequential_numbers" => Arc::new(sequential_numbers),
        "sequential_padded" => Arc::new(sequential_padded),
        "english_nouns" => Arc::new(|count, seed| word_list(NOUNS, "noun", count, seed)),
        "english_verbs" => Arc::new(|count, seed| word_list(VERBS, "verb", count, seed)),
        "english_adjectives" => {
            Arc::new(|count, seed| word_list(ADJECTIVES, "adj", count, seed))
        }
        "city_names" => Arc::new(|count, seed| word_list(CITIES, "City", count, seed)),
        "country_names" => Arc::new(|count, seed| word_list(COUNTRIES, "Country", count, seed)),
        "email_domains" => Arc::new(email_domains),
        _ => return None,
    };
    Some(generator)
}

fn uuid_v4(count: usize, seed: u64, upper: bool) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut bytes = [0u8; 16];
            rng.fill(&mut bytes);
            let uuid = uuid::Builder::from_random_bytes(bytes).into_uuid();
            if upper {
                uuid.hyphenated().to_string().to_uppercase()
            } else {
                uuid.hyphenated().to_string()
            }
        })
        .collect()
}

// Hex strings shaped like H3 cell indexes: mode and resolution prefix,
// random base cell and digits, unused resolution digits set to all ones.
fn h3_level8(count: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| format!("88{:07x}ffffff", rng.gen_range(0..0x1000_0000u64)))
        .collect()
}

fn h3_level10(count: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| format!("8a{:09x}ffff", rng.gen_range(0..0x10_0000_0000u64)))
        .collect()
}

fn sequential_start(seed: u64) -> u64 {
    if seed == 0 {
        1
    } else {
        seed
    }
}

fn sequential_numbers(count: usize, seed: u64) -> Vec<String> {
    let start = sequential_start(seed);
    (0..count as u64)
        .map(|i| start.wrapping_add(i).to_string())
        .collect()
}

fn sequential_padded(count: usize, seed: u64) -> Vec<String> {
    let start = sequential_start(seed);
    (0..count as u64)
        .map(|i| format!("{:010}", start.wrapping_add(i)))
        .collect()
}

/// Known words first, then `{prefix}{index}` filler, shuffled unless the
/// seed is 0.
fn word_list(known: &[&str], prefix: &str, count: usize, seed: u64) -> Vec<String> {
    let mut items: Vec<String> = (0..count)
        .map(|i| match known.get(i) {
            Some(word) => word.to_string(),
            None => format!("{prefix}{i}"),
        })
        .collect();

    if seed != 0 {
        items.shuffle(&mut StdRng::seed_from_u64(seed));
    }
    items
}

fn email_domains(count: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut items: Vec<String> = EMAIL_DOMAINS
        .iter()
        .take(count)
        .map(|d| d.to_string())
        .collect();

    while items.len() < count {
        let tld = TLDS[rng.gen_range(0..TLDS.len())];
        items.push(format!("domain{}{tld}", items.len()));
    }

    if seed != 0 {
        items.shuffle(&mut rng);
    }
    items
}

const NOUNS: &[&str] = &[
    "time", "year", "people", "way", "day", "man", "thing", "woman", "life", "child", "world",
    "school", "state", "family", "student", "group", "country", "problem", "hand", "part",
    "place", "case", "week", "company", "system", "program", "question", "work", "government",
    "number", "night", "point", "home", "water", "room", "mother", "area", "money", "story",
    "fact", "month", "lot", "right", "study", "book", "eye", "job", "word", "business", "issue",
];

const VERBS: &[&str] = &[
    "be", "have", "do", "say", "get", "make", "go", "know", "take", "see", "come", "think",
    "look", "want", "give", "use", "find", "tell", "ask", "work", "seem", "feel", "try", "leave",
    "call", "run", "walk", "talk", "sit", "stand", "write", "read", "play", "move", "live",
    "believe", "hold", "bring", "happen", "provide", "lose", "pay", "meet", "include",
    "continue", "set", "learn", "change", "lead", "understand",
];

const ADJECTIVES: &[&str] = &[
    "good", "new", "first", "last", "long", "great", "little", "own", "other", "old", "right",
    "big", "high", "different", "small", "large", "next", "early", "young", "important", "few",
    "public", "bad", "same", "able", "political", "late", "general", "full", "special", "easy",
    "clear", "recent", "strong", "possible", "free", "common", "poor", "natural", "significant",
    "similar", "hot", "dead", "central", "happy", "serious", "ready", "simple", "left",
    "physical",
];

const CITIES: &[&str] = &[
    "Tokyo", "Delhi", "Shanghai", "Sao Paulo", "Mexico City", "Cairo", "Mumbai", "Beijing",
    "Dhaka", "Osaka", "New York", "Karachi", "Buenos Aires", "Chongqing", "Istanbul", "Kolkata",
    "Manila", "Lagos", "Rio de Janeiro", "Tianjin", "Kinshasa", "Guangzhou", "Los Angeles",
    "Moscow", "Shenzhen", "Lahore", "Bangalore", "Paris", "Bogota", "Jakarta", "Chennai", "Lima",
    "Bangkok", "Seoul", "Nagoya", "Hyderabad", "London", "Tehran", "Chicago", "Chengdu",
    "Nanjing", "Wuhan", "Ho Chi Minh City", "Luanda", "Ahmedabad", "Kuala Lumpur", "Xi'an",
    "Hong Kong", "Dongguan", "Hangzhou",
];

const COUNTRIES: &[&str] = &[
    "China", "India", "United States", "Indonesia", "Pakistan", "Brazil", "Nigeria",
    "Bangladesh", "Russia", "Mexico", "Japan", "Ethiopia", "Philippines", "Egypt", "Vietnam",
    "Germany", "Turkey", "Iran", "Thailand", "United Kingdom", "France", "Italy", "Tanzania",
    "South Africa", "Myanmar", "Kenya", "South Korea", "Colombia", "Spain", "Uganda",
    "Argentina", "Algeria", "Sudan", "Ukraine", "Iraq", "Afghanistan", "Poland", "Canada",
    "Morocco", "Saudi Arabia", "Uzbekistan", "Peru", "Angola", "Malaysia", "Mozambique", "Ghana",
    "Yemen", "Nepal", "Venezuela", "Madagascar",
];

const EMAIL_DOMAINS: &[&str] = &[
    "gmail.com", "yahoo.com", "hotmail.com", "outlook.com", "icloud.com", "aol.com",
    "protonmail.com", "mail.com", "yandex.com", "qq.com", "163.com", "126.com", "sina.com",
    "live.com", "msn.com", "me.com", "mac.com", "fastmail.com", "tutanota.com", "zoho.com",
];

const TLDS: &[&str] = &[
    ".com", ".org", ".net", ".edu", ".gov", ".io", ".co", ".ai", ".dev", ".app",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_catalog_name_resolves() {
        for name in BUILTIN_NAMES {
            let generator = lookup(name).unwrap();
            let items = generator(100, 7);
            assert_eq!(items.len(), 100, "builtin {name}");
        }
        assert!(lookup("klingon_words").is_none());
    }

    #[test]
    fn test_builtins_are_pure() {
        for name in BUILTIN_NAMES {
            let generator = lookup(name).unwrap();
            assert_eq!(generator(64, 3), generator(64, 3), "builtin {name}");
        }
    }

    #[test]
    fn test_uuid_format() {
        let lower = uuid_v4(10, 1, false);
        let upper = uuid_v4(10, 1, true);

        for (l, u) in lower.iter().zip(&upper) {
            assert_eq!(l.len(), 36);
            assert_eq!(l.as_bytes()[14], b'4');
            assert_eq!(&l.to_uppercase(), u);
            let parsed = uuid::Uuid::parse_str(l).unwrap();
            assert_eq!(parsed.get_version_num(), 4);
        }
        let distinct: HashSet<_> = lower.iter().collect();
        assert_eq!(distinct.len(), 10);
    }

    #[test]
    fn test_h3_shape() {
        for cell in h3_level8(20, 5) {
            assert_eq!(cell.len(), 15);
            assert!(cell.starts_with("88") && cell.ends_with("ffffff"));
        }
        for cell in h3_level10(20, 5) {
            assert_eq!(cell.len(), 15);
            assert!(cell.starts_with("8a") && cell.ends_with("ffff"));
        }
    }

    #[test]
    fn test_sequential_start() {
        assert_eq!(sequential_numbers(3, 0), vec!["1", "2", "3"]);
        assert_eq!(sequential_numbers(2, 10), vec!["10", "11"]);
        assert_eq!(sequential_padded(1, 0), vec!["0000000001"]);
    }

    #[test]
    fn test_word_list_natural_order_with_seed_zero() {
        let nouns = word_list(NOUNS, "noun", 52, 0);
        assert_eq!(nouns[0], "time");
        assert_eq!(nouns[50], "noun50");

        let shuffled = word_list(NOUNS, "noun", 52, 9);
        let mut sorted_a = nouns.clone();
        let mut sorted_b = shuffled.clone();
        sorted_a.sort();
        sorted_b.sort();
        assert_eq!(sorted_a, sorted_b);
    }

    #[test]
    fn test_email_domains_fill() {
        let domains = email_domains(25, 0);
        assert_eq!(domains[0], "gmail.com");
        assert!(domains[20].starts_with("domain20."));
    }
}
