use std::collections::HashMap;

use inox_core::MAX_SCHEME_NAME_LEN;
use inox_core::lang::{chars, keywords, lexemes, schemes};

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(keywords::as_str(info.id), info.canonical);
        assert!(keywords::is_keyword(info.canonical));

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate keyword spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn keywords_are_identifier_like() {
    for info in keywords::KEYWORDS {
        let mut spelling = info.canonical.chars();
        let first = spelling.next().expect("keywords are not empty");
        assert!(chars::is_alpha(first), "{}", info.canonical);
        assert!(
            spelling.all(chars::is_ident_char),
            "keyword {:?} cannot be scanned as an identifier",
            info.canonical
        );
    }
}

#[test]
fn lexemes_resolve_to_an_entry_with_the_same_spelling() {
    for info in lexemes::LEXEMES {
        assert_eq!(lexemes::as_str(info.id), info.canonical);
        assert!(!info.canonical.is_empty());
        // the newline token is the only lexeme made of whitespace
        if info.canonical != "\n" {
            assert!(!info.canonical.contains(char::is_whitespace), "{:?}", info.canonical);
        }

        let resolved = lexemes::from_str(info.canonical).expect("spelling resolvable");
        assert_eq!(lexemes::as_str(resolved), info.canonical);
    }
}

#[test]
fn schemes_are_unique_and_short() {
    let mut seen = HashMap::new();
    for info in schemes::SCHEMES {
        assert!(info.name.len() <= MAX_SCHEME_NAME_LEN, "{}", info.name);
        assert!(info.name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert!(seen.insert(info.name, ()).is_none(), "duplicate scheme {}", info.name);
    }
    assert!(!schemes::is_supported_scheme(schemes::NO_SCHEME_SCHEME_NAME));
}
