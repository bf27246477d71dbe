use nfa_grep::{compile, SyntaxError, SyntaxErrorKind};

const CORPUS: &[&str] = &[
    "", "a", "aa", "aaa", "aaaa", "aaaaa", "ab", "abc", "abcd", "xabc", "abcx", "ad", "abcbcd",
    "accccd", "abce", "5", "A", "m", "a1b2", "hello world", "x y\tz", "__init__", "a.c", "(a)",
];

const PATTERNS: &[&str] = &[
    "a", "a*", "a+b?", "a{2,4}", "a{2}", "a{,2}", "a{3,}", "[^a-z]", "^abc$", "a(b|c)*d", "a.c",
    "\\d", "\\w+", "\\s", "(a|ab)(c|bcd)", "^a|c$", "(ab)*", "[a-c]{1,2}d?", "\\(a\\)", "a\\.c",
];

#[test]
fn quantifier_boundaries() {
    let nfa = compile("a{2,4}").unwrap();
    for input in ["aa", "aaa", "aaaa"] {
        assert!(nfa.full_match(input).is_some(), "{input}");
    }
    for input in ["a", "aaaaa"] {
        assert!(nfa.full_match(input).is_none(), "{input}");
    }
}

#[test]
fn negated_class() {
    let nfa = compile("[^a-z]").unwrap();
    assert!(nfa.full_match("5").is_some());
    assert!(nfa.full_match("A").is_some());
    assert!(nfa.full_match("m").is_none());
}

#[test]
fn anchors_pin_to_string_boundaries() {
    let nfa = compile("^abc$").unwrap();
    assert!(nfa.full_match("abc").is_some());
    assert!(nfa.full_match("xabc").is_none());
    assert!(nfa.full_match("abcx").is_none());
    assert!(nfa.search("xxabcxx").is_none());
}

#[test]
fn alternation_with_grouping() {
    let nfa = compile("a(b|c)*d").unwrap();
    for input in ["ad", "abcbcd", "accccd"] {
        assert!(nfa.full_match(input).is_some(), "{input}");
    }
    assert!(nfa.full_match("abce").is_none());
}

#[test]
fn search_reports_substring_and_offsets() {
    let nfa = compile("a.c").unwrap();
    let m = nfa.search("xxabcxx").unwrap();
    assert_eq!(m.as_str(), "abc");
    assert_eq!(m.start(), 2);
    assert_eq!(m.end(), 5);
}

#[test]
fn empty_pattern_is_rejected() {
    assert_eq!(
        compile("").unwrap_err(),
        SyntaxError::new(SyntaxErrorKind::EmptyPattern, 0)
    );
}

#[test]
fn deeply_nested_groups_are_rejected() {
    let depth = 1000;
    let pattern = format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
    let err = compile(&pattern).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::NestingTooDeep);
    assert!(err.position < depth);

    let shallow = format!("{}a{}", "(".repeat(50), ")".repeat(50));
    assert!(compile(&shallow).unwrap().full_match("a").is_some());
}

#[test]
fn full_match_equals_search_spanning_input() {
    for pattern in PATTERNS {
        let nfa = compile(pattern).unwrap();
        for input in CORPUS {
            let len = input.chars().count();
            let full = nfa.full_match(input).map(|m| m.range());
            let spanning = nfa
                .search(input)
                .filter(|m| m.start() == 0 && m.end() == len)
                .map(|m| m.range());
            assert_eq!(full, spanning, "{pattern} on {input:?}");
        }
    }
}

#[test]
fn recompiling_accepts_the_same_language() {
    for pattern in PATTERNS {
        let first = compile(pattern).unwrap();
        let second = compile(pattern).unwrap();
        for input in CORPUS {
            assert_eq!(first.full_match(input), second.full_match(input), "{pattern}");
            assert_eq!(first.search(input), second.search(input), "{pattern}");
        }
    }
}

#[test]
fn find_all_reconstructs_input() {
    for pattern in PATTERNS {
        let nfa = compile(pattern).unwrap();
        for input in CORPUS {
            let chars: Vec<char> = input.chars().collect();
            let mut rebuilt = String::new();
            let mut cursor = 0;
            let mut last_start = None;
            for m in nfa.find_all(input) {
                assert!(m.start() >= cursor, "{pattern} on {input:?} overlaps");
                if let Some(last) = last_start {
                    assert!(m.start() > last, "{pattern} on {input:?} not increasing");
                }
                last_start = Some(m.start());
                rebuilt.extend(&chars[cursor..m.start()]);
                rebuilt.push_str(m.as_str());
                cursor = m.end();
            }
            rebuilt.extend(&chars[cursor..]);
            assert_eq!(&rebuilt, input, "{pattern}");
        }
    }
}

#[test]
fn engine_never_fails_on_empty_input() {
    for pattern in PATTERNS {
        let nfa = compile(pattern).unwrap();
        let _ = nfa.full_match("");
        let _ = nfa.search("");
        assert!(nfa.find_all("").count() <= 1);
    }
}

#[test]
fn free_functions_compose_compile_and_query() {
    assert_eq!(
        nfa_grep::full_match("a+", "aaa").unwrap().map(|m| m.range()),
        Some(0..3)
    );
    assert_eq!(
        nfa_grep::search("b+", "abbbc").unwrap().map(|m| m.range()),
        Some(1..4)
    );
    let words: Vec<String> = nfa_grep::find_all("\\w+", "hi, there you")
        .unwrap()
        .into_iter()
        .map(|m| m.as_str().to_owned())
        .collect();
    assert_eq!(words, ["hi", "there", "you"]);
    assert!(nfa_grep::is_match("o\\s", "hello world").unwrap());
    assert!(!nfa_grep::is_match("^world", "hello world").unwrap());

    let err = nfa_grep::search("a)", "a").unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::UnbalancedGroup);
    assert_eq!(err.position, 1);
}

#[test]
fn compiled_automaton_is_shared_across_threads() {
    let nfa = compile("(ab|cd)+").unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = ["xxababyy", "cdcd", "nope"]
            .into_iter()
            .map(|input| {
                let nfa = &nfa;
                scope.spawn(move || nfa.search(input).map(|m| m.as_str().to_owned()))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            results,
            vec![Some("abab".to_owned()), Some("cdcd".to_owned()), None]
        );
    });
}

#[test]
fn large_bounded_repetition() {
    let nfa = compile("x{0,200}y").unwrap();
    let input = format!("{}y", "x".repeat(150));
    assert!(nfa.full_match(&input).is_some());
    let too_many = format!("{}y", "x".repeat(201));
    assert_eq!(nfa.search(&too_many).map(|m| m.start()), Some(1));
}
