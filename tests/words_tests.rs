use receipt_book::core::{WordsError, to_words};

#[test]
fn zero_word() {
    assert_eq!(to_words(0).unwrap(), "صفر");
}

#[test]
fn negatives_are_prefixed() {
    for n in [1, 15, 300, 2_000, 7_654_321] {
        assert_eq!(
            to_words(-n).unwrap(),
            format!("سالب {}", to_words(n).unwrap())
        );
    }
}

#[test]
fn irregular_hundreds_differ_from_compound_ones() {
    let one = to_words(100).unwrap();
    let two = to_words(200).unwrap();
    assert_eq!(one, "مائة");
    assert_eq!(two, "مائتان");
    for (n, expected) in [(300, "ثلاثمائة"), (400, "أربعمائة"), (900, "تسعمائة")] {
        let w = to_words(n).unwrap();
        assert_eq!(w, expected);
        assert_ne!(w, one);
        assert_ne!(w, two);
    }
}

#[test]
fn teens_are_not_compositions() {
    let expected = [
        "أحد عشر",
        "اثنا عشر",
        "ثلاثة عشر",
        "أربعة عشر",
        "خمسة عشر",
        "ستة عشر",
        "سبعة عشر",
        "ثمانية عشر",
        "تسعة عشر",
    ];
    for (i, word) in expected.iter().enumerate() {
        assert_eq!(to_words(11 + i as i64).unwrap(), *word);
    }
}

#[test]
fn million_forms() {
    assert_eq!(to_words(1_000_000).unwrap(), "مليون");
    assert_eq!(to_words(2_000_000).unwrap(), "مليونان");
    assert!(to_words(5_000_000).unwrap().contains("ملايين"));
    let twenty = to_words(20_000_000).unwrap();
    assert_eq!(twenty, "عشرون مليون");
    assert!(!twenty.contains("ملايين"));
}

#[test]
fn thousand_forms() {
    assert_eq!(to_words(1_000).unwrap(), "ألف");
    assert_eq!(to_words(2_000).unwrap(), "ألفان");
    assert_eq!(to_words(7_000).unwrap(), "سبعة آلاف");
    assert_eq!(to_words(250_000).unwrap(), "مائتان وخمسون ألف");
}

#[test]
fn large_number_decomposes_into_three_groups() {
    let w = to_words(123_456_789).unwrap();
    let groups: Vec<&str> = w.split(" مليون و").collect();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0], "مائة وثلاثة وعشرون");
    assert!(groups[1].starts_with("أربعمائة وستة وخمسون ألف و"));
    assert!(w.ends_with("سبعمائة وتسعة وثمانون"));
    assert_eq!(w.trim(), w);
}

#[test]
fn single_nonzero_group_has_no_conjunction() {
    for n in [5, 40_000, 300_000_000] {
        let w = to_words(n).unwrap();
        assert!(!w.starts_with('و'));
        assert!(!w.ends_with('و'));
        assert!(!w.contains("  "));
    }
    assert_eq!(to_words(300_000_000).unwrap(), "ثلاثمائة مليون");
}

#[test]
fn rejects_billions() {
    assert_eq!(
        to_words(-1_000_000_000),
        Err(WordsError::OutOfRange(-1_000_000_000))
    );
}
