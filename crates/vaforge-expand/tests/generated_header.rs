use chrono::NaiveDate;
use vaforge_core::{Header, HeaderOptions};
use vaforge_expand::{ExpandError, Preprocessor};

const BOUNDS: [usize; 5] = [1, 2, 3, 7, 20];

fn preprocessor(options: &HeaderOptions) -> Preprocessor {
    let generated_at = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid timestamp");
    let header = Header::render(options, generated_at).expect("render header");
    let mut pp = Preprocessor::from_source(header.text()).expect("load header");
    for definition in ["M(i, ...)=m i", "P(i, x)=x[i]", "square(i, x)=x*x", "F()=called"] {
        pp.define(definition).expect("define helper");
    }
    pp
}

fn expand(pp: &Preprocessor, text: &str) -> String {
    pp.expand(text)
        .unwrap_or_else(|err| panic!("expanding {text}: {err}"))
        .to_string()
}

fn assert_expands(pp: &Preprocessor, text: &str, expected: &str) {
    let expansion = pp
        .expand(text)
        .unwrap_or_else(|err| panic!("expanding {text}: {err}"));
    assert!(
        expansion.matches(expected),
        "{text}\n  expected: {expected}\n  got:      {expansion}"
    );
}

fn items(stem: &str, count: usize) -> Vec<String> {
    (0..count).map(|index| format!("{stem}{index}")).collect()
}

#[test]
fn counting_yields_the_argument_count() {
    for n in BOUNDS {
        let pp = preprocessor(&HeaderOptions::new(n));
        for k in 1..=n {
            let call = format!("ZEN_VA_LENGTH({})", items("a", k).join(", "));
            assert_expands(&pp, &call, &k.to_string());
        }
    }
}

#[test]
fn repetition_applies_in_index_order() {
    for n in BOUNDS {
        let pp = preprocessor(&HeaderOptions::new(n));
        for i in 0..=n {
            let expected: Vec<String> = (0..i).map(|j| format!("m {j}")).collect();
            let expansion = pp
                .expand(&format!("ZEN_REPEAT_WITH(+, {i}, M, v)"))
                .expect("expand repetition");
            assert!(expansion.matches(&expected.join(" + ")), "N={n} i={i}: {expansion}");
            let separators = expansion.spellings().iter().filter(|s| **s == "+").count();
            assert_eq!(separators, i.saturating_sub(1));

            assert_expands(&pp, &format!("ZEN_REPEAT({i}, M, v)"), &expected.join(" "));
        }
    }
}

#[test]
fn enumeration_joins_with_commas() {
    for n in BOUNDS {
        let pp = preprocessor(&HeaderOptions::new(n));
        for i in 0..=n {
            let expected: Vec<String> = (0..i).map(|j| format!("m {j}")).collect();
            assert_expands(&pp, &format!("ZEN_ENUM({i}, M, v)"), &expected.join(", "));
        }
    }
}

#[test]
fn repetition_count_may_be_computed() {
    let pp = preprocessor(&HeaderOptions::default());
    assert_expands(
        &pp,
        "ZEN_REPEAT_WITH(+, ZEN_VA_LENGTH(foo, bar, baz), M, 4)",
        "m 0 + m 1 + m 2",
    );
}

#[test]
fn selector_returns_the_indexed_argument() {
    for n in BOUNDS {
        let pp = preprocessor(&HeaderOptions::new(n));
        for i in 0..n {
            for length in [i + 1, n + 3] {
                let call = format!("ZEN_GET_VA_ARG({i}, {})", items("a", length).join(", "));
                assert_expands(&pp, &call, &format!("a{i}"));
            }
        }
    }
}

#[test]
fn for_each_visits_every_item() {
    for n in BOUNDS {
        let pp = preprocessor(&HeaderOptions::new(n));
        for length in 1..=n {
            let list = items("x", length);
            let calls: Vec<String> = list
                .iter()
                .enumerate()
                .map(|(index, item)| format!("{item}[{index}]"))
                .collect();
            let args = list.join(", ");
            assert_expands(&pp, &format!("ZEN_FOR_EACH(P, {args})"), &calls.join(" "));
            assert_expands(&pp, &format!("ZEN_FOR_EACH_ENUM(P, {args})"), &calls.join(", "));
            assert_expands(&pp, &format!("ZEN_FOR_EACH_WITH(;, P, {args})"), &calls.join(" ; "));
        }
    }
}

#[test]
fn for_each_keeps_parenthesized_items_whole() {
    let pp = preprocessor(&HeaderOptions::new(4));
    assert_expands(&pp, "ZEN_FOR_EACH_ENUM(P, (1, 2), y)", "(1, 2)[0], y[1]");
}

#[test]
fn concrete_scenarios() {
    let pp = preprocessor(&HeaderOptions::default());
    assert_expands(&pp, "ZEN_FOR_EACH_ENUM(square, 1, 2, 3)", "1*1, 2*2, 3*3");
    assert_expands(&pp, "ZEN_VA_LENGTH(a, b, c, d)", "4");
    assert_expands(&pp, "ZEN_GET_VA_ARG(2, a, b, c, d, e)", "c");
}

#[test]
fn deferral_needs_exactly_k_rescans() {
    let options = HeaderOptions::new(6);
    let pp = preprocessor(&options);
    for level in 1..=options.max_defer_level() {
        for rescans in 0..=level + 1 {
            let mut expr = format!("ZEN_DEFER_{level}(F)()");
            for _ in 0..rescans {
                expr = format!("ZEN_EVAL({expr})");
            }
            let result = expand(&pp, &expr);
            if rescans < level {
                assert!(result.starts_with('F'), "{expr} fired early: {result}");
            } else {
                assert_eq!(result, "called", "{expr}");
            }
        }
    }
}

#[test]
fn plain_defer_and_dispatch() {
    let pp = preprocessor(&HeaderOptions::new(6));
    assert_expands(&pp, "ZEN_DEFER(F)()", "F ()");
    assert_expands(&pp, "ZEN_EVAL(ZEN_DEFER(F)())", "called");
    assert_expands(&pp, "ZEN_EVAL(ZEN_DEFER_N(1, F)())", "called");
    assert!(expand(&pp, "ZEN_EVAL(ZEN_DEFER_N(3, F)())").starts_with('F'));
    assert_expands(
        &pp,
        "ZEN_EVAL(ZEN_EVAL(ZEN_EVAL(ZEN_DEFER_N(3, F)())))",
        "called",
    );
}

#[test]
fn helpers_expand_as_documented() {
    let pp = preprocessor(&HeaderOptions::new(9));
    assert_expands(&pp, "ZEN_CONCAT(foo, bar)", "foobar");
    assert_expands(&pp, "ZEN_CONCAT(ZEN_VA_, MAX_LENGTH)", "9");
    assert_expands(&pp, "ZEN_UNUSED(foo)", "(void)(foo);");
    assert_expands(&pp, "ZEN_VA_MAX_LENGTH", "9");
    assert_expands(&pp, "ZEN_EXPAND(ZEN_EMPTY())", "");
    assert_expands(
        &pp,
        "ZEN_STATIC_ASSERT(1 == 1)",
        r#"static_assert(1 == 1, "Compile-time assertion failed: " "1 == 1")"#,
    );
}

#[test]
fn under_supplied_selector_is_a_macro_error() {
    let pp = preprocessor(&HeaderOptions::new(5));
    assert!(matches!(
        pp.expand("ZEN_GET_VA_ARG(3, a, b)"),
        Err(ExpandError::ArgumentCount { .. })
    ));
}

#[test]
fn indices_past_the_bound_have_no_entry() {
    let pp = preprocessor(&HeaderOptions::new(5));
    let result = expand(&pp, "ZEN_GET_VA_ARG(5, a, b, c, d, e, f)");
    assert!(result.starts_with("ZEN_GET_VA_ARG_5"), "{result}");
}

#[test]
fn custom_prefix_header_works_end_to_end() {
    let options = HeaderOptions {
        prefix: "VA_".to_string(),
        guard: "VA_MACROS_H".to_string(),
        ..HeaderOptions::new(4)
    };
    let pp = preprocessor(&options);
    assert!(pp.is_defined("VA_MACROS_H"));
    assert_expands(&pp, "VA_FOR_EACH_ENUM(square, 5, 6)", "5*5, 6*6");
    assert_expands(&pp, "VA_VA_LENGTH(a, b, c, d)", "4");
}
