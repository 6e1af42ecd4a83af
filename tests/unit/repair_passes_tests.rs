/*!
 * Tests for the repair passes through the public API
 */

use subfix::markup;
use subfix::repair::casing::capitalize_first_letter;
use subfix::repair::dialogue::normalize_dialogue_dashes;
use subfix::repair::line_merge::{DEFAULT_MAX_MERGED_LENGTH, merge_short_lines};
use subfix::repair::ocr::{fix_uppercase_i_inside_words, fix_with_replace_list};
use subfix::repair::periods::add_missing_period;
use subfix::repair::spacing::fix_missing_spaces;
use subfix::repair::spanish::fix_inverted_marks;
use subfix::repair::tags::balance_tags;
use subfix::resources::{ReplaceList, ReplaceRule, WordList};

/// Every pass must leave its own output alone
fn assert_stable(pass: impl Fn(&str) -> String, input: &str, expected: &str) {
    let fixed = pass(input);
    assert_eq!(fixed, expected, "input: {:?}", input);
    assert_eq!(pass(&fixed), fixed, "second run changed {:?}", fixed);
}

#[test]
fn test_markup_render_withAnyInput_shouldRoundTrip() {
    for text in [
        "",
        "plain",
        "<i>Hey!\n<i>Boy!",
        "<font color=\"#ff0000\">red</font> 3 < 4 > 2",
        "</i><b><u></u>",
        "<unknown>tag</unknown>",
    ] {
        assert_eq!(markup::render(&markup::parse(text)), text);
    }
}

#[test]
fn test_balanceTags_withLineReopened_shouldCloseBothLines() {
    assert_stable(balance_tags, "<i>Hey!\n<i>Boy!", "<i>Hey!</i>\n<i>Boy!</i>");
}

#[test]
fn test_balanceTags_withStrayTags_shouldProduceBalancedMarkup() {
    for input in [
        "</i>What do i care.</i>",
        "Seems their <i>attackers headed north.",
        "Awesome it is!</i><i>",
        "<i></i>test",
    ] {
        let fixed = balance_tags(input);
        assert!(
            markup::is_balanced(&markup::parse(&fixed), "i"),
            "unbalanced result {:?} for {:?}",
            fixed,
            input
        );
    }
}

/// Mixed-tag strays, dashes inside emphasis and empty lines
const EDGE_CASES: [&str; 14] = [
    "",
    "\n\n",
    "<i>  </b></i>",
    "<i></b></i>Hi",
    "1<b></u></b>\n1</b><font color='red'>",
    "<b>A</b><u></i></u><b>B</b>",
    "<i>- </i>Hey",
    "<b><i>- </i></b>Hey",
    "<i>- </i><b>Hey</b>",
    "<i>Hey!\n<i>Boy!",
    "</i>What do i care.</i>",
    "<i>Qué?</i>!",
    "- Hi!\n- Bye!",
    "The font is ita/ic, no troubIe.",
];

#[test]
fn test_everyPass_withEdgeCases_shouldBeIdempotent() {
    let list = ReplaceList::new("eng", vec![ReplaceRule::new("/", "l")]);
    let words = WordList::from_words(["italic", "the", "font", "is", "trouble"]);

    let passes: Vec<(&str, Box<dyn Fn(&str) -> String + '_>)> = vec![
        ("balance_tags", Box::new(balance_tags)),
        ("capitalize", Box::new(|t: &str| capitalize_first_letter(t, None))),
        ("missing_spaces", Box::new(fix_missing_spaces)),
        ("dialogue_dashes", Box::new(normalize_dialogue_dashes)),
        (
            "merge_short_lines",
            Box::new(|t: &str| merge_short_lines(t, DEFAULT_MAX_MERGED_LENGTH)),
        ),
        ("spanish_marks", Box::new(fix_inverted_marks)),
        (
            "replace_list",
            Box::new(|t: &str| fix_with_replace_list(t, &list, Some(&words)).unwrap()),
        ),
        (
            "uppercase_i",
            Box::new(|t: &str| fix_uppercase_i_inside_words(t, Some(&words)).unwrap()),
        ),
        ("missing_period", Box::new(|t: &str| add_missing_period(t, Some("Next.")))),
    ];

    for (name, pass) in &passes {
        for input in EDGE_CASES {
            let once = pass(input);
            assert_eq!(pass(&once), once, "{} not idempotent for {:?}", name, input);
        }
    }
}

#[test]
fn test_balanceTags_withEdgeCases_shouldBalanceEveryEmphasisTag() {
    for input in EDGE_CASES {
        let fixed = balance_tags(input);
        let spans = markup::parse(&fixed);
        for tag in markup::EMPHASIS_TAGS {
            assert!(
                markup::is_balanced(&spans, tag),
                "unbalanced <{}> in {:?} for {:?}",
                tag,
                fixed,
                input
            );
        }
    }
}

#[test]
fn test_capitalizeFirstLetter_shouldDependOnPreviousCue() {
    assert_eq!(capitalize_first_letter("and so on", Some("Done.")), "And so on");
    assert_eq!(capitalize_first_letter("and so on", Some("This goes")), "and so on");
    assert_eq!(capitalize_first_letter("...in a lot of trouble.", None), "...in a lot of trouble.");
}

#[test]
fn test_fixMissingSpaces_aroundItalicWord_shouldInsertSpace() {
    assert_stable(
        fix_missing_spaces,
        "The<i>Bombshell</i> will gone.",
        "The <i>Bombshell</i> will gone.",
    );
}

#[test]
fn test_normalizeDialogueDashes_shouldAddOrRemoveMarkers() {
    assert_stable(normalize_dialogue_dashes, "Hi Joe!\n- Hi Pete!", "- Hi Joe!\n- Hi Pete!");
    assert_stable(normalize_dialogue_dashes, "- Mm-hmm.", "Mm-hmm.");
}

#[test]
fn test_mergeShortLines_withDefaultLimit_shouldMergeShortCue() {
    let merge = |text: &str| merge_short_lines(text, DEFAULT_MAX_MERGED_LENGTH);
    assert_stable(merge, "This is\nshort!", "This is short!");
    assert_stable(merge, "- Hi!\n- Bye!", "- Hi!\n- Bye!");
}

#[test]
fn test_fixInvertedMarks_shouldMirrorTrailingMarks() {
    assert_stable(fix_inverted_marks, "Cómo estás?", "¿Cómo estás?");
    assert_stable(fix_inverted_marks, "¡Cómo estás?", "¿¡Cómo estás!?");
    assert_stable(fix_inverted_marks, "¡¡PARA!!", "¡¡PARA!!");
}

#[test]
fn test_fixWithReplaceList_shouldOnlyApplyConfirmedCorrections() {
    let list = ReplaceList::new("eng", vec![ReplaceRule::new("/", "l")]);
    let words = WordList::from_words(["italic", "the", "font", "is"]);
    let fix = |text: &str| fix_with_replace_list(text, &list, Some(&words)).unwrap();

    assert_stable(fix, "The font is ita/ic!", "The font is italic!");
    assert_stable(fix, "(laughing/clapping)", "(laughing/clapping)");
}

#[test]
fn test_fixUppercaseIInsideWords_shouldFixLowercaseWordsOnly() {
    let fix = |text: &str| fix_uppercase_i_inside_words(text, None).unwrap();
    assert_stable(fix, "This is no troubIe!", "This is no trouble!");
    assert_stable(fix, "- ...In a lot of trouble.", "- ...In a lot of trouble.");
}

#[test]
fn test_addMissingPeriod_shouldLookAtNextCue() {
    let next = Some("This is line one!\n<i>Boy!</i>");
    assert_eq!(
        add_missing_period("This is line one!\n<i>Boy</i>", next),
        "This is line one!\n<i>Boy.</i>"
    );
    assert_eq!(add_missing_period("And then", Some("the door opened.")), "And then");
}
