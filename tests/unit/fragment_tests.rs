/*!
 * Tests for coded fragments and inline codes
 */

use segalign::resource::fragment::{MARKER_CLOSING, MARKER_ISOLATED, MARKER_OPENING};
use segalign::resource::{GenericContent, TagType, TextFragment};

use crate::common;

/// Test that the (coded text, codes) pair rebuilds an equal fragment
#[test]
fn test_fragment_setCodesThenCodedText_shouldRoundTrip() {
    let mut original = common::bold_fragment();
    original.append_code(TagType::Placeholder, Some("br"), Some("<br/>"));
    original.append_str("end");

    let mut rebuilt = TextFragment::new();
    rebuilt.set_codes(original.codes().to_vec());
    rebuilt.set_coded_text(original.coded_text()).unwrap();

    assert_eq!(rebuilt, original);
    assert_eq!(rebuilt.coded_text(), original.coded_text());
    assert_eq!(rebuilt.codes(), original.codes());
}

/// Test that the storage form of the codes round trips too
#[test]
fn test_fragment_codesStorage_shouldRoundTrip() {
    let original = common::bold_fragment();
    let storage = original.codes_storage().unwrap();

    let mut rebuilt = TextFragment::new();
    rebuilt.set_codes_from_storage(&storage).unwrap();
    rebuilt.set_coded_text(original.coded_text()).unwrap();

    assert_eq!(rebuilt, original);
}

/// Test that coded text referencing a missing code is rejected
#[test]
fn test_fragment_setCodedText_withUnknownIndex_shouldFail() {
    let original = common::bold_fragment();
    let mut plain = TextFragment::from("plain");

    assert!(plain.set_coded_text(original.coded_text()).is_err());
    assert_eq!(plain.coded_text(), "plain");
}

/// Test that a cut between an opening and its closing isolates both markers
#[test]
fn test_subSequence_cuttingPairWithoutMissingCodes_shouldIsolateMarkers() {
    let fragment = common::bold_fragment();
    // "<1>" takes two positions, so 4 cuts "bold" after "bo"
    let left = fragment.sub_sequence(0, 4, false).unwrap();
    let right = fragment.sub_sequence(4, fragment.len() - 4, false).unwrap();

    let left_markers: Vec<char> = left.coded_text().chars().filter(|c| *c == MARKER_ISOLATED).collect();
    let right_markers: Vec<char> = right.coded_text().chars().filter(|c| *c == MARKER_ISOLATED).collect();
    assert_eq!(left_markers.len(), 1);
    assert_eq!(right_markers.len(), 1);
    assert!(!left.coded_text().contains(MARKER_OPENING));
    assert!(!right.coded_text().contains(MARKER_CLOSING));

    assert_eq!(left.codes().len(), 1);
    assert_eq!(left.codes()[0].id, 1);
    assert_eq!(left.codes()[0].tag_type, TagType::Opening);
    assert_eq!(left.codes()[0].data.as_deref(), Some("<b>"));
    assert_eq!(right.codes()[0].id, 1);
    assert_eq!(right.codes()[0].tag_type, TagType::Closing);
    assert_eq!(right.codes()[0].data.as_deref(), Some("</b>"));

    assert_eq!(GenericContent::to_string(&left, false), "<b1/>bo");
    assert_eq!(GenericContent::to_string(&right, false), "ld<e1/> text");
}

/// Test that a cut with missing codes synthesizes the counterparts
#[test]
fn test_subSequence_cuttingPairWithMissingCodes_shouldCompletePairs() {
    let fragment = common::bold_fragment();
    let left = fragment.sub_sequence(0, 4, true).unwrap();
    let right = fragment.sub_sequence(4, fragment.len() - 4, true).unwrap();

    assert_eq!(GenericContent::to_string(&left, false), "<1>bo</1>");
    assert_eq!(GenericContent::to_string(&right, false), "<1>ld</1> text");
    assert!(left.check_balance().is_ok());
    assert!(right.check_balance().is_ok());
}

/// Test that out of bounds slices fail
#[test]
fn test_subSequence_outOfBounds_shouldFail() {
    let fragment = TextFragment::from("abc");
    assert!(fragment.sub_sequence(2, 2, false).is_err());
    assert!(fragment.sub_sequence(4, 0, false).is_err());
    assert_eq!(fragment.sub_sequence(3, 0, false).unwrap().coded_text(), "");
}

/// Test that a boundary inside a marker is rejected
#[test]
fn test_subSequence_insideMarker_shouldFail() {
    let fragment = common::bold_fragment();
    assert!(fragment.sub_sequence(1, 3, false).is_err());
}

/// Test that visible length ignores markers while raw length counts them
#[test]
fn test_fragment_lengths_shouldCountMarkersOnlyInCodedText() {
    let fragment = common::bold_fragment();
    assert_eq!(fragment.visible_len(), "bold text".len());
    assert_eq!(fragment.len(), "bold text".len() + 4);
    assert_eq!(fragment.plain_text(), "bold text");
    assert_eq!(fragment.to_string(), "<b>bold</b> text");
}

/// Test that cloned fragments do not share codes
#[test]
fn test_fragment_clone_shouldCopyCodes() {
    let original = common::bold_fragment();
    let mut copy = original.clone();
    copy.code_mut(0).unwrap().data = Some("<strong>".to_string());

    assert_eq!(original.code(0).unwrap().data.as_deref(), Some("<b>"));
    assert_ne!(copy, original);
}

/// Test that a closing code pairs with the open code of the same label
#[test]
fn test_appendCode_closingAfterOpening_shouldShareId() {
    let fragment = common::bold_fragment();
    assert_eq!(fragment.codes()[0].id, fragment.codes()[1].id);
    assert!(fragment.check_balance().is_ok());
    assert_eq!(fragment.last_code_id(), 1);
}
