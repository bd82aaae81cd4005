//! Property checks for scoring, selection, rematch and synthesis.

use iss_map::{MappingSession, MatchOptions, MatchSelector, SimilarityScorer};
use iss_model::{LabelSet, StudyId};
use proptest::prelude::*;

fn label() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just("age"),
            Just("sex"),
            Just("in"),
            Just("years"),
            Just("subject"),
            Just("visit"),
            Just("date"),
            Just("of"),
            Just("x"),
            Just(""),
        ],
        0..5,
    )
    .prop_map(|words| words.join(" "))
}

fn session_from(core_labels: &[String], study_labels: &[String]) -> MappingSession {
    let core = LabelSet::from_pairs(
        "core",
        core_labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), format!("V{i}"))),
    );
    let study = LabelSet::from_pairs(
        "Study1",
        study_labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), format!("S{i}"))),
    );
    MappingSession::new(
        &core,
        vec![(StudyId::numbered(0), study)],
        MatchOptions::default(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn scores_stay_in_unit_range(query in label(), candidates in proptest::collection::vec(label(), 0..6)) {
        let scores = SimilarityScorer::default().score(&query, &candidates);
        prop_assert_eq!(scores.len(), candidates.len());
        for score in scores {
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn raising_threshold_never_accepts_more(
        scores in proptest::collection::vec(0.0f64..=1.0, 0..8),
        low in 0.0f64..=1.0,
        delta in 0.0f64..=1.0,
    ) {
        let high = (low + delta).min(1.0);
        let loose = MatchSelector::new(low).unwrap().select(&scores);
        let strict = MatchSelector::new(high).unwrap().select(&scores);
        if loose.is_none() {
            prop_assert!(strict.is_none());
        }
        if let Some(strict) = strict {
            prop_assert_eq!(loose.map(|s| s.position), Some(strict.position));
        }
    }

    #[test]
    fn rematch_leaves_other_rows_untouched(
        core_labels in proptest::collection::vec(label(), 2..6),
        study_labels in proptest::collection::vec(label(), 0..6),
        edited in label(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut session = session_from(&core_labels, &study_labels);
        let target = pick.index(core_labels.len());
        let before = session.table().clone();

        session.edit_label(target, edited).unwrap();
        session.rematch(&[target]);

        for (idx, row) in session.table().rows().iter().enumerate() {
            if idx != target {
                prop_assert_eq!(Some(row), before.row(idx));
            }
        }
    }

    #[test]
    fn synthesis_twice_is_stable(
        core_labels in proptest::collection::vec(label(), 1..6),
        study_labels in proptest::collection::vec(label(), 0..6),
    ) {
        let mut session = session_from(&core_labels, &study_labels);
        session.synthesize();
        let first = session.table().clone();
        session.synthesize();
        prop_assert_eq!(session.table(), &first);
    }
}
