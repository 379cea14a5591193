use htp1_core::status::{bounded, Patch, RemoteStatus};
use proptest::prelude::*;

fn patch() -> impl Strategy<Value = Patch> {
    prop_oneof![
        (-99i32..=10).prop_map(Patch::Volume),
        any::<bool>().prop_map(Patch::Muted),
        (0i32..16).prop_map(Patch::InputId),
        "[a-z0-9]{0,6}".prop_map(|s| Patch::InputLabel(bounded(&s))),
        prop::sample::select(vec!["", "Dolby TrueHD", "DTS-HD Master Audio", "PCM"])
            .prop_map(|s| Patch::CodecName(bounded(s))),
        "[A-Za-z ]{0,12}".prop_map(|s| Patch::SurroundMode(bounded(&s))),
        any::<bool>().prop_map(Patch::PowerIsOn),
    ]
}

/// Keep only the last patch for each path
fn last_per_path(patches: &[Patch]) -> Vec<Patch> {
    let mut out: Vec<Patch> = Vec::new();
    for p in patches.iter().rev() {
        if !out.iter().any(|q| q.path() == p.path()) {
            out.push(p.clone());
        }
    }
    out
}

proptest! {
    #[test]
    fn last_patch_per_path_wins(patches in prop::collection::vec(patch(), 0..24)) {
        let mut status = RemoteStatus::new(7);
        status.apply_batch(&patches);

        for last in last_per_path(&patches) {
            let mut probe = status.clone();
            prop_assert!(!probe.apply(&last), "{} not at its last value", last.path());
        }
    }

    #[test]
    fn dirty_iff_some_patch_changed_a_value(
        first in prop::collection::vec(patch(), 0..12),
        second in prop::collection::vec(patch(), 0..12),
    ) {
        let mut status = RemoteStatus::new(0);
        status.apply_batch(&first);
        status.take_dirty();

        let mut expected = false;
        let mut replay = status.clone();
        for p in &second {
            expected |= replay.apply(p);
        }

        prop_assert_eq!(status.apply_batch(&second), expected);
        prop_assert_eq!(status.take_dirty(), expected);
    }

    #[test]
    fn settled_values_do_not_wake(patches in prop::collection::vec(patch(), 0..16)) {
        let mut status = RemoteStatus::new(0);
        status.apply_batch(&patches);
        status.take_dirty();

        prop_assert!(!status.apply_batch(&last_per_path(&patches)));
        prop_assert!(!status.is_dirty());
    }
}
