use std::path::PathBuf;

use shotmark::{ExtendedRoots, FixedRoots, PathResolver, ShotError};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "shotmark_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn home_itself_is_searched_first() {
    let home = temp_dir("scn_home_first");
    std::fs::create_dir_all(home.join("Shots")).unwrap();
    std::fs::create_dir_all(home.join("Downloads").join("Shots")).unwrap();

    let r = PathResolver::new(&home, Box::new(FixedRoots::default())).unwrap();
    let got = r.resolve("Shots").unwrap();
    assert_eq!(got.path(), home.join("Shots"));
    assert!(got.existed());

    std::fs::remove_dir_all(&home).ok();
}

#[test]
fn resolution_creates_nothing() {
    let home = temp_dir("scn_pure");
    let r = PathResolver::new(&home, Box::new(FixedRoots::default())).unwrap();

    for raw in ["Fresh", "~/deep/er", "rel/path"] {
        let got = r.resolve(raw).unwrap();
        assert!(!got.existed(), "{raw}");
        assert!(got.path().is_absolute(), "{raw}");
        assert!(!got.path().exists(), "{raw}");
    }

    std::fs::remove_dir_all(&home).ok();
}

#[test]
fn backslashes_separate_segments() {
    let home = temp_dir("scn_backslash");
    let r = PathResolver::new(&home, Box::new(FixedRoots::default())).unwrap();

    let got = r.resolve("~\\pics\\2025").unwrap();
    assert_eq!(got.path(), home.join("pics").join("2025"));

    std::fs::remove_dir_all(&home).ok();
}

#[test]
fn configured_extra_roots_are_searched() {
    let home = temp_dir("scn_extra_home");
    let volume = temp_dir("scn_extra_volume");
    std::fs::create_dir_all(volume.join("Captures")).unwrap();

    let roots = ExtendedRoots {
        base: FixedRoots::default(),
        extra: vec![volume.clone()],
    };
    let r = PathResolver::new(&home, Box::new(roots)).unwrap();
    let got = r.resolve("Captures").unwrap();
    assert_eq!(got.path(), volume.join("Captures"));
    assert!(got.existed());

    std::fs::remove_dir_all(&home).ok();
    std::fs::remove_dir_all(&volume).ok();
}

#[test]
fn empty_and_degenerate_inputs_are_invalid() {
    let home = temp_dir("scn_invalid");
    let r = PathResolver::new(&home, Box::new(FixedRoots::default())).unwrap();

    for raw in ["", "   ", ".", "..", "a/..", "bad\0name"] {
        assert!(
            matches!(r.resolve(raw), Err(ShotError::InvalidPath { .. })),
            "{raw:?}"
        );
    }

    std::fs::remove_dir_all(&home).ok();
}
