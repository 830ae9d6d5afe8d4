use std::fs;

use jrun_classpath::{resolve_classpath, ClasspathRequest};
use tempfile::TempDir;

fn join(entries: &[std::path::PathBuf]) -> String {
    std::env::join_paths(entries)
        .unwrap()
        .to_string_lossy()
        .into_owned()
}

#[test]
fn explicit_classpath_is_verbatim() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("classpath"), "ignored.jar").unwrap();

    let cp = resolve_classpath(&ClasspathRequest {
        app_dir: dir.path(),
        lib_dir: dir.path(),
        explicit: Some("/x.jar:/y.jar"),
    })
    .unwrap();
    assert_eq!(cp, "/x.jar:/y.jar");
}

#[test]
fn classpath_file_entries_are_relative_to_lib_dir() {
    let app = TempDir::new().unwrap();
    let lib = app.path().join("lib");
    fs::create_dir(&lib).unwrap();
    fs::write(lib.join("classpath"), "a.jar:b.jar\nc.jar\n").unwrap();

    let cp = resolve_classpath(&ClasspathRequest {
        app_dir: app.path(),
        lib_dir: &lib,
        explicit: None,
    })
    .unwrap();
    assert_eq!(
        cp,
        join(&[lib.join("a.jar"), lib.join("b.jar"), lib.join("c.jar")])
    );
}

#[test]
fn default_is_app_dir_then_lib_jars() {
    let app = TempDir::new().unwrap();
    let lib = app.path().join("lib");
    fs::create_dir(&lib).unwrap();
    fs::write(lib.join("z.jar"), "").unwrap();
    fs::write(lib.join("a.jar"), "").unwrap();
    fs::write(lib.join("notes.txt"), "").unwrap();

    let cp = resolve_classpath(&ClasspathRequest {
        app_dir: app.path(),
        lib_dir: &lib,
        explicit: None,
    })
    .unwrap();
    assert_eq!(
        cp,
        join(&[app.path().join("."), lib.join("a.jar"), lib.join("z.jar")])
    );
}
