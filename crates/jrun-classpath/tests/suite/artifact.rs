use std::fs;
use std::path::Path;

use jrun_classpath::{resolve_artifact, Artifact, ArtifactError, ArtifactRequest};
use tempfile::TempDir;

fn request<'a>(app_dir: &'a Path) -> ArtifactRequest<'a> {
    ArtifactRequest {
        app_dir,
        app_jar: None,
        main_class: None,
    }
}

#[test]
fn single_jar_is_auto_detected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("service.jar"), "").unwrap();
    fs::write(dir.path().join("README.md"), "").unwrap();
    fs::create_dir(dir.path().join("lib")).unwrap();
    fs::write(dir.path().join("lib/dep.jar"), "").unwrap();

    assert_eq!(
        resolve_artifact(&request(dir.path())).unwrap(),
        Artifact::Jar {
            path: dir.path().join("service.jar")
        }
    );
}

#[test]
fn several_jars_are_ambiguous() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.jar"), "").unwrap();
    fs::write(dir.path().join("a.jar"), "").unwrap();

    let err = resolve_artifact(&request(dir.path())).unwrap_err();
    match &err {
        ArtifactError::AmbiguousJars { jars, .. } => {
            assert_eq!(
                jars,
                &vec![dir.path().join("a.jar"), dir.path().join("b.jar")]
            );
        }
        other => panic!("expected AmbiguousJars, got {other:?}"),
    }
    assert!(err.to_string().contains("found 2 jars"), "{err}");
}

#[test]
fn empty_or_missing_app_dir_has_no_artifact() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        resolve_artifact(&request(dir.path())),
        Err(ArtifactError::NoArtifact { .. })
    ));

    let missing = dir.path().join("nope");
    assert!(matches!(
        resolve_artifact(&request(&missing)),
        Err(ArtifactError::NoArtifact { .. })
    ));
}

#[test]
fn main_class_wins_over_jars() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("service.jar"), "").unwrap();

    let artifact = resolve_artifact(&ArtifactRequest {
        main_class: Some("com.example.Main"),
        app_jar: Some(Path::new("service.jar")),
        ..request(dir.path())
    })
    .unwrap();
    assert_eq!(
        artifact,
        Artifact::MainClass {
            name: "com.example.Main".into()
        }
    );
}

#[test]
fn explicit_jar_is_resolved_against_app_dir() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("one.jar"), "").unwrap();
    fs::write(dir.path().join("two.jar"), "").unwrap();

    let artifact = resolve_artifact(&ArtifactRequest {
        app_jar: Some(Path::new("two.jar")),
        ..request(dir.path())
    })
    .unwrap();
    assert_eq!(
        artifact,
        Artifact::Jar {
            path: dir.path().join("two.jar")
        }
    );

    let err = resolve_artifact(&ArtifactRequest {
        app_jar: Some(Path::new("three.jar")),
        ..request(dir.path())
    })
    .unwrap_err();
    assert!(matches!(err, ArtifactError::MissingJar { .. }));
}

#[test]
fn artifact_serializes_with_kind_tag() {
    let value = serde_json::to_value(Artifact::MainClass {
        name: "a.B".into(),
    })
    .unwrap();
    assert_eq!(value["kind"], "main_class");
    assert_eq!(value["name"], "a.B");
}
