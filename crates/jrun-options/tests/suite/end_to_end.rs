use jrun_memory::{ContainerLimits, GB, MB};
use jrun_options::{
    DebugSettings, DerivedOptions, HeapSettings, JvmOptionSettings, Ratio, UserOptions,
};

const GC_BUNDLE: &str = "-XX:+UseParallelGC -XX:MinHeapFreeRatio=20 -XX:MaxHeapFreeRatio=40 \
-XX:GCTimeRatio=4 -XX:AdaptiveSizePolicyWeight=90";

#[test]
fn one_gib_ceiling_without_configuration() {
    let settings = JvmOptionSettings::default();
    let options = settings.jvm_options(&ContainerLimits::with_memory_ceiling(GB));

    assert_eq!(
        options,
        format!("-Xmx512m {GC_BUNDLE} -XX:+ExitOnOutOfMemoryError")
    );
    assert!(!options.contains("-Xms"));
}

#[test]
fn no_ceiling_still_applies_gc_bundle() {
    let settings = JvmOptionSettings {
        heap: HeapSettings {
            max_ratio: Some(Ratio::new(80).unwrap()),
            init_ratio: Some(Ratio::new(20).unwrap()),
            ..HeapSettings::default()
        },
        ..JvmOptionSettings::default()
    };
    let options = settings.jvm_options(&ContainerLimits::default());

    assert_eq!(options, format!("{GC_BUNDLE} -XX:+ExitOnOutOfMemoryError"));
}

#[test]
fn user_options_stay_first_and_suppress_matching_flags() {
    let settings = JvmOptionSettings {
        user_options: UserOptions::parse("  -Xmx300m   -XX:+UseG1GC -Dapp.mode=prod "),
        heap: HeapSettings {
            init_ratio: Some(Ratio::new(25).unwrap()),
            ..HeapSettings::default()
        },
        java_major_version: Some(7),
        ..JvmOptionSettings::default()
    };
    let options = settings.jvm_options(&ContainerLimits::with_memory_ceiling(GB));

    assert_eq!(options, "-Xmx300m -XX:+UseG1GC -Dapp.mode=prod -Xms256m");
}

#[test]
fn small_container_uses_quarter_ratio() {
    let options =
        JvmOptionSettings::default().jvm_options(&ContainerLimits::with_memory_ceiling(256 * MB));
    assert!(options.starts_with("-Xmx64m "), "got {options}");
}

#[test]
fn java_seven_omits_exit_on_oom() {
    let settings = JvmOptionSettings {
        java_major_version: Some(7),
        ..JvmOptionSettings::default()
    };
    let options = settings.jvm_options(&ContainerLimits::default());
    assert_eq!(options, GC_BUNDLE);
}

#[test]
fn every_group_is_emitted_in_order() {
    let settings = JvmOptionSettings {
        user_options: UserOptions::parse("-Dx=1"),
        debug: Some(DebugSettings::default()),
        diagnostics: true,
        ..JvmOptionSettings::default()
    };
    let limits = ContainerLimits {
        memory_bytes: Some(GB),
        host_memory_bytes: Some(4 * GB),
        cpu_cores: Some(2),
    };

    let derived = DerivedOptions::derive(&settings, &limits);
    assert_eq!(derived.memory, vec!["-Xmx512m"]);
    assert_eq!(derived.gc.len(), 6);
    assert_eq!(derived.cpu.len(), 3);
    assert_eq!(derived.debug.len(), 1);
    assert_eq!(derived.diagnostics.len(), 3);

    let assembled = derived.assemble(&settings.user_options);
    let tokens: Vec<&str> = assembled.split(' ').collect();
    assert_eq!(tokens[0], "-Dx=1");
    assert_eq!(tokens[1], "-Xmx512m");
    assert_eq!(tokens[2], "-XX:+UseParallelGC");
    assert_eq!(tokens[8], "-XX:ParallelGCThreads=2");
    assert!(tokens[11].starts_with("-agentlib:jdwp="));
    assert_eq!(tokens.last().copied(), Some("-XX:+PrintNMTStatistics"));
    assert_eq!(tokens.len(), 1 + 1 + 6 + 3 + 1 + 3);
}

#[test]
fn derived_options_serialize_by_group() {
    let derived = DerivedOptions::derive(
        &JvmOptionSettings::default(),
        &ContainerLimits::with_memory_ceiling(GB),
    );
    let value = serde_json::to_value(&derived).unwrap();
    assert_eq!(value["memory"][0], "-Xmx512m");
    assert!(value["cpu"].as_array().unwrap().is_empty());
}
