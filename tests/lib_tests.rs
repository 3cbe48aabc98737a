use image::ImageFormat;
use imgbatch::engine::{
    copy_target, format_for_path, glob_match, is_image_file, normalize_legacy_args,
    path_relative_to, should_include_in_walk,
};
use imgbatch::engine::arg_parser::Cli;
use imgbatch::utils::settings_toml::{apply_settings_to_opts, parse_settings_toml};
use imgbatch::{ArgumentError, CancelToken, Operation, Opts, TaskOutcome, TaskStatus};
use clap::Parser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

// --- is_image_file ---

#[test]
fn test_is_image_file_supported_extensions() {
    for name in ["a.jpg", "a.jpeg", "a.png", "a.bmp", "a.gif"] {
        assert!(is_image_file(Path::new(name)), "{name}");
    }
}

#[test]
fn test_is_image_file_case_insensitive() {
    assert!(is_image_file(Path::new("/x/PHOTO.JPG")));
    assert!(is_image_file(Path::new("/x/Photo.Png")));
    assert!(is_image_file(Path::new("/x/anim.GIF")));
}

#[test]
fn test_is_image_file_rejects_others() {
    assert!(!is_image_file(Path::new("notes.txt")));
    assert!(!is_image_file(Path::new("photo.webp")));
    assert!(!is_image_file(Path::new("png")));
    assert!(!is_image_file(Path::new("photo.png.imgbatch.tmp")));
    assert!(!is_image_file(Path::new("/")));
}

// --- format_for_path ---

#[test]
fn test_format_for_path_by_extension() {
    assert_eq!(format_for_path(Path::new("a.jpg")), ImageFormat::Jpeg);
    assert_eq!(format_for_path(Path::new("a.JPEG")), ImageFormat::Jpeg);
    assert_eq!(format_for_path(Path::new("a.png")), ImageFormat::Png);
    assert_eq!(format_for_path(Path::new("a.bmp")), ImageFormat::Bmp);
    assert_eq!(format_for_path(Path::new("a.gif")), ImageFormat::Gif);
}

#[test]
fn test_format_for_path_fallback_is_unreachable_for_walked_files() {
    // Only reachable for names the walker never submits.
    assert!(!is_image_file(Path::new("a.tiff")));
    assert_eq!(format_for_path(Path::new("a.tiff")), ImageFormat::Jpeg);
    assert_eq!(format_for_path(Path::new("noext")), ImageFormat::Jpeg);
}

// --- copy_target / path_relative_to ---

#[test]
fn test_copy_target_uses_file_name() {
    assert_eq!(
        copy_target(Path::new("/src/sub/c.jpg"), Path::new("/out")),
        Some(PathBuf::from("/out/c.jpg"))
    );
    assert_eq!(copy_target(Path::new("/"), Path::new("/out")), None);
}

#[test]
fn test_path_relative_under_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/foo/bar/baz/qux.png");
    assert_eq!(
        path_relative_to(&path, &base),
        Some(PathBuf::from("baz/qux.png"))
    );
    assert_eq!(path_relative_to(Path::new("/other"), &base), None);
}

// --- glob_match / should_include_in_walk ---

#[test]
fn test_glob_match_literal() {
    assert!(glob_match("raw", "raw"));
    assert!(!glob_match("raw", "raws"));
}

#[test]
fn test_glob_match_star() {
    assert!(glob_match("*.png", "foo.png"));
    assert!(glob_match("*.png", ".png"));
    assert!(!glob_match("*.png", "foo.png.bak"));
    assert!(glob_match("thumb_*", "thumb_001.jpg"));
    assert!(glob_match("a*b*c", "axxbyyc"));
}

#[test]
fn test_glob_match_question_mark() {
    assert!(glob_match("img?.gif", "img1.gif"));
    assert!(!glob_match("img?.gif", "img12.gif"));
}

#[test]
fn test_glob_match_negation_stripped() {
    assert!(glob_match("!cache", "cache"));
}

#[test]
fn test_should_include_dot_and_system_names_by_default() {
    let root = PathBuf::from("/src");
    for path in ["/src/._photo.jpg", "/src/.Trash-1000", "/src/$RECYCLE.BIN", "/src/.hidden.png"] {
        assert!(should_include_in_walk(Path::new(path), &root, &None, &[]), "{path}");
    }
}

#[test]
fn test_should_include_excluded_dir_skipped() {
    let root = PathBuf::from("/src");
    let out = PathBuf::from("/src/out");
    assert!(!should_include_in_walk(&out, &root, &Some(out.clone()), &[]));
    assert!(should_include_in_walk(
        Path::new("/src/other"),
        &root,
        &Some(out),
        &[]
    ));
}

#[test]
fn test_should_include_exclude_pattern_name() {
    let root = PathBuf::from("/src");
    assert!(!should_include_in_walk(
        Path::new("/src/a/cache"),
        &root,
        &None,
        &["cache".to_string()]
    ));
}

#[test]
fn test_should_include_exclude_pattern_relative_path() {
    let root = PathBuf::from("/src");
    assert!(!should_include_in_walk(
        Path::new("/src/a/b.png"),
        &root,
        &None,
        &["a/*".to_string()]
    ));
    // The root's own components never match.
    assert!(should_include_in_walk(
        Path::new("/src/a/b.png"),
        &root,
        &None,
        &["src*".to_string()]
    ));
}

#[test]
fn test_should_include_not_excluded() {
    let root = PathBuf::from("/src");
    assert!(should_include_in_walk(
        Path::new("/src/a/b.png"),
        &root,
        &None,
        &["*.gif".to_string(), "cache".to_string()]
    ));
}

// --- Opts::validate ---

#[test]
fn test_validate_requires_operation() {
    let opts = Opts::default();
    assert_eq!(opts.validate(), Err(ArgumentError::MissingOperation));
}

#[test]
fn test_validate_rejects_non_positive_scale() {
    for factor in [0.0, -1.5, f64::NAN, f64::INFINITY] {
        let opts = Opts {
            operation: Some(Operation::Scale { factor }),
            ..Default::default()
        };
        assert!(
            matches!(opts.validate(), Err(ArgumentError::InvalidScaleFactor(_))),
            "factor {factor}"
        );
    }
}

#[test]
fn test_validate_rejects_empty_destination_and_zero_workers() {
    let opts = Opts {
        operation: Some(Operation::Copy {
            dest: PathBuf::new(),
        }),
        ..Default::default()
    };
    assert_eq!(opts.validate(), Err(ArgumentError::MissingDestination));

    let opts = Opts {
        operation: Some(Operation::Negative),
        num_threads: Some(0),
        ..Default::default()
    };
    assert_eq!(opts.validate(), Err(ArgumentError::ZeroWorkers));
}

#[test]
fn test_validate_accepts_each_operation() {
    for op in [
        Operation::Scale { factor: 0.5 },
        Operation::Negative,
        Operation::Remove,
        Operation::Copy {
            dest: PathBuf::from("out"),
        },
    ] {
        let opts = Opts {
            operation: Some(op.clone()),
            ..Default::default()
        };
        assert_eq!(opts.validate(), Ok(&op));
    }
}

#[test]
fn test_worker_count_defaults_to_hardware() {
    assert!(Opts::default().worker_count() >= 1);
    let opts = Opts {
        num_threads: Some(3),
        ..Default::default()
    };
    assert_eq!(opts.worker_count(), 3);
}

// --- TaskOutcome ---

#[test]
fn test_task_outcome_success_and_message() {
    let p = Path::new("a.png");
    assert!(TaskOutcome::succeeded(p).is_success());
    assert!(TaskOutcome::skipped(p).is_success());
    let failed = TaskOutcome::failed(p, "boom");
    assert!(!failed.is_success());
    assert_eq!(failed.error_message(), Some("boom"));
    assert_eq!(failed.status, TaskStatus::Failed("boom".into()));
}

// --- CancelToken ---

#[test]
fn test_cancel_token_is_shared_and_idempotent() {
    let token = CancelToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());
    token.cancel();
    token.cancel();
    assert!(clone.is_cancelled());
    assert!(!CancelToken::new().is_cancelled());
}

#[test]
fn test_listen_for_escape_cancels_on_esc() {
    let token = CancelToken::new();
    let input: &[u8] = b"abc\x1bdef";
    assert!(imgbatch::cancel::listen_for_escape(input, &token));
    assert!(token.is_cancelled());
}

#[test]
fn test_listen_for_escape_ignores_other_input_until_eof() {
    let token = CancelToken::new();
    let input: &[u8] = b"hello\n";
    assert!(!imgbatch::cancel::listen_for_escape(input, &token));
    assert!(!token.is_cancelled());
}

// --- CLI ---

fn os(args: &[&str]) -> Vec<OsString> {
    args.iter().map(OsString::from).collect()
}

#[test]
fn test_normalize_legacy_args_any_case() {
    let out = normalize_legacy_args(os(&["imgbatch", "photos", "/SUB", "/S", "2.5"]));
    assert_eq!(out, os(&["imgbatch", "photos", "--sub", "--scale", "2.5"]));

    let out = normalize_legacy_args(os(&["imgbatch", "photos", "/c", "/r", "/n"]));
    // The value after /c is a path and stays as given, even if it looks like a flag.
    assert_eq!(out, os(&["imgbatch", "photos", "--copy", "/r", "--negative"]));
}

#[test]
fn test_normalize_legacy_args_keeps_source_dir() {
    let out = normalize_legacy_args(os(&["imgbatch", "/n", "/r"]));
    assert_eq!(out, os(&["imgbatch", "/n", "--remove"]));
}

#[test]
fn test_cli_parses_legacy_scale() {
    let cli = Cli::parse_from(normalize_legacy_args(os(&["imgbatch", "pics", "/sub", "/s", "2"])));
    assert_eq!(cli.dir, PathBuf::from("pics"));
    assert_eq!(cli.sub, Some(true));
    assert_eq!(cli.operation(), Some(Operation::Scale { factor: 2.0 }));
}

#[test]
fn test_cli_parses_copy() {
    let cli = Cli::parse_from(normalize_legacy_args(os(&["imgbatch", "pics", "/C", "out"])));
    assert_eq!(cli.sub, None);
    assert_eq!(
        cli.operation(),
        Some(Operation::Copy {
            dest: PathBuf::from("out")
        })
    );
}

#[test]
fn test_cli_requires_exactly_one_operation() {
    assert!(Cli::try_parse_from(os(&["imgbatch", "pics"])).is_err());
    assert!(Cli::try_parse_from(os(&["imgbatch", "pics", "--negative", "--remove"])).is_err());
    assert!(Cli::try_parse_from(os(&["imgbatch", "pics", "--scale"])).is_err());
    assert!(Cli::try_parse_from(os(&["imgbatch", "pics", "--scale", "abc"])).is_err());
}

#[test]
fn test_cli_negative_scale_reaches_validation() {
    let cli = Cli::try_parse_from(os(&["imgbatch", "pics", "--scale", "-2"])).unwrap();
    let opts = Opts {
        operation: cli.operation(),
        ..Default::default()
    };
    assert_eq!(opts.validate(), Err(ArgumentError::InvalidScaleFactor(-2.0)));
}

// --- settings file ---

#[test]
fn test_settings_toml_applies_present_fields_only() {
    let file = parse_settings_toml(
        r#"
[settings]
recursive = true
exclude = ["cache", "*.bak.png"]
shutdown_timeout_secs = 30
"#,
    )
    .unwrap();
    let mut opts = Opts::default();
    apply_settings_to_opts(&file, &mut opts);
    assert!(opts.recursive);
    assert!(!opts.follow_links);
    assert!(!opts.verbose);
    assert_eq!(opts.exclude, vec!["cache".to_string(), "*.bak.png".to_string()]);
    assert_eq!(opts.shutdown_timeout, Duration::from_secs(30));
    assert!(opts.operation.is_none());
}

#[test]
fn test_settings_toml_rejects_bad_types() {
    assert!(parse_settings_toml("[settings]\nrecursive = \"yes\"\n").is_err());
    assert!(parse_settings_toml("").is_ok());
}
