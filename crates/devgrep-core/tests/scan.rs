//! 端到端扫描行为（核心库）
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use devgrep_core::{
    scan, ConfigError, ExtensionFilter, IoErrorPolicy, MatchLine, PatternSet, Reporter, ScanConfig, ScanError,
    ScanStats, TextReporter,
};

/// 记录所有输出事件，便于断言
#[derive(Debug, Default)]
struct Recorder {
    events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Header(PathBuf),
    Separator,
    Context(usize),
    Match(usize, String),
    End,
    Replaced(PathBuf, usize),
    Summary(usize, usize),
}

impl Reporter for Recorder {
    fn file_header(&mut self, path: &Path) -> io::Result<()> {
        self.events.push(Event::Header(path.to_path_buf()));
        Ok(())
    }
    fn context_separator(&mut self) -> io::Result<()> {
        self.events.push(Event::Separator);
        Ok(())
    }
    fn context_line(&mut self, line: &MatchLine<'_>) -> io::Result<()> {
        self.events.push(Event::Context(line.number));
        Ok(())
    }
    fn match_line(&mut self, line: &MatchLine<'_>, _patterns: &PatternSet) -> io::Result<()> {
        self.events.push(Event::Match(line.number, line.display_text().to_string()));
        Ok(())
    }
    fn file_end(&mut self) -> io::Result<()> {
        self.events.push(Event::End);
        Ok(())
    }
    fn replaced(&mut self, path: &Path, occurrences: usize) -> io::Result<()> {
        self.events.push(Event::Replaced(path.to_path_buf(), occurrences));
        Ok(())
    }
    fn summary(&mut self, stats: &ScanStats) -> io::Result<()> {
        self.events.push(Event::Summary(stats.occurrences, stats.files_matching));
        Ok(())
    }
}

impl Recorder {
    fn headers(&self) -> Vec<&PathBuf> {
        self.events.iter().filter_map(|e| match e { Event::Header(p) => Some(p), _ => None }).collect()
    }
    fn matched_lines(&self) -> Vec<usize> {
        self.events.iter().filter_map(|e| match e { Event::Match(n, _) => Some(*n), _ => None }).collect()
    }
}

fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

fn run(root: &Path, config: &ScanConfig) -> (ScanStats, Recorder) {
    let mut rec = Recorder::default();
    let stats = scan(root, config, &mut rec).unwrap();
    (stats, rec)
}

#[test]
fn multi_pattern_line_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.py", "import os\n\nfoo bar baz\nfoo only\n");

    let (stats, rec) = run(dir.path(), &ScanConfig::find(["foo", "bar"]));
    assert_eq!(stats.occurrences, 1);
    assert_eq!(stats.files_matching, 1);
    assert_eq!(
        rec.events,
        vec![
            Event::Header(a),
            Event::Match(3, "foo bar baz".into()),
            Event::End,
            Event::Summary(1, 1),
        ]
    );
}

#[test]
fn occurrences_count_lines_not_hits() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "x.txt", "foo foo bar bar\nbar foo\nfoo\n");

    let (stats, rec) = run(dir.path(), &ScanConfig::find(["foo", "bar"]));
    assert_eq!(stats.occurrences, 2);
    assert_eq!(rec.matched_lines(), vec![1, 2]);
}

#[test]
fn single_pattern_absent_leaves_no_trace() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", "alpha\nbeta\n");
    let b = write(dir.path(), "b.txt", "gamma\nneedle here\n");

    let (stats, rec) = run(dir.path(), &ScanConfig::find(["needle"]));
    assert_eq!(stats.occurrences, 1);
    assert_eq!(stats.files_scanned, 2);
    assert_eq!(rec.headers(), vec![&b]);
}

#[test]
fn no_match_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", "alpha\n");

    let (stats, rec) = run(dir.path(), &ScanConfig::find(["zzz", "yyy"]));
    assert_eq!(stats.occurrences, 0);
    assert!(rec.events.is_empty());
}

#[test]
fn ignore_case_folds_lines_but_reports_original_text() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "Hello World\nhello\n");

    let config = ScanConfig { ignore_case: true, ..ScanConfig::find(["HELLO"]) };
    let (stats, rec) = run(dir.path(), &config);
    assert_eq!(stats.occurrences, 2);
    assert!(rec.events.contains(&Event::Match(1, "Hello World".into())));
}

#[test]
fn context_lines_are_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let body: String = (1..=6).map(|i| if i == 2 || i == 6 { format!("hit {i}\n") } else { format!("line {i}\n") }).collect();
    write(dir.path(), "c.txt", &body);

    let config = ScanConfig { context_lines: 2, ..ScanConfig::find(["hit"]) };
    let (_, rec) = run(dir.path(), &config);
    let tail: Vec<_> = rec.events[1..].to_vec();
    assert_eq!(
        tail,
        vec![
            Event::Separator,
            Event::Context(1),
            Event::Match(2, "hit 2".into()),
            Event::Context(3),
            Event::Context(4),
            Event::Separator,
            Event::Context(4),
            Event::Context(5),
            Event::Match(6, "hit 6".into()),
            Event::End,
            Event::Summary(2, 1),
        ]
    );
}

#[test]
fn replace_rewrites_file_and_counts() {
    let dir = tempfile::tempdir().unwrap();
    let b = write(dir.path(), "b.txt", "hello\nworld\n");

    let (stats, rec) = run(dir.path(), &ScanConfig::replace("hello", "hi"));
    assert_eq!(fs::read_to_string(&b).unwrap(), "hi\nworld\n");
    assert_eq!(stats.occurrences, 1);
    assert_eq!(rec.events, vec![Event::Replaced(b, 1), Event::Summary(1, 1)]);
}

#[test]
fn replace_round_trip_restores_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let original = "fn old_name() {}\nold_name();\nlet x = old_name;\n";
    let f = write(dir.path(), "lib.c", original);

    let (stats, _) = run(dir.path(), &ScanConfig::replace("old_name", "new_name"));
    assert_eq!(stats.occurrences, 3);
    assert_ne!(fs::read_to_string(&f).unwrap(), original);

    run(dir.path(), &ScanConfig::replace("new_name", "old_name"));
    assert_eq!(fs::read(&f).unwrap(), original.as_bytes());
}

#[test]
fn invalid_config_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let f = write(dir.path(), "a.txt", "foo foo\n");

    let cases = [
        ScanConfig::find(["foo", "foo"]),
        ScanConfig { mode: devgrep_core::ScanMode::Replace, ..ScanConfig::find(["foo", "bar", "baz"]) },
        ScanConfig { ignore_case: true, ..ScanConfig::replace("foo", "bar") },
    ];
    for config in cases {
        let mut rec = Recorder::default();
        let err = scan(dir.path(), &config, &mut rec).unwrap_err();
        assert!(matches!(err, ScanError::Config(_)), "{err}");
        assert!(rec.events.is_empty());
        assert_eq!(fs::read_to_string(&f).unwrap(), "foo foo\n");
    }
}

#[test]
fn duplicate_error_names_pattern() {
    let dir = tempfile::tempdir().unwrap();
    let err = scan(dir.path(), &ScanConfig::find(["a", "a"]), &mut Recorder::default()).unwrap_err();
    assert!(matches!(err, ScanError::Config(ConfigError::DuplicatePattern(_))));
    assert!(err.to_string().contains("can't be equal"));
}

#[test]
fn non_utf8_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bin.txt"), [0xff, 0xfe, b'f', b'o', b'o']).unwrap();
    write(dir.path(), "ok.txt", "foo\n");

    for config in [ScanConfig::find(["foo"]), ScanConfig::find(["foo", "o"])] {
        let (stats, _) = run(dir.path(), &config);
        assert_eq!(stats.occurrences, 1);
        assert_eq!(stats.files_matching, 1);
    }
}

#[test]
fn extension_filter_limits_candidates() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.py", "needle\n");
    write(dir.path(), "b.rs", "needle\n");
    write(dir.path(), "build/c.py", "needle\n");

    let (stats, _) = run(dir.path(), &ScanConfig::find(["needle"]));
    assert_eq!(stats.files_matching, 1);

    let config = ScanConfig { extensions: ExtensionFilter::All, ..ScanConfig::find(["needle"]) };
    let (stats, _) = run(dir.path(), &config);
    assert_eq!(stats.files_matching, 2);
}

#[cfg(unix)]
#[test]
fn unreadable_file_follows_policy() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let locked = write(dir.path(), "a.txt", "foo\n");
    write(dir.path(), "b.txt", "foo\n");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    // root 用户不受权限位限制，此时测试无意义
    if fs::read(&locked).is_ok() {
        return;
    }

    let err = scan(dir.path(), &ScanConfig::find(["foo"]), &mut Recorder::default()).unwrap_err();
    assert!(matches!(err, ScanError::Io { .. }));

    let config = ScanConfig { on_io_error: IoErrorPolicy::Skip, ..ScanConfig::find(["foo"]) };
    let (stats, _) = run(dir.path(), &config);
    assert_eq!(stats.files_skipped, 1);
    assert_eq!(stats.occurrences, 1);
}

#[test]
fn missing_root_is_fatal_under_every_policy() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    for policy in [IoErrorPolicy::Abort, IoErrorPolicy::Skip] {
        let config = ScanConfig { on_io_error: policy, ..ScanConfig::find(["foo"]) };
        let mut rec = Recorder::default();
        let err = scan(&missing, &config, &mut rec).unwrap_err();
        assert!(matches!(err, ScanError::Walk(_)), "{err}");
        assert!(!err.is_per_file());
        assert!(rec.events.is_empty());
    }
}

#[cfg(unix)]
#[test]
fn symlinked_file_is_searched() {
    let dir = tempfile::tempdir().unwrap();
    let target = write(dir.path(), "real/target.txt", "needle\n");
    let root = dir.path().join("root");
    fs::create_dir_all(&root).unwrap();
    std::os::unix::fs::symlink(&target, root.join("link.txt")).unwrap();

    let (stats, rec) = run(&root, &ScanConfig::find(["needle"]));
    assert_eq!(stats.occurrences, 1);
    assert_eq!(rec.headers(), vec![&root.join("link.txt")]);
}

#[cfg(unix)]
#[test]
fn failed_rewrite_is_not_reported_as_replaced() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let locked = write(dir.path(), "a.txt", "hello\n");
    let open = write(dir.path(), "b.txt", "hello\n");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o444)).unwrap();
    // root 用户可写只读文件，此时测试无意义
    if fs::OpenOptions::new().write(true).open(&locked).is_ok() {
        return;
    }

    let config = ScanConfig { on_io_error: IoErrorPolicy::Skip, ..ScanConfig::replace("hello", "hi") };
    let (stats, rec) = run(dir.path(), &config);
    assert_eq!(stats.files_skipped, 1);
    assert_eq!(stats.occurrences, 1);
    assert_eq!(rec.events, vec![Event::Replaced(open.clone(), 1), Event::Summary(1, 1)]);
    assert_eq!(fs::read_to_string(&locked).unwrap(), "hello\n");
    assert_eq!(fs::read_to_string(&open).unwrap(), "hi\n");
}

#[test]
fn text_reporter_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.py", "one\ntwo\nfoo bar baz\n");

    let mut reporter = TextReporter::plain(Vec::new());
    scan(dir.path(), &ScanConfig::find(["foo", "bar"]), &mut reporter).unwrap();
    let out = String::from_utf8(reporter.into_inner()).unwrap();
    let header = dir.path().join("a.py").display().to_string();
    assert_eq!(out, format!("{header}\n3: foo bar baz\n\noccurrences=1, files-matching=1\n"));
}
