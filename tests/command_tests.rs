use cfgstat::commands::{execute_render, validate_args, RenderArgs, View};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Lay out a run directory: stats/cfg.xml, one record stream, and the
/// source file the description references.
fn setup_run_dir(root: &Path, record: &str) -> PathBuf {
    let run_dir = root.join("demo-stat");
    let stat_dir = run_dir.join("stats");
    std::fs::create_dir_all(&stat_dir).unwrap();

    let source = root.join("code.c");
    let mut file = std::fs::File::create(&source).unwrap();
    write!(file, "int main() {{\n  return 0;\n}}\n").unwrap();

    let doc = format!(
        r#"<cfg-collection>
  <cfg id="g1" label="main" context="[main]">
    <entry id="g1-0"/>
    <bb id="g1-1" address="0x100" size="4">
      <line file="{}" line="2"/>
    </bb>
    <exit id="g1-2"/>
    <edge source="g1-0" target="g1-1"/>
    <edge source="g1-1" target="g1-2"/>
  </cfg>
</cfg-collection>
"#,
        source.display()
    );
    std::fs::write(stat_dir.join("cfg.xml"), doc).unwrap();
    std::fs::write(stat_dir.join("time.csv"), record).unwrap();
    run_dir
}

fn render_args(run_dir: PathBuf, view: View) -> RenderArgs {
    RenderArgs {
        task: "demo".to_string(),
        run_dir,
        stats: vec!["time".to_string()],
        main: "time".to_string(),
        view,
        colorized: true,
        with_source: false,
    }
}

#[test]
fn test_graph_view_pipeline() {
    let root = tempfile::tempdir().unwrap();
    let run_dir = setup_run_dir(root.path(), "10\t0x100\t4\t\"main\"\n");

    let args = render_args(run_dir.clone(), View::Graphs);
    validate_args(&args).unwrap();
    execute_render(args).unwrap();

    let index = std::fs::read_to_string(run_dir.join("time-cfg/index.dot")).unwrap();
    assert!(index.contains("time=10 (100.00%)"));
}

#[test]
fn test_source_view_pipeline() {
    let root = tempfile::tempdir().unwrap();
    let run_dir = setup_run_dir(root.path(), "10\t0x100\t4\t\"main\"\n");

    execute_render(render_args(run_dir.clone(), View::Sources)).unwrap();

    assert!(run_dir.join("src/index.html").is_file());
}

#[test]
fn test_malformed_record_aborts_without_output() {
    let root = tempfile::tempdir().unwrap();
    let run_dir = setup_run_dir(root.path(), "10\t0x100\n");

    let result = execute_render(render_args(run_dir.clone(), View::Graphs));

    assert!(result.is_err());
    assert!(!run_dir.join("time-cfg").exists());
}

#[test]
fn test_missing_stream_aborts() {
    let root = tempfile::tempdir().unwrap();
    let run_dir = setup_run_dir(root.path(), "10\t0x100\t4\t\"main\"\n");

    let mut args = render_args(run_dir, View::Graphs);
    args.stats = vec!["energy".to_string()];
    args.main = "energy".to_string();
    assert!(execute_render(args).is_err());
}

#[test]
fn test_missing_description_aborts() {
    let root = tempfile::tempdir().unwrap();
    let run_dir = setup_run_dir(root.path(), "10\t0x100\t4\t\"main\"\n");
    std::fs::remove_file(run_dir.join("stats/cfg.xml")).unwrap();

    assert!(execute_render(render_args(run_dir, View::Graphs)).is_err());
}
