use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn setup_fixture(dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let notes = dir.join("notes");
    std::fs::create_dir_all(notes.join("lang"))?;
    std::fs::write(
        notes.join("lang/rust.md"),
        "Rust ownership rules and the borrow checker.\n",
    )?;
    std::fs::write(
        notes.join("pasta.txt"),
        "Boil water, salt it, then cook the pasta.\n",
    )?;
    std::fs::write(
        notes.join("page.html"),
        "<html><body><p>Tomato garden</p><script>var borrow = 1;</script></body></html>",
    )?;
    std::fs::write(notes.join(".hidden.md"), "borrow borrow borrow")?;
    Ok(notes)
}

fn run(data_dir: &Path, args: &[&str]) -> Result<Output, Box<dyn std::error::Error>> {
    let output = Command::new(docseek_bin()?)
        .args(args)
        .env("DOCSEEK_DATA_DIR", data_dir)
        .env_remove("DOCSEEK_LOG")
        .output()?;
    Ok(output)
}

#[test]
fn index_then_search_json() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::tempdir()?;
    let notes = setup_fixture(tempdir.path())?;
    let data_dir = tempdir.path().join("data");

    let output = run(&data_dir, &["index", notes.to_str().unwrap()])?;
    assert!(output.status.success(), "{output:?}");
    assert!(data_dir.join("index.redb").exists());

    let output = run(&data_dir, &["search", "borrow", "--json", "--all"])?;
    assert!(output.status.success(), "{output:?}");

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["query"], "borrow");
    let results = report["results"].as_array().expect("results array");

    // Hidden files are not indexed.
    assert_eq!(results.len(), 3);
    assert!(
        results[0]["path"]
            .as_str()
            .is_some_and(|p| p.ends_with("rust.md"))
    );
    // The script body in page.html is not indexed.
    let page = results
        .iter()
        .find(|r| r["path"].as_str().is_some_and(|p| p.ends_with("page.html")))
        .expect("page.html indexed");
    assert_eq!(page["score"], 0.0);

    Ok(())
}

#[test]
fn fuzzy_search_files_output() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::tempdir()?;
    let notes = setup_fixture(tempdir.path())?;
    let data_dir = tempdir.path().join("data");

    assert!(run(&data_dir, &["index", notes.to_str().unwrap()])?.status.success());

    let output = run(&data_dir, &["search", "*tomat*", "--files", "-n", "1"])?;
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("page.html"));

    Ok(())
}

#[test]
fn custom_index_file_and_status() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::tempdir()?;
    let notes = setup_fixture(tempdir.path())?;
    let data_dir = tempdir.path().join("data");
    let index_file = tempdir.path().join("custom/notes.redb");
    let index_arg = index_file.to_str().unwrap();

    let output = run(
        &data_dir,
        &["index", notes.to_str().unwrap(), "--index-file", index_arg],
    )?;
    assert!(output.status.success(), "{output:?}");
    assert!(index_file.exists());
    assert!(!data_dir.join("index.redb").exists());

    let output = run(&data_dir, &["status", "--json", "--index-file", index_arg])?;
    assert!(output.status.success(), "{output:?}");
    let status: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(status["indexed"], true);
    assert_eq!(status["documents"], 3);

    Ok(())
}

#[test]
fn search_without_index_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::tempdir()?;

    let output = run(tempdir.path(), &["search", "anything"])?;
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("docseek index"), "{stderr}");

    Ok(())
}

fn docseek_bin() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(bin) = std::env::var("CARGO_BIN_EXE_docseek") {
        return Ok(PathBuf::from(bin));
    }

    let mut path = std::env::current_exe()?;
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("docseek");

    if cfg!(windows) {
        path.set_extension("exe");
    }

    Ok(path)
}
