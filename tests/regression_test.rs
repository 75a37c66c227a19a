//
// regression_test.rs: Check that tool output is as expected.
//
// Every table under testcases/ is run through the binary, and the
// files it leaves behind, plus a log of what it printed, are compared
// against baseline/.
//

use std::fs::{self, create_dir_all, remove_dir_all, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use glob::glob;
use test_bin::get_test_bin;

const TEST_TEMP_DIR: &str = "test_tmp";

fn log_str(s: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(Path::new(TEST_TEMP_DIR).join("test.log"))?;
    file.write_all(s.as_bytes())?;
    Ok(())
}

fn log_name(s: &str) -> Result<()> {
    log_str(&format!("=== {}\n", s))
}

fn sorted_files(dir: &str) -> Result<Vec<String>> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| -> Result<String> { Ok(entry?.file_name().to_string_lossy().into_owned()) })
        .collect::<Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}

#[test]
fn test_regression() -> Result<()> {
    if Path::new(TEST_TEMP_DIR).exists() {
        remove_dir_all(TEST_TEMP_DIR)?;
    }
    create_dir_all(TEST_TEMP_DIR)?;

    let mut names = Vec::new();
    for entry in glob("testcases/*.mvm")? {
        let path = entry?;
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        fs::copy(&path, Path::new(TEST_TEMP_DIR).join(&name))?;
        names.push(name);
    }
    names.sort();
    assert!(!names.is_empty(), "No test cases found");

    for name in names.iter() {
        log_name(name)?;

        let output = get_test_bin("cimamvm")
            .args(&["check", name.as_str()])
            .current_dir(TEST_TEMP_DIR)
            .env("RUST_LOG", "off")
            .output()?;
        log_str(&String::from_utf8_lossy(&output.stdout))?;
        log_str(&String::from_utf8_lossy(&output.stderr))?;

        // Only tables that check cleanly produce output files.
        let produced = Path::new(TEST_TEMP_DIR).join(name).with_extension("plan");
        assert_eq!(output.status.success(), produced.exists(), "exit status of {}", name);

        fs::remove_file(Path::new(TEST_TEMP_DIR).join(name))?;
    }

    assert_eq!(sorted_files("baseline")?, sorted_files(TEST_TEMP_DIR)?, "Output files differ");
    for name in sorted_files("baseline")? {
        let expected = fs::read_to_string(Path::new("baseline").join(&name))?;
        let actual = fs::read_to_string(Path::new(TEST_TEMP_DIR).join(&name))?;
        assert_eq!(expected, actual, "Output generation differs for {}", name);
    }

    Ok(())
}
