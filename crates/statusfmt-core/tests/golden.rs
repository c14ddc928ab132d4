use std::fs;
use std::path::{Path, PathBuf};
use statusfmt_core::{Account, AccountDirectory, Formatter, FormatterOptions, Status};

fn formatter() -> Formatter<AccountDirectory> {
    let options = FormatterOptions {
        local_domain: "cb6e6126.ngrok.io".to_string(),
        ..Default::default()
    };
    Formatter::with_resolver(options, AccountDirectory::new().with(Account::local("alice")))
}

#[test]
fn golden_local_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let fixtures_dir = root.join("tests/fixtures");
    let expect_dir = root.join("tests/expect");
    let formatter = formatter();

    let mut fixtures = collect_fixtures(&fixtures_dir, "txt")?;
    fixtures.sort_by(|a, b| file_name(a).cmp(&file_name(b)));
    assert!(!fixtures.is_empty(), "no fixtures in {}", fixtures_dir.display());

    for fixture in fixtures {
        let name = file_stem(&fixture)?;
        let source = read_source(&fixture)?;
        let status = Status::local(Account::local("alice"), source);
        let html = formatter.format(&status)?;

        let expected = fs::read_to_string(expect_dir.join(format!("{}.html", name)))?;
        assert_eq!(
            html.trim_end(),
            expected.trim_end(),
            "HTML mismatch for fixture {}",
            name
        );
    }

    Ok(())
}

#[test]
fn golden_remote_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let fixtures_dir = root.join("tests/fixtures/remote");
    let expect_dir = root.join("tests/expect/remote");
    let formatter = formatter();

    let mut fixtures = collect_fixtures(&fixtures_dir, "html")?;
    fixtures.sort_by(|a, b| file_name(a).cmp(&file_name(b)));

    for fixture in fixtures {
        let name = file_stem(&fixture)?;
        let source = read_source(&fixture)?;
        let status = Status::remote(Account::remote("bob", "remote.example"), source);
        let html = formatter.format(&status)?;

        let expected = fs::read_to_string(expect_dir.join(format!("{}.html", name)))?;
        assert_eq!(
            html.trim_end(),
            expected.trim_end(),
            "HTML mismatch for remote fixture {}",
            name
        );
    }

    Ok(())
}

fn collect_fixtures(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut fixtures = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
            fixtures.push(path);
        }
    }
    Ok(fixtures)
}

/// Fixture files end with a newline that is not part of the status.
fn read_source(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let mut source = fs::read_to_string(path)?;
    if source.ends_with('\n') {
        source.pop();
    }
    Ok(source)
}

fn file_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("")
}

fn file_stem(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|value| value.to_string())
        .ok_or_else(|| "fixture name is not valid UTF-8".into())
}
