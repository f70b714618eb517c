use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::archive::{Archive, UCD_ARCHIVE, UCD_ENTRY};
use crate::emit::{Emitter, Language, Summary};
use crate::error::Error;
use crate::ucd::Document;

#[derive(Debug, Clone, bon::Builder)]
pub struct GenerateOptions {
    /// Directory holding [`UCD_ARCHIVE`].
    #[builder(into)]
    pub data_dir: PathBuf,
    /// Directory the generated file is written to.
    #[builder(into)]
    pub out_dir: PathBuf,
    #[builder(default)]
    pub language: Language,
}

impl GenerateOptions {
    pub fn archive_path(&self) -> PathBuf {
        self.data_dir.join(UCD_ARCHIVE)
    }

    pub fn output_path(&self) -> PathBuf {
        self.out_dir.join(self.language.file_name())
    }
}

/// Runs the whole pipeline: archive, XML, identifiers, output file.
///
/// The output is staged in a temporary file next to its destination and
/// only renamed into place once everything has been written.
pub fn generate(options: &GenerateOptions) -> Result<Summary, Error> {
    let span = tracing::info_span!("generate", language = ?options.language);
    let _enter = span.enter();

    let mut archive = Archive::open(options.archive_path())?;

    let staged = NamedTempFile::new_in(&options.out_dir).map_err(|e| {
        Error::io(format!("create output in {}", options.out_dir.display()), e)
    })?;
    let mut emitter = Emitter::new(BufWriter::new(staged), options.language)?;

    let parsed = archive.with_entry(UCD_ENTRY, Document::from_reader)?;
    if let Some(document) = parsed {
        if let Some(description) = &document.description {
            tracing::debug!(description = %description, "parsed dataset");
        }
        emitter.emit_document(&document)?;
    }

    let (writer, summary) = emitter.finish()?;
    let staged = writer
        .into_inner()
        .map_err(|e| Error::io("write output", e.into_error()))?;
    let output = options.output_path();
    persist(staged, &output)?;

    tracing::info!(
        output = %output.display(),
        declarations = summary.declarations,
        duplicates = summary.duplicates,
        groups = summary.groups,
        "generated"
    );
    Ok(summary)
}

fn persist(staged: NamedTempFile, output: &Path) -> Result<(), Error> {
    staged
        .persist(output)
        .map_err(|e| Error::io(format!("persist {}", output.display()), e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const LATIN: &str = r#"<ucd xmlns="http://www.unicode.org/ns/2003/ucd/1.0">
  <repertoire>
    <group scx="Latin" blk="Basic Latin">
      <char cp="0041" na="LATIN CAPITAL LETTER A"/>
    </group>
  </repertoire>
</ucd>"#;

    fn write_archive(dir: &Path, entry: &str, content: &str) {
        let file = File::create(dir.join(UCD_ARCHIVE)).unwrap();
        let mut zip = ZipWriter::new(file);
        zip.start_file(entry, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_generate_go() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_archive(data.path(), UCD_ENTRY, LATIN);

        let options = GenerateOptions::builder()
            .data_dir(data.path())
            .out_dir(out.path())
            .build();
        let summary = generate(&options).unwrap();
        assert_eq!(summary.declarations, 1);

        let output = std::fs::read_to_string(out.path().join("data.go")).unwrap();
        let lines: Vec<_> = output
            .lines()
            .filter(|line| line.contains(" = 0x"))
            .collect();
        assert_eq!(lines, ["    LatinCapitalLetterA rune = 0x0041"]);
    }

    #[test]
    fn test_generate_rust() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_archive(data.path(), UCD_ENTRY, LATIN);

        let options = GenerateOptions::builder()
            .data_dir(data.path())
            .out_dir(out.path())
            .language(Language::Rust)
            .build();
        generate(&options).unwrap();

        let output = std::fs::read_to_string(out.path().join("data.rs")).unwrap();
        assert!(output.contains("    pub const LatinCapitalLetterA: u32 = 0x0041;\n"));
        assert!(!out.path().join("data.go").exists());
    }

    #[test]
    fn test_missing_entry_writes_empty_block() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_archive(data.path(), "ucd.nounihan.grouped.xml", LATIN);

        let options = GenerateOptions::builder()
            .data_dir(data.path())
            .out_dir(out.path())
            .build();
        let summary = generate(&options).unwrap();
        assert_eq!(summary, Summary::default());

        let output = std::fs::read_to_string(out.path().join("data.go")).unwrap();
        assert!(output.ends_with("const (\n)\n\n"));
    }

    #[test]
    fn test_missing_archive_leaves_no_output() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        let options = GenerateOptions::builder()
            .data_dir(data.path())
            .out_dir(out.path())
            .build();
        let err = generate(&options).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_parse_error_leaves_no_output() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_archive(data.path(), UCD_ENTRY, "<ucd><repertoire>");

        let options = GenerateOptions::builder()
            .data_dir(data.path())
            .out_dir(out.path())
            .build();
        let err = generate(&options).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_out_dir() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_archive(data.path(), UCD_ENTRY, LATIN);

        let options = GenerateOptions::builder()
            .data_dir(data.path())
            .out_dir(out.path().join("missing"))
            .build();
        let err = generate(&options).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
